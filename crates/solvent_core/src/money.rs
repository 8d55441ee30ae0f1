//! Rounding helpers for dollar amounts and rates

/// Largest gap, in dollars, tolerated between a post-tax request and what a
/// withdrawal actually delivers. Covers the cent rounding in
/// `how_much_pretax` plus one tax rounding per bucket.
pub const WITHDRAWAL_TOLERANCE: f64 = 0.05;

/// A final-year portfolio value below this counts as a failed trial
pub const SURVIVAL_THRESHOLD: f64 = 1.0;

/// Round a dollar amount to whole cents
#[must_use]
#[inline]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Round a rate to 4 decimal places (hundredths of a percent)
#[must_use]
#[inline]
pub fn round_rate(rate: f64) -> f64 {
    (rate * 10_000.0).round() / 10_000.0
}
