//! Integration tests for the solvency engine
//!
//! Tests are organized by topic:
//! - `withdrawal` - Per-account draining and both waterfalls
//! - `simulation` - Year-by-year trial mechanics and scenarios
//! - `sweep` - Monte Carlo sweeps, seeding and success rates

mod sweep;
mod withdrawal;

use crate::model::{AccountRecord, Holding, Holdings, TaxCategory};

/// Account record with basis equal to balance in every bucket
pub(crate) fn account(
    name: &str,
    tax_category: TaxCategory,
    cash: f64,
    stocks: f64,
    bonds: f64,
) -> AccountRecord {
    AccountRecord {
        name: name.into(),
        tax_category,
        holdings: Holdings {
            cash: Holding::new(cash, cash),
            stocks: Holding::new(stocks, stocks),
            bonds: Holding::new(bonds, bonds),
        },
    }
}

pub(crate) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
