//! Trial and sweep results
//!
//! A trial produces one `YearRecord` per simulated year; records are appended
//! once and never modified. A sweep collects independent trials and reports
//! how many survived.

use serde::{Deserialize, Serialize};

use super::accounts::AccountSnapshot;
use crate::money::{SURVIVAL_THRESHOLD, round_cents};

/// Everything that happened in one simulated year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearRecord {
    pub year: i32,
    /// Portfolio value before this year's withdrawal
    pub total_value: f64,
    /// Post-tax dollars the withdrawal policy asked for
    pub requested: f64,
    /// Post-tax dollars actually delivered
    pub delivered: f64,
    pub tax_paid: f64,
    /// `delivered / total_value`, 4 decimal places (0 for an empty portfolio)
    pub withdrawal_rate: f64,
    pub inflation: f64,
    pub stock_return: f64,
    pub bond_return: f64,
    /// Account balances right after the withdrawal, before market movement
    pub accounts: Vec<AccountSnapshot>,
}

impl YearRecord {
    #[must_use]
    pub fn shortfall(&self) -> f64 {
        round_cents(self.requested - self.delivered).max(0.0)
    }
}

/// Complete results from a single trial
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrialResult {
    pub seed: u64,
    pub start_value: f64,
    pub start_accounts: Vec<AccountSnapshot>,
    pub years: Vec<YearRecord>,
    /// Portfolio value after the last year's market movement
    pub end_value: f64,
}

impl TrialResult {
    /// Pre-withdrawal portfolio value for each year
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.years.iter().map(|y| y.total_value).collect()
    }

    #[must_use]
    pub fn inflations(&self) -> Vec<f64> {
        self.years.iter().map(|y| y.inflation).collect()
    }

    #[must_use]
    pub fn stock_returns(&self) -> Vec<f64> {
        self.years.iter().map(|y| y.stock_return).collect()
    }

    #[must_use]
    pub fn bond_returns(&self) -> Vec<f64> {
        self.years.iter().map(|y| y.bond_return).collect()
    }

    /// Pre-withdrawal value in the final simulated year
    #[must_use]
    pub fn final_value(&self) -> f64 {
        self.years
            .last()
            .map_or(self.start_value, |y| y.total_value)
    }

    /// A trial survives if its final-year value is at least one dollar
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.final_value() >= SURVIVAL_THRESHOLD
    }

    /// First year the portfolio entered with nothing left
    #[must_use]
    pub fn depleted_year(&self) -> Option<i32> {
        self.years
            .iter()
            .find(|y| y.total_value < SURVIVAL_THRESHOLD)
            .map(|y| y.year)
    }

    #[must_use]
    pub fn total_tax_paid(&self) -> f64 {
        self.years.iter().map(|y| y.tax_paid).sum()
    }

    #[must_use]
    pub fn total_delivered(&self) -> f64 {
        self.years.iter().map(|y| y.delivered).sum()
    }
}

/// Standard percentiles reported for a sweep
pub mod percentiles {
    pub const P5: f64 = 0.05;
    pub const P50: f64 = 0.50;
    pub const P95: f64 = 0.95;
}

/// Headline numbers of a sweep
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SweepSummary {
    pub iterations: usize,
    pub succeeded: usize,
    /// Fraction of trials that survived, 0.0..=1.0
    pub success_rate: f64,
    pub final_value_p5: f64,
    pub final_value_p50: f64,
    pub final_value_p95: f64,
    pub mean_tax_paid: f64,
}

/// All trials of a sweep
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepResult {
    pub base_seed: u64,
    pub trials: Vec<TrialResult>,
}

/// Nearest-rank percentile of an ascending slice
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = ((sorted.len() - 1) as f64 * p).round() as usize;
    sorted[index.min(sorted.len() - 1)]
}

impl SweepResult {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.trials.iter().filter(|t| t.succeeded()).count()
    }

    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.trials.is_empty() {
            return 0.0;
        }
        self.succeeded() as f64 / self.trials.len() as f64
    }

    #[must_use]
    pub fn summary(&self) -> SweepSummary {
        let mut finals: Vec<f64> = self.trials.iter().map(TrialResult::final_value).collect();
        finals.sort_by(f64::total_cmp);

        let mean_tax_paid = if self.trials.is_empty() {
            0.0
        } else {
            self.trials.iter().map(TrialResult::total_tax_paid).sum::<f64>()
                / self.trials.len() as f64
        };

        SweepSummary {
            iterations: self.trials.len(),
            succeeded: self.succeeded(),
            success_rate: self.success_rate(),
            final_value_p5: percentile(&finals, percentiles::P5),
            final_value_p50: percentile(&finals, percentiles::P50),
            final_value_p95: percentile(&finals, percentiles::P95),
            mean_tax_paid,
        }
    }
}
