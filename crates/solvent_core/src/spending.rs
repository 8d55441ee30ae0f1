//! How much post-tax money to take out each year

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::Portfolio;
use crate::money::round_cents;

/// Decides the post-tax dollars to withdraw in a year.
///
/// `prev_rate` is the realized withdrawal rate of the previous year (0 in the
/// first year). The current policies ignore it.
pub trait WithdrawalAmountPolicy: Send {
    fn how_much(&mut self, prev_rate: f64, portfolio: &Portfolio) -> f64;
}

/// Values above 1 are whole percentages: 4 means 4%
fn normalize_percentage(value: f64) -> f64 {
    if value > 1.0 { value / 100.0 } else { value }
}

/// The same fraction of whatever the portfolio is worth this year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantPercentage {
    percentage: f64,
}

impl ConstantPercentage {
    #[must_use]
    pub fn new(percentage: f64) -> Self {
        let normalized = normalize_percentage(percentage);
        if normalized != percentage {
            tracing::info!("Auto-adjusting percentage from {percentage} to {normalized}");
        }
        Self {
            percentage: normalized,
        }
    }

    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }
}

impl WithdrawalAmountPolicy for ConstantPercentage {
    fn how_much(&mut self, _prev_rate: f64, portfolio: &Portfolio) -> f64 {
        let total = portfolio.total_value();
        let amount = round_cents(self.percentage * total);
        tracing::debug!(total, amount, "constant percentage withdrawal");
        amount
    }
}

/// Where a constant-dollar policy gets its amount from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DollarBasis {
    Fixed(f64),
    /// A fraction of the portfolio value at the first withdrawal
    InitialPercentage(f64),
}

/// A dollar amount settled on the first call and repeated every year after
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantDollar {
    basis: DollarBasis,
    amount: Option<f64>,
}

impl ConstantDollar {
    #[must_use]
    pub fn fixed(amount: f64) -> Self {
        Self {
            basis: DollarBasis::Fixed(amount),
            amount: None,
        }
    }

    #[must_use]
    pub fn initial_percentage(percentage: f64) -> Self {
        Self {
            basis: DollarBasis::InitialPercentage(normalize_percentage(percentage)),
            amount: None,
        }
    }
}

impl WithdrawalAmountPolicy for ConstantDollar {
    fn how_much(&mut self, _prev_rate: f64, portfolio: &Portfolio) -> f64 {
        let basis = self.basis;
        *self.amount.get_or_insert_with(|| match basis {
            DollarBasis::Fixed(amount) => round_cents(amount),
            DollarBasis::InitialPercentage(p) => round_cents(p * portfolio.total_value()),
        })
    }
}

/// Serializable choice of withdrawal amount policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum HowMuchConfig {
    /// Percentage of the current portfolio value, every year
    ConstantPercent(f64),
    /// Fixed post-tax dollars every year
    ConstantDollar(f64),
    /// Percentage of the starting portfolio value, held in dollars
    InitialPercent(f64),
}

impl Default for HowMuchConfig {
    fn default() -> Self {
        HowMuchConfig::ConstantPercent(0.04)
    }
}

impl HowMuchConfig {
    /// Parse the short `c%` / `c$` / `i%` kinds or their long names
    pub fn from_kind(kind: &str, value: f64) -> Result<Self, ConfigError> {
        match kind {
            "c%" | "constant-percent" => Ok(HowMuchConfig::ConstantPercent(value)),
            "c$" | "constant-dollar" => Ok(HowMuchConfig::ConstantDollar(value)),
            "i%" | "initial-percent" => Ok(HowMuchConfig::InitialPercent(value)),
            other => Err(ConfigError::UnknownHowMuchKind(other.to_string())),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (field, value) = match *self {
            HowMuchConfig::ConstantPercent(v) => ("how_much.constant-percent", v),
            HowMuchConfig::ConstantDollar(v) => ("how_much.constant-dollar", v),
            HowMuchConfig::InitialPercent(v) => ("how_much.initial-percent", v),
        };
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidAmount { field, value });
        }
        Ok(())
    }

    /// A fresh policy with no memoized state
    #[must_use]
    pub fn build(&self) -> Box<dyn WithdrawalAmountPolicy> {
        match *self {
            HowMuchConfig::ConstantPercent(p) => Box::new(ConstantPercentage::new(p)),
            HowMuchConfig::ConstantDollar(amount) => Box::new(ConstantDollar::fixed(amount)),
            HowMuchConfig::InitialPercent(p) => Box::new(ConstantDollar::initial_percentage(p)),
        }
    }
}
