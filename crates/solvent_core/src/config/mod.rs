//! Simulation configuration
//!
//! `SimulationConfig` carries everything a sweep needs: the horizon, rate
//! assumptions, tax rates, the withdrawal policies and the starting accounts.
//! It is read-only once built; every trial builds its own accounts from it.
//!
//! # Builder DSL
//!
//! ```ignore
//! use solvent_core::config::{AccountBuilder, SimulationBuilder};
//! use solvent_core::spending::HowMuchConfig;
//!
//! let config = SimulationBuilder::new()
//!     .years(2025, 2055)
//!     .iterations(1_000)
//!     .how_much(HowMuchConfig::ConstantPercent(4.0))
//!     .account(AccountBuilder::brokerage("Joint").cash(20_000.0).stocks(600_000.0, 350_000.0))
//!     .account(AccountBuilder::roth_ira("Roth").stocks(150_000.0, 90_000.0))
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SimulationError};
use crate::market::RateConfig;
use crate::model::{AccountRecord, Portfolio};
use crate::spending::HowMuchConfig;
use crate::taxes::TaxRates;
use crate::waterfall::WaterfallConfig;

pub mod account_builder;
pub mod builder;

pub use account_builder::AccountBuilder;
pub use builder::SimulationBuilder;

fn default_start_year() -> i32 {
    48
}

fn default_end_year() -> i32 {
    90
}

fn default_iterations() -> usize {
    100
}

/// What to do with a negative inflation draw
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum InflationFloor {
    /// Apply the draw as-is; deflation grows real balances
    #[default]
    None,
    /// Treat negative draws as zero inflation
    Zero,
}

impl InflationFloor {
    #[must_use]
    pub fn apply(self, inflation: f64) -> f64 {
        match self {
            InflationFloor::None => inflation,
            InflationFloor::Zero => inflation.max(0.0),
        }
    }
}

/// Complete sweep configuration
///
/// Years are labels only (ages or calendar years both work); the trial runs
/// `start_year..end_year`, end exclusive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    #[serde(default = "default_end_year")]
    pub end_year: i32,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Base seed for the sweep. `None` draws one from the OS at startup.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub rates: RateConfig,
    #[serde(default)]
    pub inflation_floor: InflationFloor,
    #[serde(default)]
    pub tax_rates: TaxRates,

    #[serde(default)]
    pub how_much: HowMuchConfig,
    #[serde(default)]
    pub waterfall: WaterfallConfig,

    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
            end_year: default_end_year(),
            iterations: default_iterations(),
            seed: None,
            rates: RateConfig::default(),
            inflation_floor: InflationFloor::default(),
            tax_rates: TaxRates::default(),
            how_much: HowMuchConfig::default(),
            waterfall: WaterfallConfig::default(),
            accounts: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Number of simulated years per trial
    #[must_use]
    pub fn num_years(&self) -> usize {
        (self.end_year - self.start_year).max(0) as usize
    }

    /// Check everything that can be checked before a trial runs
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.end_year <= self.start_year {
            return Err(ConfigError::InvalidYearRange {
                start: self.start_year,
                end: self.end_year,
            }
            .into());
        }
        if self.iterations == 0 {
            return Err(ConfigError::NoIterations.into());
        }
        self.rates.validate()?;
        self.tax_rates.validate()?;
        self.how_much.validate()?;
        // Catches malformed records and duplicate names
        Portfolio::from_records(&self.accounts)?;
        self.waterfall.validate(&self.accounts)?;
        Ok(())
    }

    #[must_use]
    pub fn with_how_much(mut self, how_much: HowMuchConfig) -> Self {
        self.how_much = how_much;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
