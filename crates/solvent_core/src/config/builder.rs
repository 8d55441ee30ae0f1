//! Simulation Builder
//!
//! Fluent construction of a validated `SimulationConfig`.
//!
//! ```ignore
//! use solvent_core::config::{AccountBuilder, SimulationBuilder};
//! use solvent_core::market::RateProfile;
//!
//! let config = SimulationBuilder::new()
//!     .years(48, 90)
//!     .seed(7)
//!     .stocks(RateProfile::normal(0.0902, 0.1649))
//!     .inflation(RateProfile::fixed(0.02))
//!     .account(AccountBuilder::four_01k("Work 401k").stocks(400_000.0, 250_000.0))
//!     .named_order(["Work 401k"])
//!     .build()?;
//! ```

use super::{InflationFloor, SimulationConfig};
use super::account_builder::AccountBuilder;
use crate::error::SimulationError;
use crate::market::{RateConfig, RateProfile};
use crate::spending::HowMuchConfig;
use crate::taxes::TaxRates;
use crate::waterfall::WaterfallConfig;

#[derive(Debug, Clone, Default)]
pub struct SimulationBuilder {
    config: SimulationConfig,
}

impl SimulationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate `start..end`, end exclusive
    #[must_use]
    pub fn years(mut self, start: i32, end: i32) -> Self {
        self.config.start_year = start;
        self.config.end_year = end;
        self
    }

    #[must_use]
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.config.iterations = iterations;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn rates(mut self, rates: RateConfig) -> Self {
        self.config.rates = rates;
        self
    }

    #[must_use]
    pub fn stocks(mut self, profile: RateProfile) -> Self {
        self.config.rates.stocks = profile;
        self
    }

    #[must_use]
    pub fn bonds(mut self, profile: RateProfile) -> Self {
        self.config.rates.bonds = profile;
        self
    }

    #[must_use]
    pub fn inflation(mut self, profile: RateProfile) -> Self {
        self.config.rates.inflation = profile;
        self
    }

    #[must_use]
    pub fn inflation_floor(mut self, floor: InflationFloor) -> Self {
        self.config.inflation_floor = floor;
        self
    }

    #[must_use]
    pub fn tax_rates(mut self, capital_gains: f64, income: f64) -> Self {
        self.config.tax_rates = TaxRates {
            capital_gains,
            income,
        };
        self
    }

    #[must_use]
    pub fn how_much(mut self, how_much: HowMuchConfig) -> Self {
        self.config.how_much = how_much;
        self
    }

    #[must_use]
    pub fn named_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.waterfall = WaterfallConfig::NamedOrder {
            order: order.into_iter().map(Into::into).collect(),
        };
        self
    }

    #[must_use]
    pub fn tax_paid_first(mut self) -> Self {
        self.config.waterfall = WaterfallConfig::TaxPaidFirst;
        self
    }

    #[must_use]
    pub fn account(mut self, account: AccountBuilder) -> Self {
        self.config.accounts.push(account.build());
        self
    }

    /// Validate and return the finished config
    pub fn build(self) -> Result<SimulationConfig, SimulationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
