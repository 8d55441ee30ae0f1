//! Yearly market rates: stock return, bond return and inflation
//!
//! Each series is an independent normal distribution. A series with no
//! standard deviation is deterministic and always yields its mean.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng, distr::Distribution};
use serde::{Deserialize, Serialize};

use crate::error::MarketError;
use crate::money::round_rate;

/// Mean and optional standard deviation of one yearly rate series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RateProfile {
    pub mean: f64,
    #[serde(default)]
    pub std_dev: Option<f64>,
}

impl RateProfile {
    #[must_use]
    pub const fn fixed(mean: f64) -> Self {
        Self {
            mean,
            std_dev: None,
        }
    }

    #[must_use]
    pub const fn normal(mean: f64, std_dev: f64) -> Self {
        Self {
            mean,
            std_dev: Some(std_dev),
        }
    }

    /// Whether every draw returns the mean
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        matches!(self.std_dev, None | Some(0.0))
    }

    fn check(&self, series: &'static str) -> Result<(), MarketError> {
        let invalid = |reason| MarketError::InvalidDistributionParameters {
            series,
            mean: self.mean,
            std_dev: self.std_dev.unwrap_or(0.0),
            reason,
        };
        if !self.mean.is_finite() {
            return Err(invalid("mean must be finite"));
        }
        match self.std_dev {
            Some(sd) if !sd.is_finite() || sd < 0.0 => {
                Err(invalid("std_dev must be non-negative and finite"))
            }
            _ => Ok(()),
        }
    }

    /// Draw one yearly rate, rounded to 4 decimal places
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        series: &'static str,
    ) -> Result<f64, MarketError> {
        self.check(series)?;
        match self.std_dev {
            None | Some(0.0) => Ok(self.mean),
            Some(std_dev) => rand_distr::Normal::new(self.mean, std_dev)
                .map(|d| round_rate(d.sample(rng)))
                .map_err(|_| MarketError::InvalidDistributionParameters {
                    series,
                    mean: self.mean,
                    std_dev,
                    reason: "std_dev must be non-negative and finite",
                }),
        }
    }
}

/// Parameters for all three rate series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RateConfig {
    pub stocks: RateProfile,
    pub bonds: RateProfile,
    pub inflation: RateProfile,
}

impl RateConfig {
    // S&P 500 (SPY): 9.02% mean, 16.49% std dev
    pub const SPY_HISTORICAL: RateProfile = RateProfile::normal(0.0902, 0.1649);
    // US total bond market (BND): 4.51% mean, 4.33% std dev
    pub const BND_HISTORICAL: RateProfile = RateProfile::normal(0.0451, 0.0433);
    // Long-run US CPI: 3.0% mean, 1.3% std dev
    pub const CPI_HISTORICAL: RateProfile = RateProfile::normal(0.03, 0.013);

    /// Zero returns and zero inflation every year
    #[must_use]
    pub const fn flat() -> Self {
        Self {
            stocks: RateProfile::fixed(0.0),
            bonds: RateProfile::fixed(0.0),
            inflation: RateProfile::fixed(0.0),
        }
    }

    pub fn validate(&self) -> Result<(), MarketError> {
        self.stocks.check("stock return")?;
        self.bonds.check("bond return")?;
        self.inflation.check("inflation")?;
        if self.inflation.mean <= -1.0 {
            return Err(MarketError::InvalidDistributionParameters {
                series: "inflation",
                mean: self.inflation.mean,
                std_dev: self.inflation.std_dev.unwrap_or(0.0),
                reason: "mean inflation must be above -100%",
            });
        }
        Ok(())
    }
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            stocks: Self::SPY_HISTORICAL,
            bonds: Self::BND_HISTORICAL,
            inflation: RateProfile::fixed(0.02),
        }
    }
}

/// Draws yearly rates from its own seeded random source
#[derive(Debug, Clone)]
pub struct RateGenerator<R = SmallRng> {
    config: RateConfig,
    rng: R,
}

impl RateGenerator<SmallRng> {
    #[must_use]
    pub fn from_seed(config: RateConfig, seed: u64) -> Self {
        Self::new(config, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RateGenerator<R> {
    #[must_use]
    pub fn new(config: RateConfig, rng: R) -> Self {
        Self { config, rng }
    }

    #[must_use]
    pub fn config(&self) -> &RateConfig {
        &self.config
    }

    pub fn set_stock_params(&mut self, mean: f64, std_dev: Option<f64>) {
        self.config.stocks = RateProfile { mean, std_dev };
    }

    pub fn set_bond_params(&mut self, mean: f64, std_dev: Option<f64>) {
        self.config.bonds = RateProfile { mean, std_dev };
    }

    pub fn set_inflation_params(&mut self, mean: f64, std_dev: Option<f64>) {
        self.config.inflation = RateProfile { mean, std_dev };
    }

    pub fn generate_stock_return(&mut self) -> Result<f64, MarketError> {
        self.config.stocks.sample(&mut self.rng, "stock return")
    }

    pub fn generate_bond_return(&mut self) -> Result<f64, MarketError> {
        self.config.bonds.sample(&mut self.rng, "bond return")
    }

    pub fn generate_inflation(&mut self) -> Result<f64, MarketError> {
        self.config.inflation.sample(&mut self.rng, "inflation")
    }
}
