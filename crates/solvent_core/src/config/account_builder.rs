//! Account Builder DSL
//!
//! Provides a fluent API for creating account records with preset tax
//! categories.
//!
//! # Examples
//!
//! ```ignore
//! use solvent_core::config::AccountBuilder;
//!
//! let brokerage = AccountBuilder::brokerage("Joint E*Trade")
//!     .cash(10_000.0)
//!     .stocks(250_000.0, 180_000.0)
//!     .build();
//!
//! let roth = AccountBuilder::roth_ira("Roth IRA")
//!     .bonds(40_000.0, 40_000.0)
//!     .build();
//! ```

use crate::model::{AccountRecord, Holding, Holdings, TaxCategory};

/// Builder for account records
#[derive(Debug, Clone)]
pub struct AccountBuilder {
    name: String,
    tax_category: TaxCategory,
    holdings: Holdings,
}

impl AccountBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>, tax_category: TaxCategory) -> Self {
        Self {
            name: name.into(),
            tax_category,
            holdings: Holdings::default(),
        }
    }

    /// Taxable brokerage: withdrawals taxed at the capital gains rate
    #[must_use]
    pub fn brokerage(name: impl Into<String>) -> Self {
        Self::new(name, TaxCategory::Brokerage)
    }

    /// Employer 401(k): withdrawals taxed as income
    #[must_use]
    pub fn four_01k(name: impl Into<String>) -> Self {
        Self::new(name, TaxCategory::FourOhOneK)
    }

    #[must_use]
    pub fn rollover_ira(name: impl Into<String>) -> Self {
        Self::new(name, TaxCategory::RolloverIra)
    }

    /// Roth IRA: withdrawals tax-free
    #[must_use]
    pub fn roth_ira(name: impl Into<String>) -> Self {
        Self::new(name, TaxCategory::RothIra)
    }

    #[must_use]
    pub fn traditional_ira(name: impl Into<String>) -> Self {
        Self::new(name, TaxCategory::TradIra)
    }

    /// Cash balance; cash basis always equals its balance
    #[must_use]
    pub fn cash(mut self, balance: f64) -> Self {
        self.holdings.cash = Holding::new(balance, balance);
        self
    }

    #[must_use]
    pub fn stocks(mut self, balance: f64, basis: f64) -> Self {
        self.holdings.stocks = Holding::new(basis, balance);
        self
    }

    #[must_use]
    pub fn bonds(mut self, balance: f64, basis: f64) -> Self {
        self.holdings.bonds = Holding::new(basis, balance);
        self
    }

    #[must_use]
    pub fn build(self) -> AccountRecord {
        AccountRecord {
            name: self.name,
            tax_category: self.tax_category,
            holdings: self.holdings,
        }
    }
}
