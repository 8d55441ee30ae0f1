//! Account definitions
//!
//! An account is a named container of three holdings (cash, stocks, bonds)
//! with a single tax treatment. Accounts are rebuilt from their records at the
//! start of every trial and mutated year by year.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AccountingError, ConfigError};
use crate::money::{WITHDRAWAL_TOLERANCE, round_cents};
use crate::taxes::TaxManager;

/// Smallest `1 + inflation` divisor; deflation is capped at -99% a year
const MIN_DEFLATOR: f64 = 0.01;

/// Tax treatment of an account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaxCategory {
    /// Regular brokerage - withdrawals taxed at the capital gains rate
    Brokerage,
    /// Employer 401(k) - withdrawals taxed as income
    #[serde(rename = "401k")]
    FourOhOneK,
    #[serde(rename = "RolloverIRA")]
    RolloverIra,
    /// Roth IRA - withdrawals tax-free
    #[serde(rename = "RothIRA")]
    RothIra,
    #[serde(rename = "TradIRA")]
    TradIra,
}

impl TaxCategory {
    pub const ALL: [TaxCategory; 5] = [
        TaxCategory::Brokerage,
        TaxCategory::FourOhOneK,
        TaxCategory::RolloverIra,
        TaxCategory::RothIra,
        TaxCategory::TradIra,
    ];

    /// Whether the money in this account has already been taxed on the way in.
    /// The tax-paid-first waterfall drains these before the tax-deferred ones.
    #[must_use]
    pub fn is_tax_paid(self) -> bool {
        matches!(self, TaxCategory::Brokerage | TaxCategory::RothIra)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TaxCategory::Brokerage => "Brokerage",
            TaxCategory::FourOhOneK => "401k",
            TaxCategory::RolloverIra => "RolloverIRA",
            TaxCategory::RothIra => "RothIRA",
            TaxCategory::TradIra => "TradIRA",
        }
    }
}

impl fmt::Display for TaxCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxCategory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaxCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownTaxCategory(s.to_string()))
    }
}

/// One of the three asset classes an account holds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Cash,
    Stocks,
    Bonds,
}

impl Bucket {
    /// Withdrawal order within an account
    pub const ALL: [Bucket; 3] = [Bucket::Cash, Bucket::Stocks, Bucket::Bonds];
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Cash => f.write_str("cash"),
            Bucket::Stocks => f.write_str("stocks"),
            Bucket::Bonds => f.write_str("bonds"),
        }
    }
}

/// Cost basis and current balance of one bucket, in dollars
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Holding {
    #[serde(default)]
    pub basis: f64,
    #[serde(default)]
    pub balance: f64,
}

impl Holding {
    #[must_use]
    pub fn new(basis: f64, balance: f64) -> Self {
        Self { basis, balance }
    }
}

/// The three buckets of an account. Missing buckets deserialize as zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Holdings {
    #[serde(default)]
    pub cash: Holding,
    #[serde(default)]
    pub stocks: Holding,
    #[serde(default)]
    pub bonds: Holding,
}

impl Holdings {
    #[must_use]
    pub fn get(&self, bucket: Bucket) -> &Holding {
        match bucket {
            Bucket::Cash => &self.cash,
            Bucket::Stocks => &self.stocks,
            Bucket::Bonds => &self.bonds,
        }
    }

    pub fn get_mut(&mut self, bucket: Bucket) -> &mut Holding {
        match bucket {
            Bucket::Cash => &mut self.cash,
            Bucket::Stocks => &mut self.stocks,
            Bucket::Bonds => &mut self.bonds,
        }
    }
}

/// Account definition as produced by a statement parser or a scenario file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountRecord {
    pub name: String,
    pub tax_category: TaxCategory,
    #[serde(default)]
    pub holdings: Holdings,
}

impl AccountRecord {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MalformedAccount {
                name: self.name.clone(),
                reason: "account name is empty",
            });
        }
        for bucket in Bucket::ALL {
            let holding = self.holdings.get(bucket);
            if !holding.balance.is_finite() || !holding.basis.is_finite() {
                return Err(ConfigError::MalformedAccount {
                    name: self.name.clone(),
                    reason: "holding amounts must be finite",
                });
            }
            if holding.balance < 0.0 || holding.basis < 0.0 {
                return Err(ConfigError::MalformedAccount {
                    name: self.name.clone(),
                    reason: "holding amounts must not be negative",
                });
            }
        }
        Ok(())
    }
}

/// Point-in-time balances of an account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountSnapshot {
    pub name: String,
    pub tax_category: TaxCategory,
    pub cash: f64,
    pub stocks: f64,
    pub bonds: f64,
}

impl AccountSnapshot {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.cash + self.stocks + self.bonds
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    name: String,
    tax_category: TaxCategory,
    holdings: Holdings,
}

impl Account {
    pub fn from_record(record: &AccountRecord) -> Result<Self, ConfigError> {
        record.validate()?;
        let mut holdings = record.holdings;
        for bucket in Bucket::ALL {
            let holding = holdings.get_mut(bucket);
            holding.basis = round_cents(holding.basis);
            holding.balance = round_cents(holding.balance);
        }
        Ok(Self {
            name: record.name.clone(),
            tax_category: record.tax_category,
            holdings,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn tax_category(&self) -> TaxCategory {
        self.tax_category
    }

    #[must_use]
    pub fn holdings(&self) -> &Holdings {
        &self.holdings
    }

    #[must_use]
    pub fn value(&self, bucket: Bucket) -> f64 {
        self.holdings.get(bucket).balance
    }

    #[must_use]
    pub fn total_value(&self) -> f64 {
        Bucket::ALL.into_iter().map(|b| self.value(b)).sum()
    }

    /// Overwrite a bucket balance, rounded to cents
    pub fn set_value(&mut self, bucket: Bucket, value: f64) {
        self.holdings.get_mut(bucket).balance = round_cents(value);
    }

    /// Scale stocks and bonds by one year of market return. Cash is untouched.
    /// A loss beyond -100% wipes the bucket out rather than driving it negative.
    pub fn apply_returns(&mut self, stock_return: f64, bond_return: f64) {
        let growth = |r: f64| (1.0 + r).max(0.0);
        self.set_value(Bucket::Stocks, self.value(Bucket::Stocks) * growth(stock_return));
        self.set_value(Bucket::Bonds, self.value(Bucket::Bonds) * growth(bond_return));
    }

    /// Deflate stocks and bonds into today's dollars. Cash is untouched.
    pub fn apply_inflation(&mut self, inflation: f64) {
        let deflator = (1.0 + inflation).max(MIN_DEFLATOR);
        self.set_value(Bucket::Stocks, self.value(Bucket::Stocks) / deflator);
        self.set_value(Bucket::Bonds, self.value(Bucket::Bonds) / deflator);
    }

    #[must_use]
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            name: self.name.clone(),
            tax_category: self.tax_category,
            cash: self.value(Bucket::Cash),
            stocks: self.value(Bucket::Stocks),
            bonds: self.value(Bucket::Bonds),
        }
    }

    /// Draw up to `amount_pre` pre-tax dollars from cash, then stocks, then
    /// bonds. Each draw is taxed at the account's flat rate.
    ///
    /// Returns `(post_tax, tax)` accumulated over every bucket touched.
    pub fn withdraw_pretax(&mut self, tax_manager: &TaxManager, amount_pre: f64) -> (f64, f64) {
        let mut remaining_pre = round_cents(amount_pre.max(0.0));
        let mut total_post = 0.0;
        let mut total_tax = 0.0;

        for bucket in Bucket::ALL {
            if remaining_pre <= 0.0 {
                break;
            }
            let holding = self.holdings.get_mut(bucket);
            let drawn = holding.balance.min(remaining_pre);
            if drawn <= 0.0 {
                continue;
            }
            holding.balance = round_cents(holding.balance - drawn);
            remaining_pre = round_cents(remaining_pre - drawn);

            let (post, tax) = tax_manager.split_it(self.tax_category, drawn);
            total_post += post;
            total_tax += tax;
        }

        (round_cents(total_post), round_cents(total_tax))
    }

    /// Withdraw enough pre-tax dollars to net `amount_post` after tax.
    ///
    /// Returns `(post_tax_delivered, tax_paid)`. Delivering less than asked is
    /// only allowed once the account has been drained.
    pub fn withdraw(
        &mut self,
        tax_manager: &TaxManager,
        amount_post: f64,
    ) -> Result<(f64, f64), AccountingError> {
        if amount_post <= 0.0 {
            self.check_balances()?;
            return Ok((0.0, 0.0));
        }

        let amount_pre = tax_manager.how_much_pretax(self.tax_category, amount_post);
        let (total_post, total_tax) = self.withdraw_pretax(tax_manager, amount_pre);
        self.reconcile(amount_post, total_post)?;

        Ok((total_post, total_tax))
    }

    /// Check a delivery of `total_post` against a request of `amount_post`
    fn reconcile(&self, amount_post: f64, total_post: f64) -> Result<(), AccountingError> {
        let shortfall = amount_post - total_post;
        if -shortfall > WITHDRAWAL_TOLERANCE {
            return Err(AccountingError::Overdrawn {
                account: self.name.clone(),
                requested: amount_post,
                delivered: total_post,
            });
        }
        let remaining_balance = self.total_value();
        if shortfall > WITHDRAWAL_TOLERANCE && remaining_balance > 0.0 {
            return Err(AccountingError::MoneyRemaining {
                account: self.name.clone(),
                shortfall,
                remaining_balance,
            });
        }
        self.check_balances()
    }

    fn check_balances(&self) -> Result<(), AccountingError> {
        match Bucket::ALL.into_iter().find(|b| self.value(*b) < 0.0) {
            Some(bucket) => Err(AccountingError::NegativeBalance {
                account: self.name.clone(),
                bucket,
                balance: self.value(bucket),
            }),
            None => Ok(()),
        }
    }
}
