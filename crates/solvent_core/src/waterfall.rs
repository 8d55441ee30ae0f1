//! Portfolio-level withdrawal ordering
//!
//! A waterfall decides which accounts cover a post-tax cash need and in what
//! order. Each account is asked for whatever is still needed; an account that
//! cannot cover it is drained and the rest rolls on to the next account.

use serde::{Deserialize, Serialize};

use crate::error::{AccountingError, ConfigError, WithdrawalError};
use crate::model::{Account, AccountRecord, Portfolio};
use crate::money::round_cents;
use crate::taxes::TaxManager;

/// Outcome of one portfolio-level withdrawal
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Withdrawal {
    pub requested: f64,
    pub delivered: f64,
    pub tax_paid: f64,
}

impl Withdrawal {
    /// Post-tax dollars the portfolio could not provide
    #[must_use]
    pub fn shortfall(&self) -> f64 {
        round_cents(self.requested - self.delivered).max(0.0)
    }
}

pub trait WithdrawalWaterfall: Send + Sync {
    fn withdraw(
        &self,
        portfolio: &mut Portfolio,
        tax_manager: &TaxManager,
        need: f64,
    ) -> Result<Withdrawal, WithdrawalError>;
}

/// Ask each account in turn for the remaining need until it is met.
/// Returns `(delivered, tax_paid)`.
fn run_withdrawal<'a>(
    accounts: impl IntoIterator<Item = &'a mut Account>,
    tax_manager: &TaxManager,
    need: f64,
) -> Result<(f64, f64), AccountingError> {
    let mut remaining = need;
    let mut total_tax = 0.0;

    for account in accounts {
        if remaining <= 0.0 {
            break;
        }
        let (delivered, tax) = account.withdraw(tax_manager, remaining)?;
        tracing::debug!(
            account = account.name(),
            delivered,
            tax,
            "withdrew from account"
        );
        remaining = round_cents(remaining - delivered);
        total_tax += tax;
    }

    Ok((round_cents(need - remaining), round_cents(total_tax)))
}

/// Draw from accounts in an explicit, named order
#[derive(Debug, Clone, PartialEq)]
pub struct NamedOrder {
    order: Vec<String>,
}

impl NamedOrder {
    #[must_use]
    pub fn new(order: Vec<String>) -> Self {
        Self { order }
    }
}

impl WithdrawalWaterfall for NamedOrder {
    fn withdraw(
        &self,
        portfolio: &mut Portfolio,
        tax_manager: &TaxManager,
        need: f64,
    ) -> Result<Withdrawal, WithdrawalError> {
        let need = need.max(0.0);
        let mut remaining = need;
        let mut total_tax = 0.0;

        for name in &self.order {
            if remaining <= 0.0 {
                break;
            }
            let account = portfolio.account_mut(name)?;
            let (delivered, tax) = run_withdrawal([account], tax_manager, remaining)?;
            remaining = round_cents(remaining - delivered);
            total_tax += tax;
        }

        Ok(Withdrawal {
            requested: need,
            delivered: round_cents(need - remaining),
            tax_paid: round_cents(total_tax),
        })
    }
}

/// Drain accounts whose money is already taxed, then the tax-deferred ones
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TaxPaidFirst;

impl WithdrawalWaterfall for TaxPaidFirst {
    fn withdraw(
        &self,
        portfolio: &mut Portfolio,
        tax_manager: &TaxManager,
        need: f64,
    ) -> Result<Withdrawal, WithdrawalError> {
        let need = need.max(0.0);

        let tax_paid_accounts = portfolio
            .accounts_mut()
            .filter(|a| a.tax_category().is_tax_paid());
        let (first_delivered, first_tax) = run_withdrawal(tax_paid_accounts, tax_manager, need)?;

        let mut delivered = first_delivered;
        let mut tax_paid = first_tax;
        let still_needed = round_cents(need - first_delivered);
        if still_needed > 0.0 {
            let deferred_accounts = portfolio
                .accounts_mut()
                .filter(|a| !a.tax_category().is_tax_paid());
            let (more, more_tax) = run_withdrawal(deferred_accounts, tax_manager, still_needed)?;
            delivered += more;
            tax_paid += more_tax;
        }

        Ok(Withdrawal {
            requested: need,
            delivered: round_cents(delivered),
            tax_paid: round_cents(tax_paid),
        })
    }
}

/// Serializable choice of waterfall
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum WaterfallConfig {
    NamedOrder {
        order: Vec<String>,
    },
    #[default]
    TaxPaidFirst,
}

impl WaterfallConfig {
    /// Every named account must exist among the records
    pub fn validate(&self, records: &[AccountRecord]) -> Result<(), ConfigError> {
        if let WaterfallConfig::NamedOrder { order } = self {
            for name in order {
                if !records.iter().any(|r| &r.name == name) {
                    return Err(ConfigError::UnknownAccount(name.clone()));
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn build(&self) -> Box<dyn WithdrawalWaterfall> {
        match self {
            WaterfallConfig::NamedOrder { order } => Box::new(NamedOrder::new(order.clone())),
            WaterfallConfig::TaxPaidFirst => Box::new(TaxPaidFirst),
        }
    }
}
