//! Flat per-category tax model used by every withdrawal
//!
//! Each account category maps to a single marginal rate: the capital gains
//! rate for brokerage accounts, the income rate for tax-deferred accounts and
//! zero for Roth accounts. The bracket tables at the bottom of this module are
//! an alternative progressive model; withdrawals do not consult them.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, LookupError};
use crate::model::TaxCategory;
use crate::money::round_cents;

/// Flat marginal rates applied to withdrawals
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TaxRates {
    /// Applied to brokerage withdrawals (15% at ~$120k income)
    pub capital_gains: f64,
    /// Applied to 401k, rollover and traditional IRA withdrawals (14.7% at ~$120k)
    pub income: f64,
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            capital_gains: 0.15,
            income: 0.147,
        }
    }
}

impl TaxRates {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("tax_rates.capital_gains", self.capital_gains),
            ("tax_rates.income", self.income),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(ConfigError::InvalidAmount { field, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TaxManager {
    rates: TaxRates,
}

impl TaxManager {
    #[must_use]
    pub fn new(rates: TaxRates) -> Self {
        Self { rates }
    }

    #[must_use]
    pub fn rates(&self) -> TaxRates {
        self.rates
    }

    #[must_use]
    pub fn get_rate(&self, category: TaxCategory) -> f64 {
        match category {
            TaxCategory::Brokerage => self.rates.capital_gains,
            TaxCategory::FourOhOneK | TaxCategory::RolloverIra | TaxCategory::TradIra => {
                self.rates.income
            }
            TaxCategory::RothIra => 0.0,
        }
    }

    /// Split a pre-tax amount into `(post_tax, tax)`. Both are in cents and
    /// add back up to `pretax`.
    #[must_use]
    pub fn split_it(&self, category: TaxCategory, pretax: f64) -> (f64, f64) {
        let tax = round_cents(self.get_rate(category) * pretax);
        let post_tax = round_cents(pretax - tax);
        (post_tax, tax)
    }

    /// Pre-tax amount whose `split_it` nets approximately `post_tax`.
    ///
    /// Rounding means the round trip is only exact to within a cent or so.
    #[must_use]
    pub fn how_much_pretax(&self, category: TaxCategory, post_tax: f64) -> f64 {
        round_cents(post_tax / (1.0 - self.get_rate(category)))
    }
}

// ============================================================================
// Progressive bracket tables (not wired into withdrawals)
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TaxBracket {
    pub rate: f64,
    /// Upper bound of the bracket, inclusive
    pub end: f64,
    /// Total tax owed on income up to the start of this bracket, when known
    pub prev_tax: Option<f64>,
}

/// Contiguous brackets starting at zero
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    #[must_use]
    pub fn new(brackets: Vec<TaxBracket>) -> Self {
        Self { brackets }
    }

    /// 2022 married-filing-jointly ordinary income brackets
    #[must_use]
    pub fn income_2022() -> Self {
        let rows = [
            (0.10, 20_550.0, 0.0),
            (0.12, 83_550.0, 2_055.0),
            (0.22, 178_150.0, 9_615.0),
            (0.24, 340_100.0, 30_427.0),
            (0.32, 431_900.0, 69_295.0),
            (0.35, 647_850.0, 98_671.0),
            (0.37, 1_000_000_000_000.0, 174_253.5),
        ];
        Self::new(
            rows.into_iter()
                .map(|(rate, end, prev_tax)| TaxBracket {
                    rate,
                    end,
                    prev_tax: Some(prev_tax),
                })
                .collect(),
        )
    }

    /// 2022 married-filing-jointly long-term capital gains brackets
    #[must_use]
    pub fn capital_gains_2022() -> Self {
        let rows = [
            (0.00, 41_675.0),
            (0.15, 459_750.0),
            (0.20, 1_000_000_000_000.0),
        ];
        Self::new(
            rows.into_iter()
                .map(|(rate, end)| TaxBracket {
                    rate,
                    end,
                    prev_tax: None,
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Marginal rate and `prev_tax` of the bracket containing `value`
    pub fn lookup(&self, value: f64) -> Result<(f64, Option<f64>), LookupError> {
        if value < 0.0 || !value.is_finite() {
            return Err(LookupError::NoMatchingBracket(value));
        }
        self.brackets
            .iter()
            .find(|b| value <= b.end)
            .map(|b| (b.rate, b.prev_tax))
            .ok_or(LookupError::NoMatchingBracket(value))
    }

    /// Progressive tax owed on `income`
    pub fn tax_on(&self, income: f64) -> Result<f64, LookupError> {
        // Validates the range before summing
        self.lookup(income)?;

        let mut tax = 0.0;
        let mut start = 0.0;
        for bracket in &self.brackets {
            if income <= start {
                break;
            }
            tax += (income.min(bracket.end) - start) * bracket.rate;
            start = bracket.end;
        }
        Ok(round_cents(tax))
    }
}
