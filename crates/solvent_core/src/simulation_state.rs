//! Mutable state of one trial
//!
//! Everything here is owned by a single trial: its accounts, its rate
//! generator and its (possibly memoizing) withdrawal policy. Nothing is shared
//! between trials except the read-only `SimulationConfig`.

use crate::config::{InflationFloor, SimulationConfig};
use crate::error::SimulationError;
use crate::market::RateGenerator;
use crate::model::{AccountSnapshot, Portfolio, TrialResult, YearRecord};
use crate::money::{SURVIVAL_THRESHOLD, round_rate};
use crate::spending::WithdrawalAmountPolicy;
use crate::taxes::TaxManager;
use crate::waterfall::WithdrawalWaterfall;

/// How many early draws to include when warning about a depleted portfolio
const DEPLETION_REPORT_YEARS: usize = 5;

pub struct TrialState {
    pub seed: u64,
    pub portfolio: Portfolio,
    pub tax_manager: TaxManager,
    pub rates: RateGenerator,
    pub how_much: Box<dyn WithdrawalAmountPolicy>,
    pub waterfall: Box<dyn WithdrawalWaterfall>,
    pub inflation_floor: InflationFloor,
    /// Realized withdrawal rate of the previous year
    pub prev_rate: f64,
    pub history: Vec<YearRecord>,
    start_value: f64,
    start_accounts: Vec<AccountSnapshot>,
    depletion_reported: bool,
}

impl TrialState {
    pub fn from_config(config: &SimulationConfig, seed: u64) -> Result<Self, SimulationError> {
        let portfolio = Portfolio::from_records(&config.accounts)?;
        let start_value = portfolio.total_value();
        let start_accounts = portfolio.snapshots();

        Ok(Self {
            seed,
            portfolio,
            tax_manager: TaxManager::new(config.tax_rates),
            rates: RateGenerator::from_seed(config.rates, seed),
            how_much: config.how_much.build(),
            waterfall: config.waterfall.build(),
            inflation_floor: config.inflation_floor,
            prev_rate: 0.0,
            history: Vec::with_capacity(config.num_years()),
            start_value,
            start_accounts,
            depletion_reported: false,
        })
    }

    /// Run one year: draw rates, withdraw, then move the market
    pub fn advance_year(&mut self, year: i32) -> Result<(), SimulationError> {
        let inflation = self.inflation_floor.apply(self.rates.generate_inflation()?);
        let stock_return = self.rates.generate_stock_return()?;
        let bond_return = self.rates.generate_bond_return()?;

        let total_value = self.portfolio.total_value();
        tracing::debug!(
            year,
            total_value,
            inflation,
            stock_return,
            bond_return,
            "starting year"
        );
        if total_value < SURVIVAL_THRESHOLD && !self.depletion_reported {
            self.report_depletion(year, inflation, stock_return, bond_return);
        }

        let requested = self.how_much.how_much(self.prev_rate, &self.portfolio);
        let withdrawal = self
            .waterfall
            .withdraw(&mut self.portfolio, &self.tax_manager, requested)
            .map_err(|e| SimulationError::from_withdrawal(year, e))?;
        tracing::debug!(
            year,
            requested,
            delivered = withdrawal.delivered,
            tax_paid = withdrawal.tax_paid,
            shortfall = withdrawal.shortfall(),
            "withdrawal"
        );

        let withdrawal_rate = if total_value > 0.0 {
            round_rate(withdrawal.delivered / total_value)
        } else {
            0.0
        };
        self.prev_rate = withdrawal_rate;

        let accounts = self.portfolio.snapshots();
        self.portfolio.apply_market(stock_return, bond_return, inflation);

        self.history.push(YearRecord {
            year,
            total_value,
            requested,
            delivered: withdrawal.delivered,
            tax_paid: withdrawal.tax_paid,
            withdrawal_rate,
            inflation,
            stock_return,
            bond_return,
            accounts,
        });
        Ok(())
    }

    fn report_depletion(&mut self, year: i32, inflation: f64, stock: f64, bond: f64) {
        self.depletion_reported = true;
        let first = |f: fn(&YearRecord) -> f64, current: f64| {
            self.history
                .iter()
                .map(f)
                .chain(std::iter::once(current))
                .take(DEPLETION_REPORT_YEARS)
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        tracing::warn!(
            seed = self.seed,
            year,
            "portfolio hit zero; first inflation: [{}]; first stock returns: [{}]; first bond returns: [{}]",
            first(|y| y.inflation, inflation),
            first(|y| y.stock_return, stock),
            first(|y| y.bond_return, bond),
        );
    }

    pub fn into_result(self) -> TrialResult {
        TrialResult {
            seed: self.seed,
            start_value: self.start_value,
            start_accounts: self.start_accounts,
            end_value: self.portfolio.total_value(),
            years: self.history,
        }
    }
}
