//! Tests for Monte Carlo sweeps
//!
//! These tests verify:
//! - Trial counts across batch boundaries
//! - Seeded sweeps are reproducible regardless of scheduling
//! - Success rate and summary statistics
//! - Config errors surface before any trial runs

use super::account;
use crate::config::{AccountBuilder, SimulationBuilder, SimulationConfig};
use crate::error::{ConfigError, MarketError, SimulationError};
use crate::market::{RateConfig, RateProfile};
use crate::model::TaxCategory;
use crate::simulation::{monte_carlo_simulate, simulate};
use crate::spending::HowMuchConfig;
use crate::waterfall::WaterfallConfig;

fn retiree() -> SimulationBuilder {
    SimulationBuilder::new()
        .years(60, 90)
        .how_much(HowMuchConfig::InitialPercent(4.0))
        .account(
            AccountBuilder::brokerage("Brokerage")
                .cash(20_000.0)
                .stocks(500_000.0, 300_000.0),
        )
        .account(
            AccountBuilder::four_01k("401k")
                .stocks(300_000.0, 300_000.0)
                .bonds(200_000.0, 200_000.0),
        )
        .account(AccountBuilder::roth_ira("Roth").stocks(100_000.0, 60_000.0))
}

#[test]
fn test_trial_count_spans_partial_batch() {
    let config = retiree().iterations(250).seed(5).build().unwrap();

    let sweep = monte_carlo_simulate(&config).unwrap();

    assert_eq!(sweep.trials.len(), 250);
    assert_eq!(sweep.base_seed, 5);
    assert!(sweep.trials.iter().all(|t| t.years.len() == 30));
}

#[test]
fn test_seeded_sweep_is_reproducible() {
    let config = retiree().iterations(120).seed(1234).build().unwrap();

    let first = monte_carlo_simulate(&config).unwrap();
    let second = monte_carlo_simulate(&config).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.summary(), second.summary());
}

#[test]
fn test_trials_replay_from_their_seed() {
    let config = retiree().iterations(10).seed(9).build().unwrap();

    let sweep = monte_carlo_simulate(&config).unwrap();

    let trial = &sweep.trials[3];
    assert_eq!(&simulate(&config, trial.seed).unwrap(), trial);
}

#[test]
fn test_trials_get_distinct_seeds() {
    let config = retiree().iterations(300).seed(42).build().unwrap();

    let sweep = monte_carlo_simulate(&config).unwrap();

    let mut seeds: Vec<u64> = sweep.trials.iter().map(|t| t.seed).collect();
    seeds.sort_unstable();
    seeds.dedup();
    assert_eq!(seeds.len(), 300);
}

#[test]
fn test_rich_flat_portfolio_always_succeeds() {
    let config = retiree()
        .rates(RateConfig::flat())
        .how_much(HowMuchConfig::ConstantDollar(20_000.0))
        .iterations(50)
        .seed(0)
        .build()
        .unwrap();

    let sweep = monte_carlo_simulate(&config).unwrap();

    assert_eq!(sweep.succeeded(), 50);
    assert_eq!(sweep.success_rate(), 1.0);
}

#[test]
fn test_oversized_withdrawal_always_fails() {
    let config = SimulationBuilder::new()
        .years(0, 10)
        .iterations(40)
        .seed(8)
        .rates(RateConfig::flat())
        .how_much(HowMuchConfig::ConstantDollar(100_000.0))
        .account(AccountBuilder::roth_ira("Roth").cash(300_000.0))
        .build()
        .unwrap();

    let sweep = monte_carlo_simulate(&config).unwrap();

    assert_eq!(sweep.success_rate(), 0.0);
    let summary = sweep.summary();
    assert_eq!(summary.iterations, 40);
    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.final_value_p95, 0.0);
}

#[test]
fn test_summary_percentiles_are_ordered() {
    let config = retiree().iterations(200).seed(31).build().unwrap();

    let summary = monte_carlo_simulate(&config).unwrap().summary();

    assert!(summary.final_value_p5 <= summary.final_value_p50);
    assert!(summary.final_value_p50 <= summary.final_value_p95);
    assert!((0.0..=1.0).contains(&summary.success_rate));
    assert!(summary.mean_tax_paid > 0.0);
}

#[test]
fn test_empty_year_range_rejected() {
    let config = SimulationConfig {
        start_year: 90,
        end_year: 90,
        ..SimulationConfig::default()
    };

    assert_eq!(
        monte_carlo_simulate(&config),
        Err(SimulationError::Config(ConfigError::InvalidYearRange {
            start: 90,
            end: 90
        }))
    );
}

#[test]
fn test_zero_iterations_rejected() {
    let config = SimulationConfig {
        iterations: 0,
        ..SimulationConfig::default()
    };

    assert_eq!(
        monte_carlo_simulate(&config),
        Err(SimulationError::Config(ConfigError::NoIterations))
    );
}

#[test]
fn test_named_order_with_unknown_account_rejected() {
    let config = SimulationConfig {
        accounts: vec![account("Roth", TaxCategory::RothIra, 1.0, 0.0, 0.0)],
        waterfall: WaterfallConfig::NamedOrder {
            order: vec!["Roth".into(), "Pension".into()],
        },
        ..SimulationConfig::default()
    };

    assert_eq!(
        monte_carlo_simulate(&config),
        Err(SimulationError::Config(ConfigError::UnknownAccount(
            "Pension".into()
        )))
    );
}

#[test]
fn test_duplicate_account_names_rejected() {
    let config = SimulationConfig {
        accounts: vec![
            account("Roth", TaxCategory::RothIra, 1.0, 0.0, 0.0),
            account("Roth", TaxCategory::Brokerage, 1.0, 0.0, 0.0),
        ],
        ..SimulationConfig::default()
    };

    assert_eq!(
        monte_carlo_simulate(&config),
        Err(SimulationError::Config(ConfigError::DuplicateAccount(
            "Roth".into()
        )))
    );
}

#[test]
fn test_negative_std_dev_rejected() {
    let mut config = SimulationConfig::default();
    config.rates.bonds = RateProfile::normal(0.04, -0.01);

    let err = monte_carlo_simulate(&config).unwrap_err();

    assert!(matches!(
        err,
        SimulationError::Market(MarketError::InvalidDistributionParameters {
            series: "bond return",
            ..
        })
    ));
}

#[test]
fn test_volatile_markets_never_drive_balances_negative() {
    let config = SimulationBuilder::new()
        .years(0, 40)
        .iterations(200)
        .seed(1)
        .stocks(RateProfile::normal(0.05, 0.6))
        .bonds(RateProfile::normal(0.03, 0.5))
        .how_much(HowMuchConfig::ConstantPercent(4.0))
        .account(
            AccountBuilder::brokerage("Brokerage")
                .cash(10_000.0)
                .stocks(500_000.0, 300_000.0),
        )
        .account(AccountBuilder::traditional_ira("IRA").bonds(200_000.0, 200_000.0))
        .build()
        .unwrap();

    let sweep = monte_carlo_simulate(&config).unwrap();

    for trial in &sweep.trials {
        assert!(trial.end_value >= 0.0);
        for year in &trial.years {
            assert!(year.total_value >= 0.0, "year {} went negative", year.year);
            assert!(year.requested >= 0.0);
            for snapshot in &year.accounts {
                assert!(snapshot.stocks >= 0.0 && snapshot.bonds >= 0.0);
            }
        }
    }
    assert!(sweep.summary().final_value_p5 >= 0.0);
}
