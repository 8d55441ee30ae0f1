//! Tests for per-account withdrawals and the portfolio waterfalls
//!
//! These tests verify:
//! - Bucket draining order (cash, stocks, bonds)
//! - Tax reconciliation within the 5 cent tolerance
//! - Fully drained accounts report a shortfall instead of failing
//! - Named-order and tax-paid-first waterfall ordering

use super::{account, assert_close};
use crate::error::{LookupError, WithdrawalError};
use crate::model::{Account, Bucket, Portfolio, TaxCategory};
use crate::money::WITHDRAWAL_TOLERANCE;
use crate::taxes::{TaxManager, TaxRates};
use crate::waterfall::{NamedOrder, TaxPaidFirst, WaterfallConfig, WithdrawalWaterfall};

fn zero_tax() -> TaxManager {
    TaxManager::new(TaxRates {
        capital_gains: 0.0,
        income: 0.0,
    })
}

#[test]
fn test_drains_cash_then_stocks_then_bonds() {
    let record = account("Brokerage", TaxCategory::Brokerage, 100.0, 50.0, 50.0);
    let mut acct = Account::from_record(&record).unwrap();

    let result = acct.withdraw(&zero_tax(), 120.0).unwrap();

    assert_eq!(result, (120.0, 0.0));
    assert_eq!(acct.value(Bucket::Cash), 0.0);
    assert_eq!(acct.value(Bucket::Stocks), 0.0);
    assert_eq!(acct.value(Bucket::Bonds), 30.0);
}

#[test]
fn test_roth_draining_order_with_default_rates() {
    let record = account("Roth", TaxCategory::RothIra, 100.0, 50.0, 50.0);
    let mut acct = Account::from_record(&record).unwrap();

    assert_eq!(acct.withdraw(&TaxManager::default(), 120.0), Ok((120.0, 0.0)));
    assert_eq!(acct.value(Bucket::Bonds), 30.0);
}

#[test]
fn test_zero_request_is_a_no_op() {
    let record = account("401k", TaxCategory::FourOhOneK, 10.0, 20.0, 30.0);
    let mut acct = Account::from_record(&record).unwrap();
    let before = acct.clone();

    assert_eq!(acct.withdraw(&TaxManager::default(), 0.0), Ok((0.0, 0.0)));
    assert_eq!(acct, before);
}

#[test]
fn test_brokerage_withdrawal_is_grossed_up() {
    let record = account("Brokerage", TaxCategory::Brokerage, 1_000_000.0, 0.0, 0.0);
    let mut acct = Account::from_record(&record).unwrap();

    let (delivered, tax) = acct.withdraw(&TaxManager::default(), 50_000.0).unwrap();

    assert_eq!(delivered, 50_000.0);
    assert_eq!(tax, 8_823.53);
    assert_close(acct.value(Bucket::Cash), 941_176.47, 1e-6);
}

#[test]
fn test_balances_never_negative_and_delivery_within_tolerance() {
    let tax = TaxManager::default();
    for category in TaxCategory::ALL {
        let record = account("Acct", category, 1_234.56, 7_890.12, 3_456.78);
        let mut acct = Account::from_record(&record).unwrap();

        for request in [0.01, 0.99, 17.0, 333.33, 1_000.0, 2_500.55, 4_000.0] {
            let available_post = tax.split_it(category, acct.total_value()).0;
            let (delivered, _) = acct.withdraw(&tax, request).unwrap();

            for bucket in Bucket::ALL {
                assert!(acct.value(bucket) >= 0.0, "{category} {bucket} went negative");
            }
            if available_post > request + WITHDRAWAL_TOLERANCE {
                assert_close(delivered, request, WITHDRAWAL_TOLERANCE);
            } else {
                assert!(delivered <= request + WITHDRAWAL_TOLERANCE);
            }
        }
    }
}

#[test]
fn test_full_drain_reports_shortfall_instead_of_failing() {
    let record = account("Brokerage", TaxCategory::Brokerage, 4.0, 3.0, 3.0);
    let mut acct = Account::from_record(&record).unwrap();

    let (delivered, tax) = acct.withdraw(&TaxManager::default(), 1_000_000.0).unwrap();

    assert_close(delivered + tax, 10.0, 1e-9);
    assert_close(delivered, 8.5, 1e-9);
    assert_eq!(acct.total_value(), 0.0);
}

#[test]
fn test_withdraw_pretax_splits_each_bucket() {
    let record = account("IRA", TaxCategory::TradIra, 100.0, 100.0, 0.0);
    let mut acct = Account::from_record(&record).unwrap();

    let (post, tax) = acct.withdraw_pretax(&TaxManager::default(), 150.0);

    // 14.7% of 100 from cash plus 14.7% of 50 from stocks
    assert_eq!(tax, 22.05);
    assert_eq!(post, 127.95);
    assert_eq!(acct.value(Bucket::Stocks), 50.0);
}

#[test]
fn test_named_order_follows_list_and_skips_unlisted() {
    let mut portfolio = Portfolio::from_records(&[
        account("Roth", TaxCategory::RothIra, 100.0, 0.0, 0.0),
        account("Brokerage", TaxCategory::Brokerage, 1_000.0, 0.0, 0.0),
        account("IRA", TaxCategory::TradIra, 1_000.0, 0.0, 0.0),
    ])
    .unwrap();
    let waterfall = NamedOrder::new(vec!["Roth".into(), "IRA".into()]);

    let result = waterfall
        .withdraw(&mut portfolio, &TaxManager::default(), 500.0)
        .unwrap();

    assert_eq!(result.delivered, 500.0);
    // IRA grosses up 400 at 14.7%: 468.93 pre-tax, 68.93 tax
    assert_eq!(result.tax_paid, 68.93);
    assert_eq!(portfolio.account("Roth").unwrap().total_value(), 0.0);
    assert_eq!(portfolio.account("Brokerage").unwrap().total_value(), 1_000.0);
    assert_close(portfolio.account("IRA").unwrap().total_value(), 531.07, 1e-6);
}

#[test]
fn test_named_order_stops_once_need_is_met() {
    let mut portfolio = Portfolio::from_records(&[
        account("A", TaxCategory::RothIra, 1_000.0, 0.0, 0.0),
        account("B", TaxCategory::RothIra, 1_000.0, 0.0, 0.0),
    ])
    .unwrap();
    let waterfall = NamedOrder::new(vec!["A".into(), "B".into()]);

    let result = waterfall
        .withdraw(&mut portfolio, &TaxManager::default(), 400.0)
        .unwrap();

    assert_eq!(result.delivered, 400.0);
    assert_eq!(result.shortfall(), 0.0);
    assert_eq!(portfolio.account("B").unwrap().total_value(), 1_000.0);
}

#[test]
fn test_named_order_unknown_account() {
    let mut portfolio =
        Portfolio::from_records(&[account("A", TaxCategory::RothIra, 10.0, 0.0, 0.0)]).unwrap();
    let waterfall = NamedOrder::new(vec!["A".into(), "Missing".into()]);

    let err = waterfall
        .withdraw(&mut portfolio, &TaxManager::default(), 100.0)
        .unwrap_err();

    assert_eq!(
        err,
        WithdrawalError::Lookup(LookupError::AccountNotFound("Missing".into()))
    );
}

#[test]
fn test_tax_paid_first_drains_post_tax_accounts_before_deferred() {
    let mut portfolio = Portfolio::from_records(&[
        account("IRA", TaxCategory::TradIra, 1_000.0, 0.0, 0.0),
        account("Roth", TaxCategory::RothIra, 300.0, 0.0, 0.0),
        account("Brokerage", TaxCategory::Brokerage, 200.0, 0.0, 0.0),
    ])
    .unwrap();

    let result = TaxPaidFirst
        .withdraw(&mut portfolio, &TaxManager::default(), 600.0)
        .unwrap();

    // Roth 300 untaxed, Brokerage drained for 170 + 30 tax, IRA covers 130
    assert_eq!(result.delivered, 600.0);
    assert_close(result.tax_paid, 30.0 + 22.40, 1e-9);
    assert_eq!(portfolio.account("Roth").unwrap().total_value(), 0.0);
    assert_eq!(portfolio.account("Brokerage").unwrap().total_value(), 0.0);
    assert_close(portfolio.account("IRA").unwrap().total_value(), 847.60, 1e-6);
}

#[test]
fn test_tax_paid_first_leaves_deferred_alone_when_covered() {
    let mut portfolio = Portfolio::from_records(&[
        account("401k", TaxCategory::FourOhOneK, 1_000.0, 0.0, 0.0),
        account("Roth", TaxCategory::RothIra, 1_000.0, 0.0, 0.0),
    ])
    .unwrap();

    let result = TaxPaidFirst
        .withdraw(&mut portfolio, &TaxManager::default(), 250.0)
        .unwrap();

    assert_eq!(result.delivered, 250.0);
    assert_eq!(result.tax_paid, 0.0);
    assert_eq!(portfolio.account("401k").unwrap().total_value(), 1_000.0);
}

#[test]
fn test_waterfalls_conserve_money_when_portfolio_is_large_enough() {
    let records = [
        account("Brokerage", TaxCategory::Brokerage, 5_000.0, 40_000.0, 10_000.0),
        account("Roth", TaxCategory::RothIra, 0.0, 12_000.0, 3_000.0),
        account("401k", TaxCategory::FourOhOneK, 1_000.0, 30_000.0, 20_000.0),
        account("Rollover", TaxCategory::RolloverIra, 0.0, 9_000.0, 1_000.0),
    ];
    let configs = [
        WaterfallConfig::TaxPaidFirst,
        WaterfallConfig::NamedOrder {
            order: vec![
                "401k".into(),
                "Rollover".into(),
                "Brokerage".into(),
                "Roth".into(),
            ],
        },
    ];

    for config in &configs {
        let waterfall = config.build();
        for need in [1.0, 999.99, 12_345.67, 60_000.0, 95_000.0] {
            let mut portfolio = Portfolio::from_records(&records).unwrap();
            let result = waterfall
                .withdraw(&mut portfolio, &TaxManager::default(), need)
                .unwrap();
            assert_close(result.delivered, need, WITHDRAWAL_TOLERANCE);
        }
    }
}

#[test]
fn test_insufficient_portfolio_reports_shortfall() {
    let mut portfolio = Portfolio::from_records(&[account(
        "Brokerage",
        TaxCategory::Brokerage,
        10.0,
        0.0,
        0.0,
    )])
    .unwrap();

    let result = TaxPaidFirst
        .withdraw(&mut portfolio, &TaxManager::default(), 1_000_000.0)
        .unwrap();

    assert_eq!(result.delivered, 8.5);
    assert_eq!(result.tax_paid, 1.5);
    assert_close(result.shortfall(), 999_991.5, 1e-6);
    assert_eq!(portfolio.total_value(), 0.0);
}

#[test]
fn test_negative_need_requests_nothing() {
    let mut portfolio =
        Portfolio::from_records(&[account("A", TaxCategory::RothIra, 10.0, 0.0, 0.0)]).unwrap();

    let result = NamedOrder::new(vec!["A".into()])
        .withdraw(&mut portfolio, &TaxManager::default(), -50.0)
        .unwrap();

    assert_eq!(result.requested, 0.0);
    assert_eq!(result.delivered, 0.0);
    assert_eq!(portfolio.total_value(), 10.0);
}
