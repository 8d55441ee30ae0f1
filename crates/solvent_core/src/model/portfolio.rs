//! The ordered set of accounts owned by one trial

use rustc_hash::FxHashMap;

use super::accounts::{Account, AccountRecord, AccountSnapshot};
use crate::error::{ConfigError, LookupError};
use crate::money::round_cents;

#[derive(Debug, Clone)]
pub struct Portfolio {
    accounts: Vec<Account>,
    by_name: FxHashMap<String, usize>,
}

impl Portfolio {
    /// Build a fresh set of accounts from their records. Each trial must get
    /// its own portfolio; accounts are never shared between trials.
    pub fn from_records(records: &[AccountRecord]) -> Result<Self, ConfigError> {
        let mut accounts = Vec::with_capacity(records.len());
        let mut by_name = FxHashMap::default();

        for record in records {
            let account = Account::from_record(record)?;
            if by_name
                .insert(account.name().to_string(), accounts.len())
                .is_some()
            {
                return Err(ConfigError::DuplicateAccount(record.name.clone()));
            }
            accounts.push(account);
        }

        Ok(Self { accounts, by_name })
    }

    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn accounts_mut(&mut self) -> impl Iterator<Item = &mut Account> {
        self.accounts.iter_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn account(&self, name: &str) -> Result<&Account, LookupError> {
        self.by_name
            .get(name)
            .map(|&i| &self.accounts[i])
            .ok_or_else(|| LookupError::AccountNotFound(name.to_string()))
    }

    pub fn account_mut(&mut self, name: &str) -> Result<&mut Account, LookupError> {
        let index = *self
            .by_name
            .get(name)
            .ok_or_else(|| LookupError::AccountNotFound(name.to_string()))?;
        Ok(&mut self.accounts[index])
    }

    /// Sum of every bucket of every account, in cents
    #[must_use]
    pub fn total_value(&self) -> f64 {
        round_cents(self.accounts.iter().map(Account::total_value).sum())
    }

    /// Apply one year of market movement to every account: returns first,
    /// then inflation.
    pub fn apply_market(&mut self, stock_return: f64, bond_return: f64, inflation: f64) {
        for account in &mut self.accounts {
            account.apply_returns(stock_return, bond_return);
            account.apply_inflation(inflation);
        }
    }

    #[must_use]
    pub fn snapshots(&self) -> Vec<AccountSnapshot> {
        self.accounts.iter().map(Account::snapshot).collect()
    }
}
