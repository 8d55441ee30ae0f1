use std::fmt;

use crate::model::Bucket;

/// Errors raised while validating configuration, before any trial runs
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    UnknownTaxCategory(String),
    UnknownHowMuchKind(String),
    UnknownAccount(String),
    DuplicateAccount(String),
    MalformedAccount {
        name: String,
        reason: &'static str,
    },
    InvalidYearRange {
        start: i32,
        end: i32,
    },
    InvalidAmount {
        field: &'static str,
        value: f64,
    },
    NoIterations,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownTaxCategory(s) => write!(f, "unknown tax category: {s:?}"),
            ConfigError::UnknownHowMuchKind(s) => write!(f, "unknown withdrawal amount kind: {s:?}"),
            ConfigError::UnknownAccount(name) => write!(f, "account {name:?} not found"),
            ConfigError::DuplicateAccount(name) => {
                write!(f, "account {name:?} is defined more than once")
            }
            ConfigError::MalformedAccount { name, reason } => {
                write!(f, "malformed account {name:?}: {reason}")
            }
            ConfigError::InvalidYearRange { start, end } => {
                write!(f, "invalid year range {start}..{end}: end must be after start")
            }
            ConfigError::InvalidAmount { field, value } => {
                write!(f, "invalid value for {field}: {value}")
            }
            ConfigError::NoIterations => write!(f, "at least one iteration is required"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors related to resource lookups
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    AccountNotFound(String),
    NoMatchingBracket(f64),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::AccountNotFound(name) => write!(f, "account {name:?} not found"),
            LookupError::NoMatchingBracket(value) => {
                write!(f, "no tax bracket matches {value}")
            }
        }
    }
}

impl std::error::Error for LookupError {}

/// Accounting invariant violations. These indicate a bug in the withdrawal
/// arithmetic or corrupt input, never a business condition.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountingError {
    /// Delivered more post-tax money than was asked for
    Overdrawn {
        account: String,
        requested: f64,
        delivered: f64,
    },
    /// Came up short while money was still left in the account
    MoneyRemaining {
        account: String,
        shortfall: f64,
        remaining_balance: f64,
    },
    NegativeBalance {
        account: String,
        bucket: Bucket,
        balance: f64,
    },
}

impl fmt::Display for AccountingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountingError::Overdrawn {
                account,
                requested,
                delivered,
            } => write!(
                f,
                "account {account:?} delivered ${delivered:.2} for a ${requested:.2} request"
            ),
            AccountingError::MoneyRemaining {
                account,
                shortfall,
                remaining_balance,
            } => write!(
                f,
                "account {account:?} is ${shortfall:.2} short with ${remaining_balance:.2} still remaining"
            ),
            AccountingError::NegativeBalance {
                account,
                bucket,
                balance,
            } => write!(
                f,
                "account {account:?} {bucket} balance went negative (${balance:.2})"
            ),
        }
    }
}

impl std::error::Error for AccountingError {}

/// Errors from a portfolio-level withdrawal
#[derive(Debug, Clone, PartialEq)]
pub enum WithdrawalError {
    Lookup(LookupError),
    Accounting(AccountingError),
}

impl fmt::Display for WithdrawalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WithdrawalError::Lookup(e) => write!(f, "{e}"),
            WithdrawalError::Accounting(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for WithdrawalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WithdrawalError::Lookup(e) => Some(e),
            WithdrawalError::Accounting(e) => Some(e),
        }
    }
}

impl From<LookupError> for WithdrawalError {
    fn from(err: LookupError) -> Self {
        WithdrawalError::Lookup(err)
    }
}

impl From<AccountingError> for WithdrawalError {
    fn from(err: AccountingError) -> Self {
        WithdrawalError::Accounting(err)
    }
}

/// Errors related to market/distribution operations
#[derive(Debug, Clone, PartialEq)]
pub enum MarketError {
    InvalidDistributionParameters {
        series: &'static str,
        mean: f64,
        std_dev: f64,
        reason: &'static str,
    },
}

impl fmt::Display for MarketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketError::InvalidDistributionParameters {
                series,
                mean,
                std_dev,
                reason,
            } => {
                write!(
                    f,
                    "invalid {series} parameters (mean={mean}, std_dev={std_dev}): {reason}"
                )
            }
        }
    }
}

impl std::error::Error for MarketError {}

/// Anything that can stop a trial or a sweep
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Config(ConfigError),
    Market(MarketError),
    Lookup(LookupError),
    Accounting { year: i32, source: AccountingError },
}

impl SimulationError {
    pub(crate) fn from_withdrawal(year: i32, err: WithdrawalError) -> Self {
        match err {
            WithdrawalError::Lookup(e) => SimulationError::Lookup(e),
            WithdrawalError::Accounting(source) => SimulationError::Accounting { year, source },
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "configuration error: {e}"),
            SimulationError::Market(e) => write!(f, "{e}"),
            SimulationError::Lookup(e) => write!(f, "{e}"),
            SimulationError::Accounting { year, source } => {
                write!(f, "accounting error in year {year}: {source}")
            }
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            SimulationError::Market(e) => Some(e),
            SimulationError::Lookup(e) => Some(e),
            SimulationError::Accounting { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(err: ConfigError) -> Self {
        SimulationError::Config(err)
    }
}

impl From<MarketError> for SimulationError {
    fn from(err: MarketError) -> Self {
        SimulationError::Market(err)
    }
}

impl From<LookupError> for SimulationError {
    fn from(err: LookupError) -> Self {
        SimulationError::Lookup(err)
    }
}
