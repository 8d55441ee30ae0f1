mod accounts;
mod portfolio;
mod results;

pub use accounts::{
    Account, AccountRecord, AccountSnapshot, Bucket, Holding, Holdings, TaxCategory,
};
pub use portfolio::Portfolio;
pub use results::{SweepResult, SweepSummary, TrialResult, YearRecord, percentiles};
