//! Command-line front end for the solvency engine
//!
//! Loads a YAML scenario, applies command-line overrides, runs the Monte
//! Carlo sweep and reports how many trials stayed solvent.

pub mod logging;
pub mod report;
pub mod scenario;

pub use logging::init_logging;
pub use report::format_summary;
pub use scenario::{Overrides, load_scenario};
