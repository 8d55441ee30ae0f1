//! Scenario files
//!
//! A scenario is a YAML rendering of `SimulationConfig`:
//!
//! ```yaml
//! start_year: 48
//! end_year: 90
//! iterations: 500
//! how_much: { kind: constant-percent, value: 4.0 }
//! waterfall: { kind: tax-paid-first }
//! accounts:
//!   - name: Joint Brokerage
//!     tax_category: Brokerage
//!     holdings:
//!       cash: { basis: 10000, balance: 10000 }
//!       stocks: { basis: 300000, balance: 450000 }
//! ```

use std::fs;
use std::path::Path;

use solvent_core::SimulationConfig;
use solvent_core::error::ConfigError;
use solvent_core::spending::HowMuchConfig;

/// Error types for scenario loading
#[derive(Debug)]
pub enum ScenarioError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::Io(msg) => write!(f, "IO error: {}", msg),
            ScenarioError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ScenarioError {}

/// Parse a scenario from YAML text
pub fn from_yaml(yaml: &str) -> Result<SimulationConfig, ScenarioError> {
    serde_saphyr::from_str(yaml)
        .map_err(|e| ScenarioError::Parse(format!("Failed to parse scenario: {}", e)))
}

/// Load a scenario file
pub fn load_scenario(path: &Path) -> Result<SimulationConfig, ScenarioError> {
    let content = fs::read_to_string(path).map_err(|e| {
        ScenarioError::Io(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let config = from_yaml(&content)?;
    tracing::debug!(
        path = %path.display(),
        accounts = config.accounts.len(),
        "loaded scenario"
    );
    Ok(config)
}

/// Command-line values that replace the scenario's own
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
    /// Raw `(kind, value)` pair, e.g. `("c%", 4.0)`
    pub how_much: Option<(String, f64)>,
}

impl Overrides {
    pub fn apply(&self, mut config: SimulationConfig) -> Result<SimulationConfig, ConfigError> {
        if let Some(start) = self.start_year {
            config.start_year = start;
        }
        if let Some(end) = self.end_year {
            config.end_year = end;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some((kind, value)) = &self.how_much {
            config = config.with_how_much(HowMuchConfig::from_kind(kind, *value)?);
        }
        Ok(config)
    }
}
