//! Portfolio solvency simulation library
//!
//! This crate provides a Monte Carlo engine that asks whether a set of
//! investment accounts can fund a yearly withdrawal until a target horizon.
//! It supports:
//! - Brokerage, 401k, rollover IRA, Roth IRA and traditional IRA accounts,
//!   each holding cash, stocks and bonds
//! - Flat per-category taxation of withdrawals
//! - Named-order and tax-paid-first withdrawal waterfalls
//! - Constant-percentage and constant-dollar withdrawal amounts
//! - Normally distributed stock returns, bond returns and inflation
//!
//! # Builder DSL
//!
//! ```ignore
//! use solvent_core::config::{AccountBuilder, SimulationBuilder};
//! use solvent_core::simulation::monte_carlo_simulate;
//! use solvent_core::spending::HowMuchConfig;
//!
//! let config = SimulationBuilder::new()
//!     .years(48, 90)
//!     .iterations(500)
//!     .how_much(HowMuchConfig::ConstantPercent(4.0))
//!     .account(AccountBuilder::brokerage("Brokerage").cash(50_000.0).stocks(900_000.0, 600_000.0))
//!     .account(AccountBuilder::four_01k("401k").stocks(400_000.0, 400_000.0))
//!     .build()?;
//!
//! let sweep = monte_carlo_simulate(&config)?;
//! println!("{:.1}% succeeded", 100.0 * sweep.success_rate());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod market;
pub mod money;
pub mod simulation;
pub mod simulation_state;
pub mod spending;
pub mod taxes;
pub mod waterfall;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{AccountBuilder, SimulationBuilder, SimulationConfig};
pub use error::SimulationError;
pub use simulation::{monte_carlo_simulate, simulate};
