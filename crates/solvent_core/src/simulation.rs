use rand::{RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::model::{SweepResult, TrialResult};
use crate::simulation_state::TrialState;

const MAX_BATCH_SIZE: usize = 100;

/// Run a single trial from `start_year` to `end_year` with its own accounts.
///
/// The same config and seed always produce the same result. An accounting
/// error aborts the trial; a depleted portfolio does not.
pub fn simulate(config: &SimulationConfig, seed: u64) -> Result<TrialResult, SimulationError> {
    let mut state = TrialState::from_config(config, seed)?;

    for year in config.start_year..config.end_year {
        state.advance_year(year)?;
    }

    let result = state.into_result();
    tracing::debug!(
        seed,
        final_value = result.final_value(),
        succeeded = result.succeeded(),
        "trial finished"
    );
    Ok(result)
}

fn simulate_batch(
    config: &SimulationConfig,
    base_seed: u64,
    batch: usize,
    batch_size: usize,
) -> Result<Vec<TrialResult>, SimulationError> {
    let mut rng = rand::rngs::SmallRng::seed_from_u64(base_seed.wrapping_add(batch as u64));
    (0..batch_size)
        .map(|_| simulate(config, rng.next_u64()))
        .collect()
}

/// Run `config.iterations` independent trials.
///
/// Trials are grouped into batches; each batch seeds its own generator from
/// the base seed, so results do not depend on how batches are scheduled.
pub fn monte_carlo_simulate(config: &SimulationConfig) -> Result<SweepResult, SimulationError> {
    config.validate()?;

    let base_seed = config.seed.unwrap_or_else(rand::random);
    let num_iterations = config.iterations;
    let num_batches = num_iterations.div_ceil(MAX_BATCH_SIZE);
    tracing::info!(
        iterations = num_iterations,
        base_seed,
        years = config.num_years(),
        "starting Monte Carlo sweep"
    );

    let batch_size = |i: usize| {
        if i == num_batches - 1 {
            num_iterations - i * MAX_BATCH_SIZE
        } else {
            MAX_BATCH_SIZE
        }
    };

    #[cfg(feature = "parallel")]
    let batches: Vec<Vec<TrialResult>> = (0..num_batches)
        .into_par_iter()
        .map(|i| simulate_batch(config, base_seed, i, batch_size(i)))
        .collect::<Result<_, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let batches: Vec<Vec<TrialResult>> = (0..num_batches)
        .map(|i| simulate_batch(config, base_seed, i, batch_size(i)))
        .collect::<Result<_, _>>()?;

    let result = SweepResult {
        base_seed,
        trials: batches.into_iter().flatten().collect(),
    };

    tracing::info!(
        "{:.1}% scenarios succeeded ({} of {})",
        100.0 * result.success_rate(),
        result.succeeded(),
        result.trials.len()
    );
    Ok(result)
}
