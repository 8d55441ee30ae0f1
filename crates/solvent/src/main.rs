use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{WrapErr, eyre};
use solvent::{Overrides, format_summary, init_logging, load_scenario};
use solvent_core::monte_carlo_simulate;

#[derive(Parser, Debug)]
#[command(name = "solvent")]
#[command(about = "Monte Carlo check of whether a portfolio outlives its withdrawals")]
struct Args {
    /// Path to the YAML scenario
    scenario: PathBuf,

    /// First simulated year (inclusive)
    #[arg(long)]
    start: Option<i32>,

    /// Last simulated year (exclusive)
    #[arg(long)]
    end: Option<i32>,

    /// Number of trials
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Withdrawal policy: c% (percent of current value), c$ (fixed dollars)
    /// or i% (percent of the starting value)
    #[arg(long, num_args = 2, value_names = ["KIND", "VALUE"])]
    how_much: Option<Vec<String>>,

    /// Base seed for a reproducible sweep
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn overrides(&self) -> color_eyre::Result<Overrides> {
        let how_much = match self.how_much.as_deref() {
            Some([kind, value]) => {
                let value: f64 = value
                    .parse()
                    .wrap_err_with(|| format!("--how-much value {value:?} is not a number"))?;
                Some((kind.clone(), value))
            }
            Some(other) => return Err(eyre!("--how-much takes KIND VALUE, got {other:?}")),
            None => None,
        };
        Ok(Overrides {
            start_year: self.start,
            end_year: self.end,
            iterations: self.iterations,
            seed: self.seed,
            how_much,
        })
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level)?;

    let config = load_scenario(&args.scenario)
        .wrap_err_with(|| format!("loading scenario {}", args.scenario.display()))?;
    let config = args
        .overrides()?
        .apply(config)
        .wrap_err("applying command-line overrides")?;

    let sweep = monte_carlo_simulate(&config).wrap_err("running simulation")?;
    let summary = sweep.summary();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", format_summary(&summary));
    }

    Ok(())
}
