//! Headless simulation runner
//!
//! Runs a full society simulation and writes the snapshot sequence as
//! JSON for downstream dashboards and analysis tooling.

use std::path::PathBuf;

use clap::Parser;
use socium::core::config::SimulationConfig;
use socium::core::error::Result;
use socium::society::simulate;

#[derive(Parser, Debug)]
#[command(name = "run_sim")]
#[command(about = "Run a society simulation and dump per-round snapshots as JSON")]
struct Args {
    /// TOML configuration file; defaults apply for missing keys
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the configured round count
    #[arg(long)]
    rounds: Option<u32>,

    /// Override the configured population size
    #[arg(long)]
    population: Option<usize>,

    /// Output file for the JSON snapshot sequence
    #[arg(long, default_value = "simulation_output.json")]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("socium=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_toml_file(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.random_seed = seed;
    }
    if let Some(rounds) = args.rounds {
        config.max_rounds = rounds;
    }
    if let Some(population) = args.population {
        config.total_population = population;
    }

    println!("Starting society simulation");
    println!("===========================");
    println!("Population: {}", config.total_population);
    println!("Rounds: {}", config.max_rounds);
    println!("Seed: {}", config.random_seed);
    println!();

    let start = std::time::Instant::now();
    let output = simulate(config)?;
    let elapsed = start.elapsed();

    println!("{}", output.summary_text());
    println!("Actual time: {:.2}ms", elapsed.as_secs_f64() * 1000.0);

    std::fs::write(&args.output, output.to_json())?;
    println!("\nFull output written to {}", args.output.display());

    Ok(())
}
