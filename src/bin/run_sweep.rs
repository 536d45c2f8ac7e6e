//! Run a batch of projections in parallel and write one summary row each
//!
//! Scenarios come from a CSV file (`--input`) or from a return x inflation
//! grid over the default calculator inputs.

use anyhow::{bail, Context, Result};
use balance_projection::report::write_summary_csv;
use balance_projection::scenario::load_scenarios;
use balance_projection::{sensitivity_grid, CalculatorDefaults, ScenarioRunner};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "run_sweep", about = "Run many projections and summarize them to CSV")]
struct Cli {
    #[arg(
        long,
        help = "Scenario CSV: Name,StartBalance,ReturnPct,InflationPct,Years,Withdrawal"
    )]
    input: Option<PathBuf>,
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        help = "Return percentages for the grid"
    )]
    return_pcts: Vec<f64>,
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        help = "Inflation percentages for the grid"
    )]
    inflation_pcts: Vec<f64>,
    #[arg(long, default_value = "sweep_output.csv")]
    output: PathBuf,
    #[arg(long, help = "Worker threads (defaults to one per core)")]
    threads: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let start = Instant::now();

    let scenarios = match &cli.input {
        Some(path) => load_scenarios(path)
            .with_context(|| format!("failed to load scenarios from {}", path.display()))?,
        None => {
            if cli.return_pcts.is_empty() || cli.inflation_pcts.is_empty() {
                bail!("either --input or both --return-pcts and --inflation-pcts are required");
            }
            let base = CalculatorDefaults::from_env().to_input();
            sensitivity_grid(&base, &cli.return_pcts, &cli.inflation_pcts)
        }
    };
    println!("Prepared {} scenarios in {:?}", scenarios.len(), start.elapsed());

    let runner = match cli.threads {
        Some(n) => ScenarioRunner::with_threads(n).context("failed to build thread pool")?,
        None => ScenarioRunner::new(),
    };

    let run_start = Instant::now();
    let outcomes = runner.run_batch(&scenarios);
    println!("Projections complete in {:?}", run_start.elapsed());

    let file = File::create(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    write_summary_csv(BufWriter::new(file), &outcomes)?;
    println!("Output written to {}", cli.output.display());

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        println!("{} of {} scenarios failed; see the Error column", failed, outcomes.len());
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
