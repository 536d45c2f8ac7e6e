//! Balance Projection CLI
//!
//! Runs a single projection and prints the per-year table and summary.
//! Flags override the PROJECTION_* environment defaults.

use anyhow::{Context, Result};
use balance_projection::report::{render_table, to_json, write_metrics_csv};
use balance_projection::{CalculatorDefaults, ProjectionReport};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "balance_projection",
    about = "Project an investment balance under constant return, inflation and withdrawals"
)]
struct Cli {
    #[arg(long, allow_hyphen_values = true, help = "Balance at year 0")]
    start_balance: Option<f64>,
    #[arg(long, allow_hyphen_values = true, help = "Annual return in percent, e.g. 5")]
    return_pct: Option<f64>,
    #[arg(long, allow_hyphen_values = true, help = "Annual inflation in percent, e.g. 4.7")]
    inflation_pct: Option<f64>,
    #[arg(long, allow_hyphen_values = true, help = "Years to project")]
    years: Option<i32>,
    #[arg(long, allow_hyphen_values = true, help = "Amount withdrawn at the end of each year")]
    withdrawal: Option<f64>,
    #[arg(long, help = "Print the full report as JSON instead of a table")]
    json: bool,
    #[arg(long, help = "Also write per-year metrics to this CSV file")]
    csv: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, mut defaults: CalculatorDefaults) -> CalculatorDefaults {
        if let Some(v) = self.start_balance {
            defaults.start_balance = v;
        }
        if let Some(v) = self.return_pct {
            defaults.return_pct = v;
        }
        if let Some(v) = self.inflation_pct {
            defaults.inflation_pct = v;
        }
        if let Some(v) = self.years {
            defaults.years = v;
        }
        if let Some(v) = self.withdrawal {
            defaults.withdrawal = v;
        }
        defaults
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let params = cli.apply(CalculatorDefaults::from_env());
    let report = ProjectionReport::build(&params.to_input()).context("projection failed")?;

    if cli.json {
        println!("{}", to_json(&report)?);
    } else {
        println!(
            "Start {:.2}, return {:.2}%, inflation {:.2}%, {} years, withdrawal {:.2}\n",
            params.start_balance, params.return_pct, params.inflation_pct, params.years,
            params.withdrawal
        );
        print!("{}", render_table(&report));
    }

    if let Some(path) = &cli.csv {
        let file = File::create(path)
            .with_context(|| format!("unable to create {}", path.display()))?;
        write_metrics_csv(BufWriter::new(file), &report.metrics)?;
        if !cli.json {
            println!("\nPer-year metrics written to: {}", path.display());
        }
    }

    Ok(())
}
