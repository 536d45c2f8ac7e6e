//! Scenario batches and sensitivity sweeps
//!
//! Each projection is independent, so a batch is just a parallel map over
//! scenarios. Results keep the input order and each carries its own
//! `Result`, so one bad scenario never sinks the rest.

pub mod loader;

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub use loader::{load_scenarios, load_scenarios_from_reader};

use crate::error::ProjectionError;
use crate::projection::ProjectionInput;
use crate::report::ProjectionReport;

/// A named set of projection inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub input: ProjectionInput,
}

impl Scenario {
    pub fn new(name: impl Into<String>, input: ProjectionInput) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }
}

/// Build a scenario's report, logging failures
fn build_report(scenario: &Scenario) -> Result<ProjectionReport, ProjectionError> {
    let result = ProjectionReport::build(&scenario.input);
    if let Err(e) = &result {
        warn!("scenario '{}' failed: {}", scenario.name, e);
    }
    result
}

/// A scenario paired with its projection result
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub result: Result<ProjectionReport, ProjectionError>,
}

impl ScenarioOutcome {
    /// Run a single scenario
    pub fn run(scenario: Scenario) -> Self {
        let result = build_report(&scenario);
        Self { scenario, result }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs batches of scenarios, optionally on a dedicated thread pool
///
/// # Example
/// ```
/// use balance_projection::{ProjectionInput, Scenario, ScenarioRunner};
///
/// let runner = ScenarioRunner::new();
/// let scenarios = vec![
///     Scenario::new("low", ProjectionInput::from_percentages(5000.0, 3.0, 2.0, 10, 500.0)),
///     Scenario::new("high", ProjectionInput::from_percentages(5000.0, 8.0, 2.0, 10, 500.0)),
/// ];
/// let outcomes = runner.run_batch(&scenarios);
/// assert_eq!(outcomes.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ScenarioRunner {
    pool: Option<rayon::ThreadPool>,
}

impl ScenarioRunner {
    /// Runner on rayon's global pool
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Runner on its own pool of `threads` workers
    pub fn with_threads(threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        Ok(Self { pool: Some(pool) })
    }

    /// Run one scenario on the calling thread
    pub fn run(&self, scenario: &Scenario) -> Result<ProjectionReport, ProjectionError> {
        build_report(scenario)
    }

    /// Run every scenario in parallel, preserving input order
    pub fn run_batch(&self, scenarios: &[Scenario]) -> Vec<ScenarioOutcome> {
        let run_all = || -> Vec<ScenarioOutcome> {
            scenarios
                .par_iter()
                .cloned()
                .map(ScenarioOutcome::run)
                .collect()
        };

        let outcomes = match &self.pool {
            Some(pool) => pool.install(run_all),
            None => run_all(),
        };

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        info!(
            "ran {} scenarios ({} ok, {} failed)",
            outcomes.len(),
            outcomes.len() - failed,
            failed
        );

        outcomes
    }
}

/// Cartesian product of return and inflation percentages over a base input
///
/// Everything except the two rates is taken from `base`. Scenarios are named
/// `r{return}_i{inflation}` with two decimals, return-major order.
pub fn sensitivity_grid(
    base: &ProjectionInput,
    return_pcts: &[f64],
    inflation_pcts: &[f64],
) -> Vec<Scenario> {
    return_pcts
        .iter()
        .flat_map(|&r| {
            inflation_pcts.iter().map(move |&i| {
                let input = ProjectionInput::from_percentages(
                    base.start_balance,
                    r,
                    i,
                    base.horizon_years,
                    base.annual_withdrawal,
                );
                Scenario::new(format!("r{:.2}_i{:.2}", r, i), input)
            })
        })
        .collect()
}
