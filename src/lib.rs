//! Balance Projection - year-by-year investment balance under constant rates
//!
//! This library provides:
//! - The balance recurrence (return, inflation, fixed annual withdrawal)
//! - Per-year metrics (net change, interest earned, inflation loss) and lifetime totals
//! - Parallel scenario batches and return/inflation sensitivity grids
//! - CSV scenario loading and CSV/JSON/text report output

pub mod config;
pub mod error;
pub mod projection;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use config::CalculatorDefaults;
pub use error::{ProjectionError, ScenarioFileError};
pub use projection::{derive_metrics, project, BalanceSeries, ProjectionInput, YearMetrics};
pub use report::ProjectionReport;
pub use scenario::{sensitivity_grid, Scenario, ScenarioOutcome, ScenarioRunner};
