//! Balance projection engine and derived per-year metrics

mod engine;
mod metrics;
pub mod rates;

pub use engine::{project, round_to, BalanceSeries, ProjectionInput, BALANCE_DECIMALS};
pub use metrics::{derive_metrics, summarize, ProjectionSummary, YearMetrics, METRIC_DECIMALS};
pub use rates::{multiplier_from_percent, percent_from_multiplier};
