//! Per-year metrics derived from a balance series

use serde::{Deserialize, Serialize};

use super::engine::round_to;

/// Decimal places kept on derived metrics
pub const METRIC_DECIMALS: u32 = 2;

/// Derived figures for one year of a projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearMetrics {
    pub year: u32,
    pub balance: f64,

    /// Change from the prior year's balance
    pub net_change: f64,

    /// Return earned on this year's balance, never negative
    pub interest_earned: f64,

    /// Value lost to inflation on this year's balance, never negative
    pub inflation_loss: f64,
}

impl YearMetrics {
    /// Year 0 row: the seed balance with nothing to compare against
    pub fn seed(balance: f64) -> Self {
        Self {
            year: 0,
            balance,
            net_change: 0.0,
            interest_earned: 0.0,
            inflation_loss: 0.0,
        }
    }
}

/// Round, then floor at zero
fn clamped(value: f64) -> f64 {
    let rounded = round_to(value, METRIC_DECIMALS);
    if rounded > 0.0 {
        rounded
    } else {
        0.0
    }
}

/// Derive per-year metrics from a balance series
///
/// The output is aligned 1:1 with `series`. `return_rate` and
/// `inflation_rate` are the same multipliers the series was projected with.
pub fn derive_metrics(series: &[f64], return_rate: f64, inflation_rate: f64) -> Vec<YearMetrics> {
    let Some(&seed) = series.first() else {
        return Vec::new();
    };

    let mut metrics = Vec::with_capacity(series.len());
    metrics.push(YearMetrics::seed(seed));

    for (i, pair) in series.windows(2).enumerate() {
        let (prev, balance) = (pair[0], pair[1]);
        metrics.push(YearMetrics {
            year: (i + 1) as u32,
            balance,
            net_change: round_to(balance - prev, METRIC_DECIMALS),
            interest_earned: clamped(balance * (return_rate - 1.0)),
            inflation_loss: clamped(balance * (inflation_rate - 1.0)),
        });
    }

    metrics
}

/// Lifetime aggregates over a projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub ending_balance: f64,
    pub lifetime_interest: f64,
    pub lifetime_inflation_loss: f64,

    /// Mean net change across every row, year 0 included
    pub average_net_change: f64,
}

/// Reduce per-year metrics to lifetime totals
///
/// `average_net_change` divides by the full row count, so the year-0 zero
/// pulls the average toward zero on short horizons.
pub fn summarize(metrics: &[YearMetrics]) -> ProjectionSummary {
    let lifetime_interest: f64 = metrics.iter().map(|m| m.interest_earned).sum();
    let lifetime_inflation_loss: f64 = metrics.iter().map(|m| m.inflation_loss).sum();
    let total_net_change: f64 = metrics.iter().map(|m| m.net_change).sum();

    let average_net_change = if metrics.is_empty() {
        0.0
    } else {
        total_net_change / metrics.len() as f64
    };

    ProjectionSummary {
        years: metrics.len().saturating_sub(1) as u32,
        ending_balance: metrics.last().map(|m| m.balance).unwrap_or(0.0),
        lifetime_interest,
        lifetime_inflation_loss,
        average_net_change,
    }
}
