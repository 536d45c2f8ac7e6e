//! Projection reports and their CSV, JSON and text renderings

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::io::Write;

use crate::error::{ProjectionError, ScenarioFileError};
use crate::projection::{
    derive_metrics, percent_from_multiplier, project, summarize, BalanceSeries, ProjectionInput,
    ProjectionSummary, YearMetrics,
};
use crate::scenario::ScenarioOutcome;

/// Complete result of one projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionReport {
    pub input: ProjectionInput,
    pub balances: BalanceSeries,
    pub metrics: Vec<YearMetrics>,
    pub summary: ProjectionSummary,
}

impl ProjectionReport {
    /// Project, derive metrics and summarize in one pass
    pub fn build(input: &ProjectionInput) -> Result<Self, ProjectionError> {
        let balances = project(input)?;
        let metrics = derive_metrics(balances.as_slice(), input.return_rate, input.inflation_rate);
        let summary = summarize(&metrics);

        Ok(Self {
            input: *input,
            balances,
            metrics,
            summary,
        })
    }
}

/// One row of the per-year metrics CSV
#[derive(Debug, Serialize)]
struct MetricsCsvRow {
    #[serde(rename = "Year")]
    year: u32,
    #[serde(rename = "Balance")]
    balance: f64,
    #[serde(rename = "NetChange")]
    net_change: f64,
    #[serde(rename = "InterestEarned")]
    interest_earned: f64,
    #[serde(rename = "InflationLoss")]
    inflation_loss: f64,
}

impl From<&YearMetrics> for MetricsCsvRow {
    fn from(m: &YearMetrics) -> Self {
        Self {
            year: m.year,
            balance: m.balance,
            net_change: m.net_change,
            interest_earned: m.interest_earned,
            inflation_loss: m.inflation_loss,
        }
    }
}

/// Write per-year metrics as CSV
pub fn write_metrics_csv<W: Write>(
    writer: W,
    metrics: &[YearMetrics],
) -> Result<(), ScenarioFileError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for m in metrics {
        csv_writer.serialize(MetricsCsvRow::from(m))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// One row of the batch summary CSV
#[derive(Debug, Serialize)]
struct SummaryCsvRow<'a> {
    #[serde(rename = "Scenario")]
    scenario: &'a str,
    #[serde(rename = "StartBalance")]
    start_balance: f64,
    #[serde(rename = "ReturnPct")]
    return_pct: f64,
    #[serde(rename = "InflationPct")]
    inflation_pct: f64,
    #[serde(rename = "Years")]
    years: i32,
    #[serde(rename = "Withdrawal")]
    withdrawal: f64,
    #[serde(rename = "EndingBalance")]
    ending_balance: Option<f64>,
    #[serde(rename = "LifetimeInterest")]
    lifetime_interest: Option<f64>,
    #[serde(rename = "LifetimeInflationLoss")]
    lifetime_inflation_loss: Option<f64>,
    #[serde(rename = "AverageNetChange")]
    average_net_change: Option<f64>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Write one summary row per scenario outcome; failed scenarios keep their
/// inputs and carry the error text instead of results
pub fn write_summary_csv<W: Write>(
    writer: W,
    outcomes: &[ScenarioOutcome],
) -> Result<(), ScenarioFileError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for outcome in outcomes {
        let input = &outcome.scenario.input;
        let summary = outcome.result.as_ref().ok().map(|r| r.summary);

        csv_writer.serialize(SummaryCsvRow {
            scenario: &outcome.scenario.name,
            start_balance: input.start_balance,
            return_pct: percent_from_multiplier(input.return_rate),
            inflation_pct: percent_from_multiplier(input.inflation_rate),
            years: input.horizon_years,
            withdrawal: input.annual_withdrawal,
            ending_balance: summary.map(|s| s.ending_balance),
            lifetime_interest: summary.map(|s| s.lifetime_interest),
            lifetime_inflation_loss: summary.map(|s| s.lifetime_inflation_loss),
            average_net_change: summary.map(|s| s.average_net_change),
            error: outcome.result.as_ref().err().map(|e| e.to_string()),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Pretty-printed JSON for a report
pub fn to_json(report: &ProjectionReport) -> Result<String, ScenarioFileError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Fixed-width text table of the per-year metrics followed by the summary
pub fn render_table(report: &ProjectionReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:>5} {:>16} {:>14} {:>14} {:>14}",
        "Year", "Balance", "NetChange", "Interest", "InflationLoss"
    );
    let _ = writeln!(out, "{}", "-".repeat(67));

    for m in &report.metrics {
        let _ = writeln!(
            out,
            "{:>5} {:>16.3} {:>14.2} {:>14.2} {:>14.2}",
            m.year, m.balance, m.net_change, m.interest_earned, m.inflation_loss
        );
    }

    let s = &report.summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "Summary:");
    let _ = writeln!(out, "  Years:                   {}", s.years);
    let _ = writeln!(out, "  Ending Balance:          {:.3}", s.ending_balance);
    let _ = writeln!(out, "  Lifetime Interest:       {:.2}", s.lifetime_interest);
    let _ = writeln!(out, "  Lifetime Inflation Loss: {:.2}", s.lifetime_inflation_loss);
    let _ = writeln!(out, "  Average Net Change:      {:.2}", s.average_net_change);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;

    fn reference_report() -> ProjectionReport {
        ProjectionReport::build(&ProjectionInput::new(5000.0, 1.05, 1.047, 4, 1000.0)).unwrap()
    }

    #[test]
    fn test_build_report() {
        let report = reference_report();
        assert_eq!(report.balances.len(), 5);
        assert_eq!(report.metrics.len(), 5);
        assert_eq!(report.summary.years, 4);
        assert_eq!(report.summary.ending_balance, report.balances[4]);
    }

    #[test]
    fn test_build_rejects_negative_horizon() {
        let err =
            ProjectionReport::build(&ProjectionInput::new(1.0, 1.0, 1.0, -3, 0.0)).unwrap_err();
        assert_eq!(err, ProjectionError::InvalidHorizon { years: -3 });
    }

    #[test]
    fn test_metrics_csv() {
        let report = reference_report();
        let mut buf = Vec::new();
        write_metrics_csv(&mut buf, &report.metrics).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Year,Balance,NetChange,InterestEarned,InflationLoss");
        assert_eq!(lines[1], "0,5000.0,0.0,0.0,0.0");
        assert!(lines[2].starts_with("1,4015.0,-985.0,200.75,"));
    }

    #[test]
    fn test_summary_csv_includes_failures() {
        let good = Scenario::new("base", ProjectionInput::new(1000.0, 1.0, 1.0, 2, 100.0));
        let bad = Scenario::new("broken", ProjectionInput::new(1000.0, 1.0, 1.0, -1, 100.0));
        let outcomes = vec![ScenarioOutcome::run(good), ScenarioOutcome::run(bad)];

        let mut buf = Vec::new();
        write_summary_csv(&mut buf, &outcomes).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Scenario,StartBalance,ReturnPct,InflationPct,Years,"));
        assert!(lines[1].starts_with("base,1000.0,0.0,0.0,2,100.0,800.0,"));
        assert!(lines[2].starts_with("broken,"));
        assert!(lines[2].contains("invalid horizon"));
    }

    #[test]
    fn test_json_round_trip() {
        let report = reference_report();
        let json = to_json(&report).unwrap();
        assert!(json.contains("\"lifetime_interest\""));

        let parsed: ProjectionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.balances, report.balances);
        assert_eq!(parsed.summary.years, 4);
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&reference_report());
        assert!(table.contains("4015.000"));
        assert!(table.contains("Ending Balance:          1042.234"));
        // header, rule, five rows
        assert_eq!(table.lines().take_while(|l| !l.is_empty()).count(), 7);
    }
}
