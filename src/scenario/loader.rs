//! Load scenarios from CSV
//!
//! Expected header: `Name,StartBalance,ReturnPct,InflationPct,Years,Withdrawal`.
//! Rates are percentages (5.0 = 5%) and are converted to multipliers here.

use super::Scenario;
use crate::error::ScenarioFileError;
use crate::projection::ProjectionInput;
use csv::{Reader, StringRecord};
use log::debug;
use std::path::Path;

/// Raw CSV row matching the scenario file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Name")]
    name: String,
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
}

impl CsvRow {
    fn to_scenario(self, line: u64) -> Result<Scenario, ScenarioFileError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ScenarioFileError::InvalidRow {
                line,
                reason: "empty scenario name".to_string(),
            });
        }

        // Negative years are kept; the engine reports them when the scenario runs
        let input = ProjectionInput::from_percentages(
            self.start_balance,
            self.return_pct,
            self.inflation_pct,
            self.years,
            self.withdrawal,
        );

        Ok(Scenario::new(name, input))
    }
}

/// Load all scenarios from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<Scenario>, ScenarioFileError> {
    let reader = Reader::from_path(path.as_ref())?;
    let scenarios = read_all(reader)?;
    debug!("loaded {} scenarios from {}", scenarios.len(), path.as_ref().display());
    Ok(scenarios)
}

/// Load scenarios from any reader (e.g., string buffer, stdin)
pub fn load_scenarios_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<Scenario>, ScenarioFileError> {
    read_all(Reader::from_reader(reader))
}

fn read_all<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<Scenario>, ScenarioFileError> {
    let headers = reader.headers()?.clone();
    let mut record = StringRecord::new();
    let mut scenarios = Vec::new();

    while reader.read_record(&mut record)? {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: CsvRow = record.deserialize(Some(&headers))?;
        scenarios.push(row.to_scenario(line)?);
    }

    Ok(scenarios)
}
