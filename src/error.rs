//! Error types for projections and scenario files

use thiserror::Error;

/// Errors raised by the projection engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// Horizon must be zero or more years
    #[error("invalid horizon: {years} years (must be >= 0)")]
    InvalidHorizon { years: i32 },
}

/// Errors raised while reading or writing scenario and report files
#[derive(Error, Debug)]
pub enum ScenarioFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A row parsed but carries values the loader cannot accept
    #[error("invalid scenario row {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
}
