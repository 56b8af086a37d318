use std::path::PathBuf;

use thiserror::Error;

/// Failures while locating or extracting data from the departures file.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("file {} does not exist", .0.display())]
    MissingInput(PathBuf),

    #[error("  -j  {index} larger than jmax {jmax}")]
    IndexOutOfRange { index: u32, jmax: f64 },

    #[error("no line mentioning 'observations' found")]
    MissingSummary,

    #[error("summary line {line:?} has no numeric fourth word")]
    MalformedSummary { line: String },

    #[error("expected at least {expected} 'bt' threshold lines, found {found}")]
    TooFewThresholdLines { expected: usize, found: usize },

    #[error("threshold line {line:?}: expected two numbers in columns 3-21")]
    MalformedThreshold { line: String },

    #[error("'{value}' is not a number")]
    NotANumber { value: String },
}
