//! Error types for Tally

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Insufficient data: no data available ({0})")]
    EmptyDataset(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Malformed field on a 1-based data row
    pub(crate) fn malformed_row(row: usize, message: impl std::fmt::Display) -> Self {
        Error::MalformedInput(format!("row {}: {}", row, message))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
