//! Market data error types

use thiserror::Error;

/// Errors surfaced by the submission flow and its collaborators
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// One or more records failed validation; nothing was sent
    #[error("Validation failed for {} record(s): {invalid_records:?}", .invalid_records.len())]
    Validation { invalid_records: Vec<usize> },

    /// The submission request failed (connectivity, server rejection, decoding)
    #[error("Error posting market data: {0}")]
    Transport(String),

    /// Batch file could not be read or written
    #[error("Batch file error: {0}")]
    Io(#[from] std::io::Error),

    /// Batch file could not be parsed or serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MarketDataError {
    fn from(err: serde_json::Error) -> Self {
        MarketDataError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for MarketDataError {
    fn from(err: serde_yaml::Error) -> Self {
        MarketDataError::Serialization(err.to_string())
    }
}

/// Errors from Record Store operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No record at the given position
    #[error("Record index {index} out of range (have {len} records)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Value cannot be stored in the named field
    #[error("{0}")]
    InvalidValue(String),
}

/// Result type for Record Store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
