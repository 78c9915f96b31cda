//! Error types for addcal.

use thiserror::Error;

/// Errors that can occur in addcal operations.
#[derive(Error, Debug)]
pub enum AddCalError {
    #[error("Event has no usable start/end date")]
    MissingDateData,

    #[error("Invalid input: {0}")]
    InvalidInputType(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Media import error: {0}")]
    MediaImport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AddCalError {
    fn from(err: serde_json::Error) -> Self {
        AddCalError::Serialization(err.to_string())
    }
}

/// Result type alias for addcal operations.
pub type AddCalResult<T> = Result<T, AddCalError>;
