//! Error types for the filter engine.
//!
//! Filtering, sorting and rendering never fail. These errors only surface at
//! developer-facing edges: parsing configuration, parsing enum values from
//! strings, and the opt-in schema check.

use thiserror::Error;

/// Main error type for engine setup.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid column schema: {0}")]
    InvalidSchema(String),

    #[error("Unknown sort direction: {0:?}")]
    UnknownSortDirection(String),

    #[error("Unknown {kind} value: {value:?}")]
    UnknownOption { kind: &'static str, value: String },
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::InvalidConfig(e.to_string())
    }
}

/// Result type for engine setup.
pub type Result<T> = std::result::Result<T, EngineError>;
