//! Error types.

use thiserror::Error;

/// Errors that abort a whole scene import.
///
/// Malformed individual elements never produce an error; they are skipped.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Missing 'elements' array")]
    MissingElements,
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },
}
