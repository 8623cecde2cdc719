//! # Error Types
//!
//! Generators never fail: out-of-range parameters are clamped. These errors
//! only surface at the host boundary (parameter parsing, config loading,
//! output files).

use thiserror::Error;

/// Main error type for geomancy operations
#[derive(Debug, Error)]
pub enum GeomancyError {
    /// No generator registered under this name
    #[error("Unknown generator: {0}")]
    UnknownGenerator(String),

    /// Parameter name or value could not be parsed
    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    /// Color string could not be parsed
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
