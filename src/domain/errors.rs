//! Domain error types
//!
//! This module defines the error hierarchy for deid. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main deid error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum DeidError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A tab-delimited line could not be turned into a record
    #[error("Record error: {0}")]
    Record(#[from] MalformedRecordError),

    /// The annotation engine failed on a text
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Batch processing was aborted on a failing line
    #[error("Batch aborted at line {line}: {message}")]
    Batch { line: usize, message: String },

    /// HTTP server errors (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// A tab-delimited line did not split into the expected number of columns
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed record: expected {expected} tab-separated fields, found {found}")]
pub struct MalformedRecordError {
    /// Number of fields a record requires
    pub expected: usize,

    /// Number of fields found on the line
    pub found: usize,
}

/// Annotation engine errors
///
/// Raised by [`AnnotationEngine`](crate::anonymization::AnnotationEngine)
/// implementations. Callers surface these as internal failures without retrying.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The text cannot be annotated as given
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Any other failure inside the engine
    #[error("Internal engine failure: {0}")]
    Internal(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for DeidError {
    fn from(err: std::io::Error) -> Self {
        DeidError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for DeidError {
    fn from(err: serde_json::Error) -> Self {
        DeidError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for DeidError {
    fn from(err: toml::de::Error) -> Self {
        DeidError::Configuration(format!("TOML parse error: {err}"))
    }
}
