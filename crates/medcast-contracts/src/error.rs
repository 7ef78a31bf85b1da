//! Error types shared by every medcast crate.
//!
//! All fallible operations return `MedcastResult<T>`. An empty medication
//! selection is deliberately absent here: the pipeline reports it through the
//! dashboard payload instead of failing the query.

use thiserror::Error;

/// The unified error type for medcast.
#[derive(Debug, Error)]
pub enum MedcastError {
    /// A query parameter fell outside its declared domain.
    ///
    /// Raised at the input boundary (typed constructors, request validation)
    /// so the pipeline never observes an invalid query.
    #[error("input '{field}' out of range: {reason}")]
    OutOfRangeInput { field: String, reason: String },

    /// The TOML configuration is missing, malformed, or inconsistent.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A patient roster or event log violates the dataset invariants.
    #[error("invalid dataset: {reason}")]
    InvalidDataset { reason: String },

    /// The forecaster could not draw samples from the requested interval.
    #[error("forecast error: {reason}")]
    Forecast { reason: String },

    /// A reference scenario computed a dashboard that does not show the
    /// property it exists to demonstrate.
    #[error("scenario '{scenario}' check failed: {reason}")]
    ScenarioCheck { scenario: String, reason: String },

    /// Reading a config or request file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A dashboard payload could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MedcastError {
    /// Shorthand for an `OutOfRangeInput` error.
    pub fn out_of_range(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OutOfRangeInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the medcast crates.
pub type MedcastResult<T> = Result<T, MedcastError>;
