//! Error types for mapping operations.

use std::time::Duration;

use thiserror::Error;

/// Errors from mapping operations.
///
/// These are input contract violations: fatal to the call and never retried.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum MapError {
    #[error("No source fields supplied")]
    EmptyInput,

    #[error("Schema '{entity}' has no fields")]
    InvalidSchema { entity: String },

    #[error("Minimum confidence {value} is outside [0, 1]")]
    InvalidThreshold { value: f64 },

    #[error("Mapping setting {name} = {value} is not allowed: {reason}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Source field '{name}' appears more than once")]
    DuplicateSourceField { name: String },

    #[error("Source field not found: {name}")]
    SourceFieldNotFound { name: String },

    #[error("Target field '{name}' is not part of schema '{entity}'")]
    TargetFieldNotFound { name: String, entity: String },
}

/// Failure reported by a [`SimilarityIndex`](crate::SimilarityIndex).
///
/// The mapper recovers from these locally by skipping the semantic stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("Similarity index timed out after {0:?}")]
    Timeout(Duration),

    #[error("Similarity index unavailable: {0}")]
    Unavailable(String),
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, MapError>;
