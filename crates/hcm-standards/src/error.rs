//! Error types for schema catalog loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or querying the schema catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StandardsError {
    /// No schema is registered under the requested entity name.
    #[error("Schema not found: {entity}")]
    SchemaNotFound { entity: String },

    /// A schema definition violates a catalog rule.
    #[error("Invalid schema '{entity}': {message}")]
    InvalidSchema { entity: String, message: String },

    /// Failed to read or parse a CSV file.
    #[error("Failed to read CSV {origin}: {source}")]
    Csv {
        origin: String,
        #[source]
        source: csv::Error,
    },

    /// Invalid value in a CSV field.
    #[error("Invalid {field} value '{value}' in {origin}")]
    InvalidValue {
        field: &'static str,
        value: String,
        origin: String,
    },

    /// Failed to open a catalog file.
    #[error("Failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StandardsError {
    pub(crate) fn invalid_schema(entity: &str, message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            entity: entity.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, StandardsError>;
