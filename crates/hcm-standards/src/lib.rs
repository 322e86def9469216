#![deny(unsafe_code)]

//! Entity schema catalog for the field-mapping engine.
//!
//! Schemas and alias dictionaries are read from a `Fields.csv` /
//! `Aliases.csv` pair, either from a directory (`HCM_SCHEMA_DIR`) or from
//! the catalog embedded in the binary.

pub mod embedded;
pub mod error;
mod loader;
pub mod registry;

pub use crate::error::{Result, StandardsError};
pub use crate::registry::{SCHEMA_DIR_ENV_VAR, SchemaRegistry, default_schema_dir};
