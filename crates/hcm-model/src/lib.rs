//! Data model shared by the mapping and validation crates.
//!
//! - [`EntitySchema`] / [`TargetFieldSpec`]: the destination schema
//! - [`AliasDictionary`]: curated source-name synonyms
//! - [`MappingResult`] / [`Mapping`]: output of the field mapper
//! - [`Row`]: one record of source or transformed data

pub mod alias;
pub mod mapping;
pub mod row;
pub mod schema;

pub use alias::AliasDictionary;
pub use mapping::{
    Alternative, ConfidenceDistribution, ConfidenceLevel, ConfidenceThresholds, Mapping,
    MappingMethod, MappingResult, TargetSlot,
};
pub use row::Row;
pub use schema::{DEFAULT_MULTI_VALUE_SEPARATOR, EntitySchema, FieldType, TargetFieldSpec};
