#![deny(unsafe_code)]

//! Field mapper for the hiring data model.
//!
//! Source column names are matched against an [`hcm_model::EntitySchema`]
//! through three stages tried in order: curated aliases, a similarity index,
//! and lexical fuzzy matching.

pub mod config;
pub mod engine;
pub mod error;
pub mod fuzzy;
pub mod index;
pub mod manual;
pub mod normalize;
pub mod strategy;
pub mod transform;

pub use config::MapperConfig;
pub use engine::FieldMapper;
pub use error::{IndexError, MapError, Result};
pub use index::{SimilarityIndex, TokenVectorIndex};
pub use manual::{clear_mapping, set_manual_mapping};
pub use normalize::normalize_name;
pub use transform::transform_rows;
