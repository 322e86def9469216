//! Default catalog embedded at compile time.
//!
//! Used when no schema directory is configured, so a fresh install can map
//! and validate without any files on disk.

/// Field definitions for all bundled entities.
pub const FIELDS_CSV: &str = include_str!("../data/Fields.csv");

/// Source-name aliases for the bundled entities.
pub const ALIASES_CSV: &str = include_str!("../data/Aliases.csv");

/// File names expected inside a schema directory.
pub const FIELDS_FILE: &str = "Fields.csv";
pub const ALIASES_FILE: &str = "Aliases.csv";
