//! Optional TOML configuration file.
//!
//! ```toml
//! [mapping]
//! min_confidence = 0.75
//!
//! [validation]
//! error_cap_per_field = 50
//! extra_date_formats = ["%Y.%m.%d"]
//! ```
//!
//! Missing tables and keys fall back to the library defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use hcm_map::MapperConfig;
use hcm_validate::ValidationOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub mapping: MapperConfig,
    pub validation: ValidationOptions,
}

impl AppConfig {
    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("parse configuration")?;
        config
            .mapping
            .validate()
            .context("invalid [mapping] configuration")?;
        Ok(config)
    }

    /// Read the file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read configuration file {}", path.display()))?;
        let config = Self::parse(&content).with_context(|| format!("load {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Read `path` when given, defaults otherwise.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tables_use_defaults() {
        assert_eq!(AppConfig::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = AppConfig::parse(
            r#"
            [mapping]
            min_confidence = 0.8

            [validation]
            error_cap_per_field = 5
            extra_date_formats = ["%Y.%m.%d"]
            "#,
        )
        .unwrap();
        assert_eq!(config.mapping.min_confidence, 0.8);
        assert_eq!(config.mapping.semantic_top_k, 3);
        assert_eq!(config.validation.error_cap_per_field, 5);
        assert_eq!(config.validation.value_preview_len, 50);
        assert_eq!(config.validation.extra_date_formats, vec!["%Y.%m.%d"]);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let err = AppConfig::parse("[mapping]\nmin_confidence = 1.5\n").unwrap_err();
        assert!(format!("{err:#}").contains("invalid [mapping] configuration"));
    }

    #[test]
    fn unknown_table_is_rejected() {
        assert!(AppConfig::parse("[mapper]\nmin_confidence = 0.5\n").is_err());
    }
}
