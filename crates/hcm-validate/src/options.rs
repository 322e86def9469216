use serde::{Deserialize, Serialize};

/// Tunables for [`Validator`](crate::Validator) and the integrity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Errors kept per field before further ones are only counted.
    pub error_cap_per_field: usize,
    /// Characters of an offending value kept on an issue.
    pub value_preview_len: usize,
    /// Warn when a multi-value cell seems to use another delimiter.
    pub warn_alternate_separator: bool,
    /// chrono format strings accepted in addition to the built-in date formats.
    pub extra_date_formats: Vec<String>,
    /// Missing row indices reported on a data loss error.
    pub missing_indices_cap: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            error_cap_per_field: 100,
            value_preview_len: 50,
            warn_alternate_separator: true,
            extra_date_formats: Vec::new(),
            missing_indices_cap: 100,
        }
    }
}
