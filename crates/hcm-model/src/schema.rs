//! Destination schema definitions.
//!
//! An [`EntitySchema`] is loaded once per process and shared read-only
//! between concurrent mapping and validation calls.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator used by multi-value fields that do not declare their own.
pub const DEFAULT_MULTI_VALUE_SEPARATOR: &str = "||";

/// Declared value type of a target field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text.
    #[default]
    String,
    /// E-mail address.
    Email,
    /// Calendar date (ISO 8601 preferred).
    Date,
    /// Decimal number.
    Number,
    /// Yes/no flag.
    Boolean,
}

impl FieldType {
    /// Canonical lowercase name as used in schema catalogs.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Email => "email",
            FieldType::Date => "date",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    /// Parse a catalog type name. Accepts a few common spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "string" | "text" | "char" => Ok(FieldType::String),
            "email" | "e-mail" => Ok(FieldType::Email),
            "date" | "datetime" => Ok(FieldType::Date),
            "number" | "num" | "numeric" | "decimal" | "integer" => Ok(FieldType::Number),
            "boolean" | "bool" | "flag" => Ok(FieldType::Boolean),
            other => Err(format!("Unknown field type: {other}")),
        }
    }
}

/// One field of the destination schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFieldSpec {
    pub name: String,
    pub display_name: String,
    pub required: bool,
    pub field_type: FieldType,
    pub max_length: Option<usize>,
    /// Regular expression every non-empty value must match.
    pub pattern: Option<String>,
    /// Present for multi-value fields; the sub-value separator.
    pub separator: Option<String>,
}

impl TargetFieldSpec {
    /// Create an optional field whose display name equals its name.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            required: false,
            field_type,
            max_length: None,
            pattern: None,
            separator: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Mark the field as multi-value. `None` selects [`DEFAULT_MULTI_VALUE_SEPARATOR`].
    #[must_use]
    pub fn multi_value(mut self, separator: Option<&str>) -> Self {
        let separator = separator
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_MULTI_VALUE_SEPARATOR);
        self.separator = Some(separator.to_string());
        self
    }

    pub fn is_multi_value(&self) -> bool {
        self.separator.is_some()
    }

    pub fn separator(&self) -> Option<&str> {
        self.separator.as_deref()
    }
}

/// The destination schema for one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<TargetFieldSpec>,
    /// Target field used to group rows for duplicate detection.
    pub identifier: Option<String>,
    /// When true, duplicate identifiers are errors rather than warnings.
    pub unique_identifier: bool,
}

impl EntitySchema {
    pub fn new(name: impl Into<String>, fields: Vec<TargetFieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
            identifier: None,
            unique_identifier: false,
        }
    }

    /// Designate the identifier field used for duplicate detection.
    #[must_use]
    pub fn with_identifier(mut self, field: impl Into<String>, unique: bool) -> Self {
        self.identifier = Some(field.into());
        self.unique_identifier = unique;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Look up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&TargetFieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &TargetFieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn optional_fields(&self) -> impl Iterator<Item = &TargetFieldSpec> {
        self.fields.iter().filter(|f| !f.required)
    }

    /// The identifier field spec, if one is designated and declared.
    pub fn identifier_field(&self) -> Option<&TargetFieldSpec> {
        self.identifier.as_deref().and_then(|name| self.field(name))
    }

    /// First field name declared more than once, if any.
    pub fn duplicate_field_name(&self) -> Option<&str> {
        let mut seen = BTreeSet::new();
        self.fields
            .iter()
            .map(|f| f.name.as_str())
            .find(|name| !seen.insert(*name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_parses_catalog_spellings() {
        assert_eq!("EMAIL".parse::<FieldType>(), Ok(FieldType::Email));
        assert_eq!("numeric".parse::<FieldType>(), Ok(FieldType::Number));
        assert_eq!("".parse::<FieldType>(), Ok(FieldType::String));
        assert!("blob".parse::<FieldType>().is_err());
    }

    #[test]
    fn multi_value_defaults_separator() {
        let spec = TargetFieldSpec::new("SKILLS", FieldType::String).multi_value(None);
        assert_eq!(spec.separator(), Some("||"));
        let spec = TargetFieldSpec::new("TAGS", FieldType::String).multi_value(Some(";"));
        assert_eq!(spec.separator(), Some(";"));
    }

    #[test]
    fn detects_duplicate_field_names() {
        let schema = EntitySchema::new(
            "candidate",
            vec![
                TargetFieldSpec::new("EMAIL", FieldType::Email),
                TargetFieldSpec::new("PHONE", FieldType::String),
                TargetFieldSpec::new("EMAIL", FieldType::Email),
            ],
        );
        assert_eq!(schema.duplicate_field_name(), Some("EMAIL"));
    }
}
