//! Validation issue types.
//!
//! [`IssueKind`] carries only the data each kind of finding needs;
//! [`ValidationIssue`] adds the field, row and value it was found at.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Issue severity level, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks export
    Error,
    /// Should review
    Warning,
    /// Informational only
    Info,
}

impl Severity {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Info => "Info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    // Presence checks
    /// Required target has no source mapped to it
    RequiredUnmapped,
    /// Required target is mapped but this row has no value
    RequiredEmpty,

    // Format checks
    InvalidEmail,
    InvalidDate,
    InvalidNumber,
    InvalidBoolean,
    PatternMismatch { pattern: String },
    TooLong { length: usize, max_length: usize },

    // Multi-value checks
    /// A sub-value between separators is empty
    EmptySubValue { separator: String },
    /// Value looks delimited by something other than the declared separator
    AlternateSeparator { separator: String, found: String },

    // Consistency checks
    /// Identifier value shared by several rows
    DuplicateIdentifier { rows: Vec<usize>, unique: bool },

    /// Per-field error cap reached; further errors were counted, not kept
    ErrorsSuppressed { suppressed: u64 },
}

impl IssueKind {
    /// Severity for this kind of issue.
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::AlternateSeparator { .. } => Severity::Warning,
            IssueKind::DuplicateIdentifier { unique: false, .. } => Severity::Warning,
            IssueKind::ErrorsSuppressed { .. } => Severity::Info,
            _ => Severity::Error,
        }
    }

    /// Format message with issue-specific data. Never includes the value.
    pub fn message(&self, field: &str) -> String {
        match self {
            IssueKind::RequiredUnmapped => {
                format!("Required field {field} is not mapped to any source field")
            }
            IssueKind::RequiredEmpty => format!("{field} is required but empty"),
            IssueKind::InvalidEmail => format!("{field} is not a valid email address"),
            IssueKind::InvalidDate => format!("{field} is not a recognized date"),
            IssueKind::InvalidNumber => format!("{field} is not a valid number"),
            IssueKind::InvalidBoolean => format!("{field} is not a valid boolean"),
            IssueKind::PatternMismatch { pattern } => {
                format!("{field} does not match pattern {pattern}")
            }
            IssueKind::TooLong { length, max_length } => {
                format!("{field} is {length} characters long; maximum is {max_length}")
            }
            IssueKind::EmptySubValue { separator } => {
                format!("{field} contains an empty value around separator '{separator}'")
            }
            IssueKind::AlternateSeparator { separator, found } => {
                format!("{field} appears to use '{found}' instead of separator '{separator}'")
            }
            IssueKind::DuplicateIdentifier { rows, .. } => {
                let rows = rows
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{field} value is repeated in rows {rows}")
            }
            IssueKind::ErrorsSuppressed { suppressed } => {
                format!("{suppressed} further {field} errors not listed")
            }
        }
    }
}

/// One detected data-quality problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub severity: Severity,
    pub message: String,
    /// 1-based row number; `None` for mapping-level issues.
    pub row: Option<usize>,
    /// Offending value, truncated for display.
    pub value: Option<String>,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, kind: IssueKind) -> Self {
        let field = field.into();
        Self {
            severity: kind.severity(),
            message: kind.message(&field),
            field,
            row: None,
            value: None,
            kind,
        }
    }

    #[must_use]
    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Attach the offending value, keeping at most `max_chars` characters.
    #[must_use]
    pub fn with_value(mut self, value: &str, max_chars: usize) -> Self {
        self.value = Some(truncate_chars(value, max_chars));
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}
