//! Data validation for mapped HR datasets.
//!
//! Two independent entry points:
//! - [`check_row_integrity`] compares input and output row counts and fails
//!   with a [`DataLossError`] when rows disappeared.
//! - [`Validator::validate_rows`] checks required fields, value formats and
//!   duplicate identifiers, producing a [`ValidationReport`].

#![deny(unsafe_code)]

pub mod checks;
pub mod integrity;
pub mod issue;
pub mod options;
pub mod report;
pub mod stage;
pub mod validator;

pub use integrity::{DataLossError, KeyValues, check_row_integrity, check_row_integrity_with};
pub use issue::{IssueKind, Severity, ValidationIssue};
pub use options::ValidationOptions;
pub use report::{ValidationReport, ValidationSummary};
pub use stage::ValidationStage;
pub use validator::{Validator, validate_rows};
