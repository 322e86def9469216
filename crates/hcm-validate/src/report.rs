//! Validation report containing all issues for one validated row set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::issue::{IssueKind, Severity, ValidationIssue};

/// Aggregate counts for a report.
///
/// Error totals include errors suppressed by the per-field cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub required_mapped: usize,
    pub required_total: usize,
    pub optional_mapped: usize,
    pub optional_total: usize,
    pub rows_checked: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub suppressed_errors: usize,
}

/// Outcome of validating one row set against a schema and mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub entity: String,
    /// True iff no error-severity issue was found, suppressed ones included.
    pub is_valid: bool,
    /// Errors first, then warnings, then infos; detection order within each.
    pub issues: Vec<ValidationIssue>,
    pub summary: ValidationSummary,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Total errors found, including those not listed.
    pub fn error_count(&self) -> usize {
        self.summary.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.summary.warning_count
    }

    pub fn info_count(&self) -> usize {
        self.summary.info_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(Severity::Warning)
    }

    pub fn infos(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(Severity::Info)
    }

    pub fn issues_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues.iter().filter(move |i| i.field == field)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }
}

/// Collects issues while enforcing the per-field error cap.
pub(crate) struct IssueCollector {
    cap: usize,
    issues: Vec<ValidationIssue>,
    errors_per_field: BTreeMap<String, usize>,
    suppressed: BTreeMap<String, u64>,
}

impl IssueCollector {
    pub(crate) fn new(cap: usize) -> Self {
        Self {
            cap,
            issues: Vec::new(),
            errors_per_field: BTreeMap::new(),
            suppressed: BTreeMap::new(),
        }
    }

    pub(crate) fn push(&mut self, issue: ValidationIssue) {
        if issue.is_error() {
            let count = self.errors_per_field.entry(issue.field.clone()).or_insert(0);
            *count += 1;
            if *count > self.cap {
                *self.suppressed.entry(issue.field).or_insert(0) += 1;
                return;
            }
        }
        self.issues.push(issue);
    }

    /// Finish collection: add one info issue per capped field and order by
    /// severity. Returns the issues and the number of suppressed errors.
    pub(crate) fn finish(mut self) -> (Vec<ValidationIssue>, usize) {
        let mut total_suppressed = 0usize;
        for (field, suppressed) in std::mem::take(&mut self.suppressed) {
            tracing::debug!(field = %field, suppressed, "error cap reached");
            total_suppressed += suppressed as usize;
            self.issues
                .push(ValidationIssue::new(field, IssueKind::ErrorsSuppressed { suppressed }));
        }
        self.issues.sort_by_key(|issue| issue.severity);
        (self.issues, total_suppressed)
    }
}
