//! Per-row and per-field checks run by the validator.
//!
//! Each check walks the mapped schema fields and pushes what it finds into
//! an [`IssueCollector`]; none of them mutate the rows.

pub(crate) mod datatype;
pub mod dates;
pub mod email;
pub(crate) mod duplicates;
pub(crate) mod length;
pub(crate) mod multi_value;
pub(crate) mod pattern;
pub(crate) mod required;

use hcm_model::{EntitySchema, MappingResult, Row, TargetFieldSpec};

use crate::issue::{IssueKind, ValidationIssue};
use crate::options::ValidationOptions;
use crate::report::IssueCollector;

/// Inputs shared by every check in one validation call.
pub(crate) struct CheckContext<'a> {
    pub rows: &'a [Row],
    pub schema: &'a EntitySchema,
    pub mapping: &'a MappingResult,
    pub options: &'a ValidationOptions,
}

impl<'a> CheckContext<'a> {
    /// Schema fields that have a mapping, in declaration order.
    pub fn mapped_fields(&self) -> impl Iterator<Item = &'a TargetFieldSpec> + 'a {
        let mapping = self.mapping;
        self.schema
            .fields
            .iter()
            .filter(move |f| mapping.is_target_mapped(&f.name))
    }

    /// Non-blank trimmed values of `field` with their 1-based row numbers.
    pub fn values(&self, field: &'a TargetFieldSpec) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        self.rows
            .iter()
            .enumerate()
            .filter_map(move |(idx, row)| row.value(&field.name).map(|v| (idx + 1, v)))
    }

    /// Row-scoped issue carrying a preview of `value`.
    pub fn row_issue(
        &self,
        field: &TargetFieldSpec,
        kind: IssueKind,
        row: usize,
        value: &str,
    ) -> ValidationIssue {
        ValidationIssue::new(field.name.as_str(), kind)
            .at_row(row)
            .with_value(value, self.options.value_preview_len)
    }
}

/// Individual values of a cell: split on the separator for multi-value
/// fields, blank parts dropped.
pub(crate) fn sub_values<'v>(field: &TargetFieldSpec, value: &'v str) -> Vec<&'v str> {
    match field.separator() {
        Some(separator) => value
            .split(separator)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect(),
        None => vec![value],
    }
}

/// Run the required-field checks.
pub(crate) fn run_required(ctx: &CheckContext<'_>, out: &mut IssueCollector) {
    required::check(ctx, out);
}

/// Run the value format checks.
pub(crate) fn run_formats(ctx: &CheckContext<'_>, out: &mut IssueCollector) {
    datatype::check(ctx, out);
    length::check(ctx, out);
    pattern::check(ctx, out);
    multi_value::check(ctx, out);
}

/// Run the duplicate identifier check.
pub(crate) fn run_duplicates(ctx: &CheckContext<'_>, out: &mut IssueCollector) {
    duplicates::check(ctx, out);
}
