//! Row-count integrity between an input row set and its transformed output.
//!
//! A shrinking row count is reported as a [`DataLossError`] rather than a
//! [`ValidationIssue`](crate::ValidationIssue): it blocks export and must be
//! handled by the caller.

use std::collections::BTreeMap;

use hcm_model::Row;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::ValidationOptions;

const CAUSE_NULL_KEYS: &str = "null values in required fields";
const CAUSE_UNKNOWN: &str = "rows removed during transformation";

/// Rows were lost between input and output.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error(
    "data loss: {lost_rows} of {total_rows} rows ({:.2}%) missing after transformation; causes: {}",
    .loss_percentage,
    .causes.join(", ")
)]
pub struct DataLossError {
    pub lost_rows: usize,
    pub total_rows: usize,
    /// Percentage of input rows lost, rounded to two decimals.
    pub loss_percentage: f64,
    /// 0-based input positions whose key no longer appears in the output.
    pub missing_row_indices: Vec<usize>,
    pub causes: Vec<String>,
}

impl DataLossError {
    /// Loss percentage as shown to users, e.g. `3.63%`.
    pub fn loss_percentage_label(&self) -> String {
        format!("{:.2}%", self.loss_percentage)
    }
}

/// Per-row values of one key column, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValues {
    pub field: String,
    pub values: Vec<Option<String>>,
}

impl KeyValues {
    pub fn new(field: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            field: field.into(),
            values,
        }
    }

    /// Collect `field` from each row; blank cells become `None`.
    pub fn from_rows(field: &str, rows: &[Row]) -> Self {
        Self::new(
            field,
            rows.iter()
                .map(|row| row.value(field).map(str::to_string))
                .collect(),
        )
    }

    fn key(&self, row: usize) -> Option<&str> {
        self.values
            .get(row)
            .and_then(Option::as_deref)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for row in 0..self.values.len() {
            if let Some(key) = self.key(row) {
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Fail when `output_row_count < input_row_count` unless deduplication is
/// allowed. A larger output is never an error.
pub fn check_row_integrity(
    input_row_count: usize,
    output_row_count: usize,
    allow_deduplication: bool,
    input_key_values: &[KeyValues],
    output_key_values: &[KeyValues],
) -> Result<(), DataLossError> {
    check_row_integrity_with(
        input_row_count,
        output_row_count,
        allow_deduplication,
        input_key_values,
        output_key_values,
        &ValidationOptions::default(),
    )
}

/// [`check_row_integrity`] with an explicit cap on reported missing indices.
pub fn check_row_integrity_with(
    input_row_count: usize,
    output_row_count: usize,
    allow_deduplication: bool,
    input_key_values: &[KeyValues],
    output_key_values: &[KeyValues],
    options: &ValidationOptions,
) -> Result<(), DataLossError> {
    if output_row_count >= input_row_count {
        if output_row_count > input_row_count {
            tracing::debug!(input_row_count, output_row_count, "output has more rows than input");
        }
        return Ok(());
    }
    if allow_deduplication {
        tracing::info!(
            input_row_count,
            output_row_count,
            "row count decreased; deduplication permitted"
        );
        return Ok(());
    }

    let lost_rows = input_row_count - output_row_count;
    let loss_percentage = round2(lost_rows as f64 / input_row_count as f64 * 100.0);
    let missing_row_indices = missing_indices(
        input_row_count,
        input_key_values,
        output_key_values,
        options.missing_indices_cap,
    );
    let causes = causes(input_key_values, output_key_values);

    tracing::warn!(
        lost_rows,
        total_rows = input_row_count,
        loss_percentage,
        "rows lost during transformation"
    );
    Err(DataLossError {
        lost_rows,
        total_rows: input_row_count,
        loss_percentage,
        missing_row_indices,
        causes,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Composite key of input row `row` across `columns`.
fn composite_key<'a>(columns: &'a [KeyValues], row: usize) -> Vec<Option<&'a str>> {
    columns.iter().map(|c| c.key(row)).collect()
}

/// Input rows whose composite key is not matched by an output row.
///
/// Output keys are consumed as a multiset, so a key present twice in the
/// input and once in the output reports its second occurrence.
fn missing_indices(
    input_row_count: usize,
    input: &[KeyValues],
    output: &[KeyValues],
    cap: usize,
) -> Vec<usize> {
    if input.is_empty() {
        return Vec::new();
    }
    // Align output columns with the input ones by field name.
    let aligned: Vec<Option<&KeyValues>> = input
        .iter()
        .map(|i| output.iter().find(|o| o.field == i.field))
        .collect();
    let output_rows = aligned
        .iter()
        .flatten()
        .map(|o| o.values.len())
        .max()
        .unwrap_or(0);

    let mut available: BTreeMap<Vec<Option<&str>>, usize> = BTreeMap::new();
    for row in 0..output_rows {
        let key = aligned
            .iter()
            .map(|col| col.and_then(|c| c.key(row)))
            .collect();
        *available.entry(key).or_insert(0) += 1;
    }

    let mut missing = Vec::new();
    for row in 0..input_row_count {
        if missing.len() >= cap {
            break;
        }
        let key = composite_key(input, row);
        match available.get_mut(&key) {
            Some(count) if *count > 0 => *count -= 1,
            _ => missing.push(row),
        }
    }
    missing
}

fn causes(input: &[KeyValues], output: &[KeyValues]) -> Vec<String> {
    let mut causes = Vec::new();
    for column in input {
        let input_counts = column.counts();
        let output_counts = output
            .iter()
            .find(|o| o.field == column.field)
            .map(KeyValues::counts);
        let collapsed = input_counts.iter().any(|(key, count)| {
            *count > 1
                && output_counts
                    .as_ref()
                    .is_none_or(|out| out.get(key).copied().unwrap_or(0) < *count)
        });
        if collapsed {
            causes.push(format!("duplicate {} values", column.field));
        }
    }
    let has_null_keys = input
        .iter()
        .any(|column| (0..column.values.len()).any(|row| column.key(row).is_none()));
    if has_null_keys {
        causes.push(CAUSE_NULL_KEYS.to_string());
    }
    if causes.is_empty() {
        causes.push(CAUSE_UNKNOWN.to_string());
    }
    causes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(field: &str, values: &[Option<&str>]) -> KeyValues {
        KeyValues::new(field, values.iter().map(|v| v.map(str::to_string)).collect())
    }

    #[test]
    fn row_count_law() {
        let err = check_row_integrity(1213, 1169, false, &[], &[]).unwrap_err();
        assert_eq!(err.lost_rows, 44);
        assert_eq!(err.total_rows, 1213);
        assert_eq!(err.loss_percentage_label(), "3.63%");
        assert_eq!(err.causes, vec![CAUSE_UNKNOWN]);
        assert!(err.missing_row_indices.is_empty());
        insta::assert_snapshot!(
            err.to_string(),
            @"data loss: 44 of 1213 rows (3.63%) missing after transformation; causes: rows removed during transformation"
        );

        assert_eq!(check_row_integrity(1213, 1213, false, &[], &[]), Ok(()));
        assert_eq!(check_row_integrity(1213, 1169, true, &[], &[]), Ok(()));
        assert_eq!(check_row_integrity(10, 12, false, &[], &[]), Ok(()));
    }

    #[test]
    fn collapsed_duplicates_are_reported() {
        let input = [keys("CANDIDATE_ID", &[Some("A1"), Some("B2"), Some("A1"), Some("C3")])];
        let output = [keys("CANDIDATE_ID", &[Some("A1"), Some("B2"), Some("C3")])];
        let err = check_row_integrity(4, 3, false, &input, &output).unwrap_err();

        assert_eq!(err.missing_row_indices, vec![2]);
        assert_eq!(err.causes, vec!["duplicate CANDIDATE_ID values"]);
        assert_eq!(err.loss_percentage, 25.0);
    }

    #[test]
    fn null_keys_are_reported() {
        let input = [keys("CANDIDATE_ID", &[Some("A1"), None, Some(" ")])];
        let output = [keys("CANDIDATE_ID", &[Some("A1")])];
        let err = check_row_integrity(3, 1, false, &input, &output).unwrap_err();

        assert_eq!(err.missing_row_indices, vec![1, 2]);
        assert_eq!(err.causes, vec![CAUSE_NULL_KEYS]);
    }

    #[test]
    fn missing_indices_are_capped() {
        let values: Vec<Option<String>> = (0..500).map(|i| Some(format!("K{i}"))).collect();
        let input = [KeyValues::new("ID", values)];
        let options = ValidationOptions {
            missing_indices_cap: 10,
            ..ValidationOptions::default()
        };
        let err = check_row_integrity_with(500, 0, false, &input, &[], &options).unwrap_err();

        assert_eq!(err.lost_rows, 500);
        assert_eq!(err.missing_row_indices, (0..10).collect::<Vec<_>>());
        assert_eq!(err.loss_percentage_label(), "100.00%");
    }
}
