//! Duplicate identifier detection.
//!
//! Rows are grouped by the schema's identifier field; every group with more
//! than one row yields one issue listing all its row numbers.

use std::collections::BTreeMap;

use crate::checks::CheckContext;
use crate::issue::IssueKind;
use crate::report::IssueCollector;

pub(crate) fn check(ctx: &CheckContext<'_>, out: &mut IssueCollector) {
    let Some(field) = ctx.schema.identifier_field() else {
        return;
    };
    if !ctx.mapping.is_target_mapped(&field.name) {
        return;
    }

    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (row, value) in ctx.values(field) {
        groups.entry(value).or_default().push(row);
    }

    let mut duplicates: Vec<(&str, Vec<usize>)> = groups
        .into_iter()
        .filter(|(_, rows)| rows.len() > 1)
        .collect();
    duplicates.sort_by_key(|(_, rows)| rows[0]);

    for (value, rows) in duplicates {
        let first = rows[0];
        let kind = IssueKind::DuplicateIdentifier {
            rows,
            unique: ctx.schema.unique_identifier,
        };
        out.push(ctx.row_issue(field, kind, first, value));
    }
}
