//! Required field checks.
//!
//! A required target must be mapped, and every row must give it a value.

use crate::checks::CheckContext;
use crate::issue::{IssueKind, ValidationIssue};
use crate::report::IssueCollector;

pub(crate) fn check(ctx: &CheckContext<'_>, out: &mut IssueCollector) {
    for field in ctx.schema.required_fields() {
        if !ctx.mapping.is_target_mapped(&field.name) {
            out.push(ValidationIssue::new(field.name.as_str(), IssueKind::RequiredUnmapped));
            continue;
        }

        for (idx, row) in ctx.rows.iter().enumerate() {
            if !row.is_blank(&field.name) {
                continue;
            }
            let issue = match row.get(&field.name) {
                Some(raw) => ctx.row_issue(field, IssueKind::RequiredEmpty, idx + 1, raw),
                None => ValidationIssue::new(field.name.as_str(), IssueKind::RequiredEmpty)
                    .at_row(idx + 1),
            };
            out.push(issue);
        }
    }
}
