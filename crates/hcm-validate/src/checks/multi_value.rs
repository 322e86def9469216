//! Structure checks for multi-value fields.

use crate::checks::CheckContext;
use crate::issue::IssueKind;
use crate::report::IssueCollector;

/// Delimiters people commonly use instead of the declared separator.
const ALTERNATE_SEPARATORS: &[&str] = &[",", ";", "|", "/"];

pub(crate) fn check(ctx: &CheckContext<'_>, out: &mut IssueCollector) {
    for field in ctx.mapped_fields() {
        let Some(separator) = field.separator() else {
            continue;
        };
        for (row, value) in ctx.values(field) {
            if value.split(separator).any(|part| part.trim().is_empty()) {
                let kind = IssueKind::EmptySubValue {
                    separator: separator.to_string(),
                };
                out.push(ctx.row_issue(field, kind, row, value));
                continue;
            }
            if !ctx.options.warn_alternate_separator || value.contains(separator) {
                continue;
            }
            if let Some(found) = ALTERNATE_SEPARATORS
                .iter()
                .find(|alt| **alt != separator && value.contains(**alt))
            {
                let kind = IssueKind::AlternateSeparator {
                    separator: separator.to_string(),
                    found: (*found).to_string(),
                };
                out.push(ctx.row_issue(field, kind, row, value));
            }
        }
    }
}
