use regex::Regex;

use crate::checks::{CheckContext, sub_values};
use crate::issue::IssueKind;
use crate::report::IssueCollector;

pub(crate) fn check(ctx: &CheckContext<'_>, out: &mut IssueCollector) {
    for field in ctx.mapped_fields() {
        let Some(pattern) = field.pattern.as_deref() else {
            continue;
        };
        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(err) => {
                tracing::warn!(field = %field.name, error = %err, "skipping invalid field pattern");
                continue;
            }
        };
        for (row, value) in ctx.values(field) {
            for part in sub_values(field, value) {
                if !regex.is_match(part) {
                    let kind = IssueKind::PatternMismatch {
                        pattern: pattern.to_string(),
                    };
                    out.push(ctx.row_issue(field, kind, row, part));
                }
            }
        }
    }
}
