//! Maximum length checks, counted in characters.

use crate::checks::CheckContext;
use crate::issue::IssueKind;
use crate::report::IssueCollector;

pub(crate) fn check(ctx: &CheckContext<'_>, out: &mut IssueCollector) {
    for field in ctx.mapped_fields() {
        let Some(max_length) = field.max_length else {
            continue;
        };
        for (row, value) in ctx.values(field) {
            let length = value.chars().count();
            if length > max_length {
                out.push(ctx.row_issue(field, IssueKind::TooLong { length, max_length }, row, value));
            }
        }
    }
}
