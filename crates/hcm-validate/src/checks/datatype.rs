//! Declared type checks: email, date, number and boolean fields.
//!
//! Multi-value fields are checked one sub-value at a time.

use hcm_model::FieldType;

use crate::checks::dates::is_valid_date;
use crate::checks::email::is_valid_email;
use crate::checks::{CheckContext, sub_values};
use crate::issue::IssueKind;
use crate::report::IssueCollector;

const BOOLEAN_VALUES: &[&str] = &["true", "false", "yes", "no", "y", "n", "1", "0"];

/// Decimal number without thousands separators.
pub(crate) fn is_valid_number(value: &str) -> bool {
    let value = value.trim();
    !value.contains(',') && value.parse::<f64>().is_ok_and(f64::is_finite)
}

pub(crate) fn is_valid_boolean(value: &str) -> bool {
    let value = value.trim();
    BOOLEAN_VALUES.iter().any(|b| b.eq_ignore_ascii_case(value))
}

/// Issue kind for a value that does not parse as `field_type`, if any.
fn type_violation(field_type: FieldType, value: &str, extra_formats: &[String]) -> Option<IssueKind> {
    let (kind, is_valid) = match field_type {
        FieldType::String => return None,
        FieldType::Email => (IssueKind::InvalidEmail, is_valid_email(value)),
        FieldType::Date => (IssueKind::InvalidDate, is_valid_date(value, extra_formats)),
        FieldType::Number => (IssueKind::InvalidNumber, is_valid_number(value)),
        FieldType::Boolean => (IssueKind::InvalidBoolean, is_valid_boolean(value)),
    };
    (!is_valid).then_some(kind)
}

pub(crate) fn check(ctx: &CheckContext<'_>, out: &mut IssueCollector) {
    let extra_formats = &ctx.options.extra_date_formats;
    for field in ctx.mapped_fields() {
        if field.field_type == FieldType::String {
            continue;
        }
        for (row, value) in ctx.values(field) {
            for part in sub_values(field, value) {
                if let Some(kind) = type_violation(field.field_type, part, extra_formats) {
                    out.push(ctx.row_issue(field, kind, row, part));
                }
            }
        }
    }
}
