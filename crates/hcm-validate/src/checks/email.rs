use std::sync::LazyLock;

use regex::Regex;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]{2,}$").expect("Invalid email regex")
});

/// Loose address shape check: one `@`, a dot in the domain, no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}
