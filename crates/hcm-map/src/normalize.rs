//! Name normalization used for every comparison the mapper makes.
//!
//! Normalized forms are never written to results; mappings keep the source
//! name exactly as supplied.

/// Uppercase, trim, turn separators into spaces, drop other punctuation and
/// collapse runs of whitespace.
///
/// `"  work_e-mail (primary) "` becomes `"WORK E MAIL PRIMARY"`.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_uppercase());
        } else if ch.is_whitespace() || matches!(ch, '_' | '-' | '.' | '/' | '\\' | ':' | ',') {
            out.push(' ');
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a normalized name into comparison tokens with light plural stemming.
pub fn tokenize(normalized: &str) -> impl Iterator<Item = String> + '_ {
    normalized.split_whitespace().map(stem)
}

/// Strip a trailing plural `S` from tokens longer than three characters,
/// leaving double-`S` endings such as `ADDRESS` intact.
fn stem(token: &str) -> String {
    if token.len() > 3 && token.ends_with('S') && !token.ends_with("SS") {
        token[..token.len() - 1].to_string()
    } else {
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_case() {
        assert_eq!(normalize_name("  work_e-mail (primary) "), "WORK E MAIL PRIMARY");
        assert_eq!(normalize_name("Person   ID"), "PERSON ID");
        assert_eq!(normalize_name("candidate_id"), "CANDIDATE ID");
        assert_eq!(normalize_name("Applicant's #"), "APPLICANTS");
        assert_eq!(normalize_name("***"), "");
    }

    #[test]
    fn stems_plural_tokens() {
        let tokens: Vec<String> = tokenize("WORK EMAILS ADDRESS IDS").collect();
        assert_eq!(tokens, vec!["WORK", "EMAIL", "ADDRESS", "IDS"]);
    }
}
