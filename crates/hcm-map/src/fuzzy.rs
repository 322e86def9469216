//! Lexical similarity used by the last mapping stage.

use rapidfuzz::distance::indel;

/// Normalized Indel similarity of two strings in `[0, 1]`.
///
/// Equals `1 - (insertions + deletions) / (len_a + len_b)`. An empty input
/// never matches anything.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    indel::normalized_similarity(a.chars(), b.chars()).clamp(0.0, 1.0)
}
