//! Similarity index collaborator and the bundled in-memory implementation.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use hcm_model::EntitySchema;

use crate::error::IndexError;
use crate::normalize::{normalize_name, tokenize};

/// Nearest-target lookup consulted by the semantic stage.
///
/// Implementations must be safe for concurrent read queries. Remote
/// implementations are expected to enforce their own timeout and report it
/// as [`IndexError::Timeout`].
pub trait SimilarityIndex: Send + Sync {
    /// Up to `k` target names nearest to `query`, best first, with scores in
    /// `[0, 1]`. Names in `excluded` must not be returned.
    ///
    /// A target sharing nothing with the query is not a neighbour and may be
    /// omitted; the fuzzy stage still scores it.
    fn nearest(
        &self,
        query: &str,
        k: usize,
        excluded: &BTreeSet<String>,
    ) -> Result<Vec<(String, f64)>, IndexError>;
}

type SparseVector = BTreeMap<String, f64>;

/// Bag-of-tokens cosine index over a schema's target names.
///
/// Each target contributes two documents, its name and its display name; a
/// target's score is the better of the two.
#[derive(Debug, Clone, Default)]
pub struct TokenVectorIndex {
    entries: Vec<IndexEntry>,
}

#[derive(Debug, Clone)]
struct IndexEntry {
    target: String,
    documents: Vec<SparseVector>,
}

impl TokenVectorIndex {
    pub fn from_schema(schema: &EntitySchema) -> Self {
        let mut index = Self::default();
        for field in &schema.fields {
            index.insert(&field.name, [field.name.as_str(), field.display_name.as_str()]);
        }
        index
    }

    /// Add a target described by one or more phrases.
    pub fn insert<'a>(&mut self, target: &str, phrases: impl IntoIterator<Item = &'a str>) {
        let mut documents: Vec<SparseVector> = Vec::new();
        for phrase in phrases {
            let vector = embed(phrase);
            if !vector.is_empty() && !documents.contains(&vector) {
                documents.push(vector);
            }
        }
        self.entries.push(IndexEntry {
            target: target.to_string(),
            documents,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SimilarityIndex for TokenVectorIndex {
    fn nearest(
        &self,
        query: &str,
        k: usize,
        excluded: &BTreeSet<String>,
    ) -> Result<Vec<(String, f64)>, IndexError> {
        let query = embed(query);
        if query.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let mut scored: Vec<(String, f64)> = self
            .entries
            .iter()
            .filter(|entry| !excluded.contains(&entry.target))
            .filter_map(|entry| {
                let score = entry
                    .documents
                    .iter()
                    .map(|doc| cosine(&query, doc))
                    .fold(0.0, f64::max);
                (score > 0.0).then(|| (entry.target.clone(), score.min(1.0)))
            })
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(k);
        Ok(scored)
    }
}

/// L2-normalized token-count vector of a phrase.
fn embed(phrase: &str) -> SparseVector {
    let mut vector = SparseVector::new();
    for token in tokenize(&normalize_name(phrase)) {
        *vector.entry(token).or_insert(0.0) += 1.0;
    }
    let norm = vector.values().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for value in vector.values_mut() {
            *value /= norm;
        }
    }
    vector
}

/// Dot product of two unit vectors.
fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(token, x)| large.get(token).map(|y| x * y))
        .sum()
}

#[cfg(test)]
mod tests {
    use hcm_model::{FieldType, TargetFieldSpec};

    use super::*;

    fn schema() -> EntitySchema {
        EntitySchema::new(
            "candidate",
            vec![
                TargetFieldSpec::new("EMAIL", FieldType::Email),
                TargetFieldSpec::new("FIRST_NAME", FieldType::String),
                TargetFieldSpec::new("LAST_NAME", FieldType::String),
                TargetFieldSpec::new("PHONE", FieldType::String)
                    .with_display_name("Phone Number"),
            ],
        )
    }

    #[test]
    fn plural_query_matches_singular_target() {
        let index = TokenVectorIndex::from_schema(&schema());
        let hits = index.nearest("WORK EMAILS", 3, &BTreeSet::new()).unwrap();
        assert_eq!(hits[0].0, "EMAIL");
        assert!((hits[0].1 - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn ties_order_by_name_and_respect_k() {
        let index = TokenVectorIndex::from_schema(&schema());
        let hits = index.nearest("NAME", 1, &BTreeSet::new()).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "FIRST_NAME");
    }

    #[test]
    fn excluded_targets_are_skipped() {
        let index = TokenVectorIndex::from_schema(&schema());
        let excluded = BTreeSet::from(["FIRST_NAME".to_string()]);
        let hits = index.nearest("NAME", 3, &excluded).unwrap();
        let names: Vec<&str> = hits.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["LAST_NAME"]);
    }

    #[test]
    fn display_name_document_is_searchable() {
        let index = TokenVectorIndex::from_schema(&schema());
        let hits = index.nearest("phone number", 3, &BTreeSet::new()).unwrap();
        assert_eq!(hits[0].0, "PHONE");
        assert!((hits[0].1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unrelated_query_returns_nothing() {
        let index = TokenVectorIndex::from_schema(&schema());
        assert!(index.nearest("BADGE NUM", 3, &BTreeSet::new()).unwrap().is_empty());
    }
}
