//! Matching stages tried in fixed priority order for each source field.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use hcm_model::{AliasDictionary, Alternative, EntitySchema, MappingMethod, TargetFieldSpec};

use crate::error::IndexError;
use crate::fuzzy;
use crate::index::SimilarityIndex;
use crate::normalize::normalize_name;

/// Confidence for a source that equals the target name after normalization.
pub const EXACT_NAME_CONFIDENCE: f64 = 1.0;
/// Confidence for a source found in the target's alias list or display name.
pub const ALIAS_CONFIDENCE: f64 = 0.95;

/// One stage of the mapping pipeline.
///
/// `attempt` receives the normalized source name and the targets not yet
/// claimed in this call, and returns scored candidates drawn only from those
/// targets. An `Err` marks the stage as unavailable for the rest of the call.
pub trait MatchStrategy {
    fn method(&self) -> MappingMethod;

    fn attempt(
        &self,
        source: &str,
        unused: &[&TargetFieldSpec],
    ) -> Result<Vec<Alternative>, IndexError>;
}

/// Exact match against normalized target names, display names and aliases.
pub struct AliasStage {
    /// Normalized key to (target, confidence).
    lookup: BTreeMap<String, Vec<(String, f64)>>,
}

impl AliasStage {
    pub fn new(schema: &EntitySchema, aliases: &AliasDictionary) -> Self {
        let mut lookup: BTreeMap<String, Vec<(String, f64)>> = BTreeMap::new();
        let mut add = |key: &str, target: &str, confidence: f64| {
            let key = normalize_name(key);
            if key.is_empty() {
                return;
            }
            let entries = lookup.entry(key).or_default();
            match entries.iter_mut().find(|(t, _)| t == target) {
                Some(entry) => entry.1 = entry.1.max(confidence),
                None => entries.push((target.to_string(), confidence)),
            }
        };
        for field in &schema.fields {
            add(&field.name, &field.name, EXACT_NAME_CONFIDENCE);
            add(&field.display_name, &field.name, ALIAS_CONFIDENCE);
            for alias in aliases.aliases_for(&field.name) {
                add(alias, &field.name, ALIAS_CONFIDENCE);
            }
        }
        Self { lookup }
    }
}

impl MatchStrategy for AliasStage {
    fn method(&self) -> MappingMethod {
        MappingMethod::Alias
    }

    fn attempt(
        &self,
        source: &str,
        unused: &[&TargetFieldSpec],
    ) -> Result<Vec<Alternative>, IndexError> {
        let Some(entries) = self.lookup.get(source) else {
            return Ok(Vec::new());
        };
        Ok(entries
            .iter()
            .filter(|(target, _)| unused.iter().any(|f| &f.name == target))
            .map(|(target, confidence)| Alternative {
                target: target.clone(),
                confidence: *confidence,
                method: MappingMethod::Alias,
            })
            .collect())
    }
}

/// Nearest-neighbour lookup through a [`SimilarityIndex`] collaborator.
pub struct SemanticStage<'a> {
    index: &'a dyn SimilarityIndex,
    top_k: usize,
    targets: Vec<String>,
}

impl<'a> SemanticStage<'a> {
    pub fn new(index: &'a dyn SimilarityIndex, schema: &EntitySchema, top_k: usize) -> Self {
        Self {
            index,
            top_k,
            targets: schema.fields.iter().map(|f| f.name.clone()).collect(),
        }
    }
}

impl MatchStrategy for SemanticStage<'_> {
    fn method(&self) -> MappingMethod {
        MappingMethod::Semantic
    }

    fn attempt(
        &self,
        source: &str,
        unused: &[&TargetFieldSpec],
    ) -> Result<Vec<Alternative>, IndexError> {
        let excluded: BTreeSet<String> = self
            .targets
            .iter()
            .filter(|name| !unused.iter().any(|f| &f.name == *name))
            .cloned()
            .collect();
        let hits = self.index.nearest(source, self.top_k, &excluded)?;
        Ok(hits
            .into_iter()
            .filter(|(name, score)| score.is_finite() && unused.iter().any(|f| &f.name == name))
            .take(self.top_k)
            .map(|(target, score)| Alternative {
                target,
                confidence: score.clamp(0.0, 1.0),
                method: MappingMethod::Semantic,
            })
            .collect())
    }
}

/// Lexical similarity against every unused target name.
///
/// Every unused target is scored, zero included; acceptance is left to
/// [`select`].
pub struct FuzzyStage;

impl MatchStrategy for FuzzyStage {
    fn method(&self) -> MappingMethod {
        MappingMethod::Fuzzy
    }

    fn attempt(
        &self,
        source: &str,
        unused: &[&TargetFieldSpec],
    ) -> Result<Vec<Alternative>, IndexError> {
        Ok(unused
            .iter()
            .map(|field| Alternative {
                target: field.name.clone(),
                confidence: fuzzy::ratio(source, &normalize_name(&field.name)),
                method: MappingMethod::Fuzzy,
            })
            .collect())
    }
}

/// Pick the winning candidate if it reaches `min_confidence`.
///
/// Candidates within `epsilon` of each other are ordered by method priority,
/// then target name ascending. The remaining candidates, best first, are
/// returned as alternatives, at most `max_alternatives` of them.
pub fn select(
    candidates: Vec<Alternative>,
    min_confidence: f64,
    epsilon: f64,
    max_alternatives: usize,
) -> Option<(Alternative, Vec<Alternative>)> {
    let mut candidates: Vec<Alternative> = candidates
        .into_iter()
        .filter(|c| c.confidence.is_finite())
        .map(|mut c| {
            c.confidence = c.confidence.clamp(0.0, 1.0);
            c
        })
        .collect();

    let mut best_idx = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        let Some(current) = best_idx.map(|i: usize| &candidates[i]) else {
            best_idx = Some(idx);
            continue;
        };
        if beats(candidate, current, epsilon) {
            best_idx = Some(idx);
        }
    }

    let best = candidates.swap_remove(best_idx?);
    if best.confidence < min_confidence {
        return None;
    }
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.method.cmp(&b.method))
            .then_with(|| a.target.cmp(&b.target))
    });
    candidates.truncate(max_alternatives);
    Some((best, candidates))
}

fn beats(candidate: &Alternative, current: &Alternative, epsilon: f64) -> bool {
    if (candidate.confidence - current.confidence).abs() <= epsilon {
        (candidate.method, &candidate.target) < (current.method, &current.target)
    } else {
        candidate.confidence > current.confidence
    }
}
