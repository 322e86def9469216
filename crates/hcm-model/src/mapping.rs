//! Mapping results: resolved source-to-target correspondences.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// How a mapping was produced.
///
/// Variant order is the tie-break priority between automatic methods:
/// alias beats semantic beats fuzzy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingMethod {
    Alias,
    Semantic,
    Fuzzy,
    Manual,
}

impl MappingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alias => "alias",
            Self::Semantic => "semantic",
            Self::Fuzzy => "fuzzy",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for MappingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A runner-up target considered for a source field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub target: String,
    pub confidence: f64,
    pub method: MappingMethod,
}

/// One resolved source-to-target correspondence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    /// Source column name exactly as supplied.
    pub source: String,
    pub target: String,
    /// Always within [0, 1].
    pub confidence: f64,
    pub method: MappingMethod,
    /// Other candidates, highest confidence first.
    pub alternatives: Vec<Alternative>,
}

impl Mapping {
    /// A user-asserted mapping: confidence 1.0, no alternatives.
    pub fn manual(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            confidence: 1.0,
            method: MappingMethod::Manual,
            alternatives: Vec::new(),
        }
    }
}

/// Confidence level categories for mapping quality assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    /// Uncertain; needs manual verification.
    Low,
    /// Reasonable; should be reviewed.
    Medium,
    /// Near-certain.
    High,
}

impl ConfidenceLevel {
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "high confidence - likely correct",
            Self::Medium => "medium confidence - should review",
            Self::Low => "low confidence - needs verification",
        }
    }
}

/// Boundaries between confidence levels.
///
/// - Below `low`: not categorized
/// - `low` to `medium`: [`ConfidenceLevel::Low`]
/// - `medium` to `high`: [`ConfidenceLevel::Medium`]
/// - At or above `high`: [`ConfidenceLevel::High`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.90,
            medium: 0.80,
            low: 0.70,
        }
    }
}

impl ConfidenceThresholds {
    /// Returns `None` if the score is below the low threshold.
    #[must_use]
    pub fn categorize(&self, confidence: f64) -> Option<ConfidenceLevel> {
        if confidence >= self.high {
            Some(ConfidenceLevel::High)
        } else if confidence >= self.medium {
            Some(ConfidenceLevel::Medium)
        } else if confidence >= self.low {
            Some(ConfidenceLevel::Low)
        } else {
            None
        }
    }
}

/// Bucketed counts of mapping confidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// A schema target as seen by a mapping result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSlot {
    pub name: String,
    pub required: bool,
}

/// Outcome of mapping one source field list against one schema.
///
/// Owned by the caller; carries copies of the source and target name lists so
/// that manual edits can keep the unmapped lists consistent without the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingResult {
    pub entity: String,
    /// Source field names in input order.
    pub source_fields: Vec<String>,
    /// Schema targets in declaration order.
    pub targets: Vec<TargetSlot>,
    /// Mappings in source input order.
    pub mappings: Vec<Mapping>,
    pub unmapped_source: Vec<String>,
    pub unmapped_target: Vec<String>,
    pub required_unmapped: Vec<String>,
    pub min_confidence: f64,
    /// Set when the similarity index was absent, timed out or failed.
    pub semantic_stage_skipped: bool,
}

impl MappingResult {
    /// Empty result with every source and target unmapped.
    pub fn new(
        entity: impl Into<String>,
        source_fields: Vec<String>,
        targets: Vec<TargetSlot>,
        min_confidence: f64,
    ) -> Self {
        let mut result = Self {
            entity: entity.into(),
            source_fields,
            targets,
            mappings: Vec::new(),
            unmapped_source: Vec::new(),
            unmapped_target: Vec::new(),
            required_unmapped: Vec::new(),
            min_confidence,
            semantic_stage_skipped: false,
        };
        result.refresh_unmapped();
        result
    }

    pub fn mapped_count(&self) -> usize {
        self.mappings.len()
    }

    pub fn total_count(&self) -> usize {
        self.source_fields.len()
    }

    pub fn mapping_for_source(&self, source: &str) -> Option<&Mapping> {
        self.mappings.iter().find(|m| m.source == source)
    }

    pub fn mapping_for_target(&self, target: &str) -> Option<&Mapping> {
        self.mappings.iter().find(|m| m.target == target)
    }

    pub fn mapped_targets(&self) -> BTreeSet<&str> {
        self.mappings.iter().map(|m| m.target.as_str()).collect()
    }

    pub fn is_target_mapped(&self, target: &str) -> bool {
        self.mapping_for_target(target).is_some()
    }

    pub fn has_source(&self, source: &str) -> bool {
        self.source_fields.iter().any(|s| s == source)
    }

    pub fn has_target(&self, target: &str) -> bool {
        self.targets.iter().any(|t| t.name == target)
    }

    /// True when every required target has a mapping.
    pub fn is_complete(&self) -> bool {
        self.required_unmapped.is_empty()
    }

    /// Re-derive the unmapped lists and restore source order of `mappings`.
    pub fn refresh_unmapped(&mut self) {
        let position: BTreeMap<&str, usize> = self
            .source_fields
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect();
        self.mappings.sort_by_key(|m| {
            position
                .get(m.source.as_str())
                .copied()
                .unwrap_or(usize::MAX)
        });

        let mapped_sources: BTreeSet<&str> =
            self.mappings.iter().map(|m| m.source.as_str()).collect();
        let mapped_targets: BTreeSet<&str> =
            self.mappings.iter().map(|m| m.target.as_str()).collect();

        self.unmapped_source = self
            .source_fields
            .iter()
            .filter(|s| !mapped_sources.contains(s.as_str()))
            .cloned()
            .collect();
        self.unmapped_target = self
            .targets
            .iter()
            .filter(|t| !mapped_targets.contains(t.name.as_str()))
            .map(|t| t.name.clone())
            .collect();
        self.required_unmapped = self
            .targets
            .iter()
            .filter(|t| t.required && !mapped_targets.contains(t.name.as_str()))
            .map(|t| t.name.clone())
            .collect();
    }

    /// Confidence buckets using the default thresholds.
    #[must_use]
    pub fn confidence_distribution(&self) -> ConfidenceDistribution {
        let counts = self.count_by_level();
        ConfidenceDistribution {
            high: counts.get(&ConfidenceLevel::High).copied().unwrap_or(0),
            medium: counts.get(&ConfidenceLevel::Medium).copied().unwrap_or(0),
            low: counts.get(&ConfidenceLevel::Low).copied().unwrap_or(0),
        }
    }

    /// Count of mappings at each confidence level, default thresholds.
    #[must_use]
    pub fn count_by_level(&self) -> BTreeMap<ConfidenceLevel, usize> {
        self.count_by_level_with(&ConfidenceThresholds::default())
    }

    #[must_use]
    pub fn count_by_level_with(
        &self,
        thresholds: &ConfidenceThresholds,
    ) -> BTreeMap<ConfidenceLevel, usize> {
        let mut counts = BTreeMap::new();
        for mapping in &self.mappings {
            if let Some(level) = thresholds.categorize(mapping.confidence) {
                *counts.entry(level).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Confidence of the weakest accepted mapping.
    #[must_use]
    pub fn lowest_confidence(&self) -> Option<f64> {
        self.mappings
            .iter()
            .map(|m| m.confidence)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    #[must_use]
    pub fn mean_confidence(&self) -> Option<f64> {
        if self.mappings.is_empty() {
            return None;
        }
        let sum: f64 = self.mappings.iter().map(|m| m.confidence).sum();
        Some(sum / self.mappings.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots() -> Vec<TargetSlot> {
        vec![
            TargetSlot {
                name: "CANDIDATE_ID".to_string(),
                required: true,
            },
            TargetSlot {
                name: "EMAIL".to_string(),
                required: false,
            },
        ]
    }

    fn mapping(source: &str, target: &str, confidence: f64) -> Mapping {
        Mapping {
            source: source.to_string(),
            target: target.to_string(),
            confidence,
            method: MappingMethod::Fuzzy,
            alternatives: Vec::new(),
        }
    }

    #[test]
    fn new_result_is_fully_unmapped() {
        let result = MappingResult::new("candidate", vec!["A".into(), "B".into()], slots(), 0.7);
        assert_eq!(result.unmapped_source, vec!["A", "B"]);
        assert_eq!(result.unmapped_target, vec!["CANDIDATE_ID", "EMAIL"]);
        assert_eq!(result.required_unmapped, vec!["CANDIDATE_ID"]);
        assert!(!result.is_complete());
    }

    #[test]
    fn refresh_restores_source_order() {
        let mut result = MappingResult::new("candidate", vec!["A".into(), "B".into()], slots(), 0.7);
        result.mappings.push(mapping("B", "EMAIL", 0.75));
        result.mappings.push(mapping("A", "CANDIDATE_ID", 0.95));
        result.refresh_unmapped();

        assert_eq!(result.mappings[0].source, "A");
        assert!(result.unmapped_source.is_empty());
        assert!(result.is_complete());
    }

    #[test]
    fn distribution_buckets_by_default_thresholds() {
        let mut result = MappingResult::new(
            "candidate",
            vec!["A".into(), "B".into(), "C".into()],
            slots(),
            0.5,
        );
        result.mappings = vec![
            mapping("A", "X", 0.90),
            mapping("B", "Y", 0.85),
            mapping("C", "Z", 0.6),
        ];
        let dist = result.confidence_distribution();
        assert_eq!(
            dist,
            ConfidenceDistribution {
                high: 1,
                medium: 1,
                low: 0
            }
        );
        assert_eq!(result.lowest_confidence(), Some(0.6));
        assert!((result.mean_confidence().unwrap() - 0.7833333).abs() < 1e-6);
    }

    #[test]
    fn empty_result_has_no_confidence_figures() {
        let result = MappingResult::new("candidate", vec!["A".into()], slots(), 0.7);
        assert_eq!(result.lowest_confidence(), None);
        assert_eq!(result.mean_confidence(), None);
    }

    #[test]
    fn method_priority_orders_alias_first() {
        assert!(MappingMethod::Alias < MappingMethod::Semantic);
        assert!(MappingMethod::Semantic < MappingMethod::Fuzzy);
    }
}
