//! Field mapper: greedy, staged assignment of source fields to schema targets.

use std::collections::BTreeSet;

use hcm_model::{
    AliasDictionary, EntitySchema, Mapping, MappingMethod, MappingResult, TargetFieldSpec,
    TargetSlot,
};

use crate::config::{MapperConfig, check_threshold};
use crate::error::{MapError, Result};
use crate::index::SimilarityIndex;
use crate::normalize::normalize_name;
use crate::strategy::{AliasStage, FuzzyStage, MatchStrategy, SemanticStage, select};

/// Maps source field names onto an [`EntitySchema`].
///
/// Holds only shared, read-only state; each call to [`FieldMapper::map`]
/// allocates its own working set, so one mapper can serve concurrent calls.
///
/// # Example
///
/// ```ignore
/// use hcm_map::{FieldMapper, TokenVectorIndex};
///
/// let index = TokenVectorIndex::from_schema(&schema);
/// let mapper = FieldMapper::new(&aliases).with_index(&index);
/// let result = mapper.map(&["PERSON ID".to_string()], &schema, 0.7)?;
/// ```
#[derive(Clone, Copy)]
pub struct FieldMapper<'a> {
    aliases: &'a AliasDictionary,
    index: Option<&'a dyn SimilarityIndex>,
    config: MapperConfig,
}

impl<'a> FieldMapper<'a> {
    /// A mapper without a similarity index; the semantic stage is skipped.
    pub fn new(aliases: &'a AliasDictionary) -> Self {
        Self {
            aliases,
            index: None,
            config: MapperConfig::default(),
        }
    }

    #[must_use]
    pub fn with_index(mut self, index: &'a dyn SimilarityIndex) -> Self {
        self.index = Some(index);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: MapperConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Map with the configured `min_confidence`.
    pub fn map_default(&self, source_fields: &[String], schema: &EntitySchema) -> Result<MappingResult> {
        self.map(source_fields, schema, self.config.min_confidence)
    }

    /// Map `source_fields`, in input order, onto `schema`.
    ///
    /// Each source is tried against the alias, semantic and fuzzy stages in
    /// that order and claims the best unused target of the first stage that
    /// reaches `min_confidence`. Claims are never revisited.
    pub fn map(
        &self,
        source_fields: &[String],
        schema: &EntitySchema,
        min_confidence: f64,
    ) -> Result<MappingResult> {
        validate_input(source_fields, schema, min_confidence)?;
        self.config.check_tuning()?;

        let span = tracing::info_span!(
            "map",
            entity = %schema.name,
            sources = source_fields.len(),
            targets = schema.len()
        );
        let _guard = span.enter();

        let alias_stage = AliasStage::new(schema, self.aliases);
        let semantic_stage = self
            .index
            .map(|index| SemanticStage::new(index, schema, self.config.semantic_top_k));
        let fuzzy_stage = FuzzyStage;

        let mut stages: Vec<&dyn MatchStrategy> = vec![&alias_stage as &dyn MatchStrategy];
        if let Some(stage) = &semantic_stage {
            stages.push(stage);
        }
        stages.push(&fuzzy_stage);

        let mut semantic_skipped = semantic_stage.is_none();
        if semantic_skipped {
            tracing::warn!("no similarity index configured; semantic stage skipped");
        }

        let targets = schema
            .fields
            .iter()
            .map(|f| TargetSlot {
                name: f.name.clone(),
                required: f.required,
            })
            .collect();
        let mut result = MappingResult::new(
            schema.name.clone(),
            source_fields.to_vec(),
            targets,
            min_confidence,
        );
        let mut assigned_targets: BTreeSet<&str> = BTreeSet::new();

        for source in source_fields {
            let normalized = normalize_name(source);
            if normalized.is_empty() {
                tracing::debug!(source = %source, "source name is empty after normalization");
                continue;
            }
            let unused: Vec<&TargetFieldSpec> = schema
                .fields
                .iter()
                .filter(|f| !assigned_targets.contains(f.name.as_str()))
                .collect();
            if unused.is_empty() {
                tracing::debug!(source = %source, "all targets claimed");
                continue;
            }

            for stage in &stages {
                let method = stage.method();
                if method == MappingMethod::Semantic && semantic_skipped {
                    continue;
                }
                let candidates = match stage.attempt(&normalized, &unused) {
                    Ok(candidates) => candidates,
                    Err(err) if method != MappingMethod::Semantic => {
                        tracing::warn!(
                            error = %err,
                            source = %source,
                            method = %method,
                            "mapping stage failed"
                        );
                        continue;
                    }
                    Err(err) => {
                        tracing::warn!(
                            error = %err,
                            source = %source,
                            "similarity index failed; semantic stage skipped for this call"
                        );
                        semantic_skipped = true;
                        continue;
                    }
                };
                let Some((best, alternatives)) = select(
                    candidates,
                    min_confidence,
                    self.config.tie_epsilon,
                    self.config.semantic_top_k,
                ) else {
                    continue;
                };
                tracing::debug!(
                    source = %source,
                    target = %best.target,
                    confidence = best.confidence,
                    method = %method,
                    "claimed target"
                );
                if let Some(field) = schema.field(&best.target) {
                    assigned_targets.insert(field.name.as_str());
                }
                result.mappings.push(Mapping {
                    source: source.clone(),
                    target: best.target,
                    confidence: best.confidence,
                    method,
                    alternatives,
                });
                break;
            }
        }

        result.semantic_stage_skipped = semantic_skipped;
        result.refresh_unmapped();

        tracing::info!(
            mapped = result.mapped_count(),
            total = result.total_count(),
            required_unmapped = result.required_unmapped.len(),
            semantic_stage_skipped = semantic_skipped,
            "mapping complete"
        );
        Ok(result)
    }
}

fn validate_input(source_fields: &[String], schema: &EntitySchema, min_confidence: f64) -> Result<()> {
    if schema.is_empty() {
        return Err(MapError::InvalidSchema {
            entity: schema.name.clone(),
        });
    }
    if source_fields.is_empty() {
        return Err(MapError::EmptyInput);
    }
    check_threshold(min_confidence)?;
    let mut seen = BTreeSet::new();
    if let Some(name) = source_fields.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(MapError::DuplicateSourceField { name: name.clone() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use hcm_model::FieldType;

    use super::*;

    fn schema() -> EntitySchema {
        EntitySchema::new(
            "candidate",
            vec![
                TargetFieldSpec::new("FIRST_NAME", FieldType::String).required(),
                TargetFieldSpec::new("LAST_NAME", FieldType::String).required(),
                TargetFieldSpec::new("CITY", FieldType::String),
            ],
        )
    }

    fn sources(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn rejects_bad_input() {
        let aliases = AliasDictionary::new();
        let mapper = FieldMapper::new(&aliases);
        let empty_schema = EntitySchema::new("empty", Vec::new());

        assert_eq!(
            mapper.map(&sources(&["A"]), &empty_schema, 0.7),
            Err(MapError::InvalidSchema {
                entity: "empty".to_string()
            })
        );
        assert_eq!(mapper.map(&[], &schema(), 0.7), Err(MapError::EmptyInput));
        assert_eq!(
            mapper.map(&sources(&["A"]), &schema(), -0.1),
            Err(MapError::InvalidThreshold { value: -0.1 })
        );
        assert_eq!(
            mapper.map(&sources(&["A", "B", "A"]), &schema(), 0.7),
            Err(MapError::DuplicateSourceField {
                name: "A".to_string()
            })
        );
    }

    #[test]
    fn unusable_tuning_is_rejected_before_mapping() {
        let aliases = AliasDictionary::new();
        let mapper = FieldMapper::new(&aliases).with_config(MapperConfig {
            semantic_top_k: 0,
            ..MapperConfig::default()
        });
        assert!(matches!(
            mapper.map(&sources(&["CITY"]), &schema(), 0.7),
            Err(MapError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn exact_names_map_with_full_confidence() {
        let aliases = AliasDictionary::new();
        let result = FieldMapper::new(&aliases)
            .map(&sources(&["first name", "Last-Name"]), &schema(), 0.7)
            .unwrap();
        assert_eq!(result.mapped_count(), 2);
        assert!(result.mappings.iter().all(|m| m.method == MappingMethod::Alias));
        assert!(result.mappings.iter().all(|m| m.confidence == 1.0));
        assert_eq!(result.mappings[1].source, "Last-Name");
        assert_eq!(result.unmapped_target, vec!["CITY"]);
        assert!(result.is_complete());
    }

    #[test]
    fn first_source_keeps_its_claim() {
        let aliases = AliasDictionary::new().with_aliases("CITY", ["TOWN"]);
        let result = FieldMapper::new(&aliases)
            .map(&sources(&["TOWN", "CITY"]), &schema(), 0.7)
            .unwrap();
        assert_eq!(result.mapping_for_target("CITY").unwrap().source, "TOWN");
        assert_eq!(result.unmapped_source, vec!["CITY"]);
    }

    #[test]
    fn zero_threshold_accepts_zero_ratio() {
        let aliases = AliasDictionary::new();
        let schema = EntitySchema::new("contact", vec![TargetFieldSpec::new("EMAIL", FieldType::Email)]);
        let result = FieldMapper::new(&aliases)
            .map(&sources(&["ZZZ"]), &schema, 0.0)
            .unwrap();
        assert_eq!(result.mapped_count(), 1);
        assert_eq!(result.mappings[0].target, "EMAIL");
        assert_eq!(result.mappings[0].method, MappingMethod::Fuzzy);
        assert_eq!(result.mappings[0].confidence, 0.0);
        assert!(result.unmapped_source.is_empty());

        let strict = FieldMapper::new(&aliases)
            .map(&sources(&["ZZZ"]), &schema, 0.01)
            .unwrap();
        assert_eq!(strict.unmapped_source, vec!["ZZZ"]);
    }

    #[test]
    fn punctuation_only_source_stays_unmapped() {
        let aliases = AliasDictionary::new();
        let result = FieldMapper::new(&aliases)
            .map(&sources(&["???", "CITY"]), &schema(), 0.7)
            .unwrap();
        assert_eq!(result.unmapped_source, vec!["???"]);
        assert!(result.semantic_stage_skipped);
    }
}
