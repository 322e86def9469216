use std::collections::BTreeSet;

use hcm_map::{FieldMapper, TokenVectorIndex};
use hcm_standards::SchemaRegistry;
use proptest::prelude::*;

const KNOWN_HEADERS: &[&str] = &[
    "PERSON ID",
    "Applicant ID",
    "candidate_id",
    "First Name",
    "fname",
    "Given Name",
    "Surname",
    "LAST NAME",
    "Work Email",
    "E-mail",
    "email address",
    "Phone",
    "Mobile",
    "Applied On",
    "City",
    "Country Code",
    "Years Experience",
    "Relocation",
    "Skills",
    "FULL NAME",
    "BADGE_NUM",
];

fn arb_sources() -> impl Strategy<Value = Vec<String>> {
    (
        prop::sample::subsequence(KNOWN_HEADERS.to_vec(), 0..=KNOWN_HEADERS.len()),
        prop::collection::vec("[A-Za-z_ -]{1,14}", 0..6),
    )
        .prop_map(|(known, random)| {
            let mut seen = BTreeSet::new();
            known
                .into_iter()
                .map(str::to_string)
                .chain(random)
                .filter(|name| seen.insert(name.clone()))
                .collect::<Vec<_>>()
        })
        .prop_filter("at least one source", |sources| !sources.is_empty())
        .prop_shuffle()
}

proptest! {
    #[test]
    fn assignment_is_one_to_one_and_covers_sources(
        sources in arb_sources(),
        min_confidence in 0.0f64..=1.0,
    ) {
        let registry = SchemaRegistry::embedded().expect("catalog");
        let schema = registry.load_schema("candidate").expect("schema");
        let aliases = registry.aliases("candidate").expect("aliases");
        let index = TokenVectorIndex::from_schema(schema);
        let mapper = FieldMapper::new(aliases).with_index(&index);

        let result = mapper.map(&sources, schema, min_confidence).expect("map");

        let targets: BTreeSet<&str> = result.mappings.iter().map(|m| m.target.as_str()).collect();
        let mapped_sources: BTreeSet<&str> = result.mappings.iter().map(|m| m.source.as_str()).collect();
        prop_assert_eq!(targets.len(), result.mappings.len());
        prop_assert_eq!(mapped_sources.len(), result.mappings.len());
        prop_assert_eq!(result.mapped_count() + result.unmapped_source.len(), sources.len());
        prop_assert!(result.unmapped_source.iter().all(|s| !mapped_sources.contains(s.as_str())));
        prop_assert!(result.unmapped_target.iter().all(|t| !targets.contains(t.as_str())));

        for mapping in &result.mappings {
            prop_assert!((0.0..=1.0).contains(&mapping.confidence));
            prop_assert!(mapping.confidence >= min_confidence);
            prop_assert!(mapping.alternatives.iter().all(|a| a.target != mapping.target));
        }

        let again = mapper.map(&sources, schema, min_confidence).expect("map");
        prop_assert_eq!(result, again);
    }
}
