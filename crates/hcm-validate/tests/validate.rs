use hcm_map::{FieldMapper, TokenVectorIndex, transform_rows};
use hcm_model::{AliasDictionary, EntitySchema, FieldType, MappingResult, Row, TargetFieldSpec};
use hcm_validate::{
    IssueKind, KeyValues, Severity, ValidationOptions, ValidationReport, Validator,
    check_row_integrity, validate_rows,
};

fn candidate_schema() -> EntitySchema {
    EntitySchema::new(
        "candidate",
        vec![
            TargetFieldSpec::new("CANDIDATE_ID", FieldType::String).required(),
            TargetFieldSpec::new("EMAIL", FieldType::Email),
            TargetFieldSpec::new("APPLICATION_DATE", FieldType::Date),
            TargetFieldSpec::new("YEARS_EXPERIENCE", FieldType::Number),
            TargetFieldSpec::new("WILLING_TO_RELOCATE", FieldType::Boolean),
            TargetFieldSpec::new("COUNTRY", FieldType::String)
                .with_max_length(2)
                .with_pattern("^[A-Z]{2}$"),
            TargetFieldSpec::new("SKILLS", FieldType::String).multi_value(None),
        ],
    )
    .with_identifier("CANDIDATE_ID", true)
}

/// Maps every schema field onto an identically named source column.
fn identity_mapping(schema: &EntitySchema) -> MappingResult {
    let aliases = AliasDictionary::new();
    let sources: Vec<String> = schema.fields.iter().map(|f| f.name.clone()).collect();
    FieldMapper::new(&aliases)
        .map(&sources, schema, 0.7)
        .expect("identity mapping")
}

fn row(cells: &[(&str, &str)]) -> Row {
    cells.iter().map(|(k, v)| (*k, Some(*v))).collect()
}

fn kinds(report: &ValidationReport) -> Vec<(&str, Option<usize>, &IssueKind)> {
    report
        .issues
        .iter()
        .map(|i| (i.field.as_str(), i.row, &i.kind))
        .collect()
}

#[test]
fn clean_rows_are_valid() {
    let schema = candidate_schema();
    let mapping = identity_mapping(&schema);
    let rows = vec![row(&[
        ("CANDIDATE_ID", "C1"),
        ("EMAIL", "ada@example.com"),
        ("APPLICATION_DATE", "15/03/2024"),
        ("YEARS_EXPERIENCE", "4.5"),
        ("WILLING_TO_RELOCATE", "Yes"),
        ("COUNTRY", "GB"),
        ("SKILLS", "Rust||SQL"),
    ])];

    let report = validate_rows(&rows, &schema, &mapping);
    assert!(report.is_valid);
    assert!(report.is_empty());
    assert_eq!(report.summary.rows_checked, 1);
    assert_eq!(report.summary.required_mapped, 1);
    assert_eq!(report.summary.optional_mapped, 6);
}

#[test]
fn format_checks_flag_each_bad_value() {
    let schema = candidate_schema();
    let mapping = identity_mapping(&schema);
    let rows = vec![
        row(&[("CANDIDATE_ID", "C1"), ("EMAIL", "ada@example.com")]),
        row(&[
            ("CANDIDATE_ID", "C2"),
            ("EMAIL", "ada@@example.com"),
            ("APPLICATION_DATE", "2024-02-30"),
            ("YEARS_EXPERIENCE", "1,200"),
            ("WILLING_TO_RELOCATE", "maybe"),
            ("COUNTRY", "gbr"),
            ("SKILLS", "Rust||"),
        ]),
        row(&[("CANDIDATE_ID", "C3"), ("SKILLS", "Rust, SQL")]),
    ];

    let report = validate_rows(&rows, &schema, &mapping);
    assert!(!report.is_valid);
    assert_eq!(
        kinds(&report),
        vec![
            ("EMAIL", Some(2), &IssueKind::InvalidEmail),
            ("APPLICATION_DATE", Some(2), &IssueKind::InvalidDate),
            ("YEARS_EXPERIENCE", Some(2), &IssueKind::InvalidNumber),
            ("WILLING_TO_RELOCATE", Some(2), &IssueKind::InvalidBoolean),
            ("COUNTRY", Some(2), &IssueKind::TooLong {
                length: 3,
                max_length: 2
            }),
            ("COUNTRY", Some(2), &IssueKind::PatternMismatch {
                pattern: "^[A-Z]{2}$".to_string()
            }),
            ("SKILLS", Some(2), &IssueKind::EmptySubValue {
                separator: "||".to_string()
            }),
            ("SKILLS", Some(3), &IssueKind::AlternateSeparator {
                separator: "||".to_string(),
                found: ",".to_string()
            }),
        ]
    );
    assert_eq!(report.error_count(), 7);
    assert_eq!(report.warning_count(), 1);
    assert_eq!(
        report.issues_for("EMAIL").next().and_then(|i| i.value.as_deref()),
        Some("ada@@example.com")
    );
    insta::assert_snapshot!(
        report.issues_for("COUNTRY").map(|i| i.message.as_str()).collect::<Vec<_>>().join("\n"),
        @r"
    COUNTRY is 3 characters long; maximum is 2
    COUNTRY does not match pattern ^[A-Z]{2}$
    "
    );
}

#[test]
fn alternate_separator_warning_can_be_disabled() {
    let schema = candidate_schema();
    let mapping = identity_mapping(&schema);
    let rows = vec![row(&[("CANDIDATE_ID", "C1"), ("SKILLS", "Rust; SQL")])];
    let options = ValidationOptions {
        warn_alternate_separator: false,
        ..ValidationOptions::default()
    };

    assert_eq!(validate_rows(&rows, &schema, &mapping).warning_count(), 1);
    assert!(Validator::new(options).validate_rows(&rows, &schema, &mapping).is_empty());
}

#[test]
fn required_field_gate() {
    let schema = EntitySchema::new(
        "candidate",
        vec![
            TargetFieldSpec::new("CANDIDATE_ID", FieldType::String).required(),
            TargetFieldSpec::new("FIRST_NAME", FieldType::String).required(),
            TargetFieldSpec::new("LAST_NAME", FieldType::String).required(),
        ],
    );
    let aliases = AliasDictionary::new();
    let mapping = FieldMapper::new(&aliases)
        .map(&["CANDIDATE_ID".to_string(), "FIRST_NAME".to_string()], &schema, 0.7)
        .expect("map");
    let rows = vec![
        row(&[("CANDIDATE_ID", "C1"), ("FIRST_NAME", "Ada"), ("LAST_NAME", "Lovelace")]),
        row(&[("CANDIDATE_ID", "C2"), ("FIRST_NAME", "  ")]),
    ];

    let report = validate_rows(&rows, &schema, &mapping);
    assert!(!report.is_valid);
    assert_eq!(report.summary.required_mapped, 2);
    assert_eq!(report.summary.required_total, 3);
    assert_eq!(
        kinds(&report),
        vec![
            ("FIRST_NAME", Some(2), &IssueKind::RequiredEmpty),
            ("LAST_NAME", None, &IssueKind::RequiredUnmapped),
        ]
    );
    insta::assert_json_snapshot!(report.issues[1], @r#"
    {
      "field": "LAST_NAME",
      "severity": "error",
      "message": "Required field LAST_NAME is not mapped to any source field",
      "row": null,
      "value": null,
      "kind": "required_unmapped"
    }
    "#);
}

#[test]
fn duplicate_identifiers_list_all_rows() {
    let schema = candidate_schema();
    let mapping = identity_mapping(&schema);
    let rows: Vec<Row> = ["C1", "C2", "C1", "C1", "C2", "C3"]
        .iter()
        .map(|id| row(&[("CANDIDATE_ID", id)]))
        .collect();

    let report = validate_rows(&rows, &schema, &mapping);
    assert_eq!(
        kinds(&report),
        vec![
            ("CANDIDATE_ID", Some(1), &IssueKind::DuplicateIdentifier {
                rows: vec![1, 3, 4],
                unique: true
            }),
            ("CANDIDATE_ID", Some(2), &IssueKind::DuplicateIdentifier {
                rows: vec![2, 5],
                unique: true
            }),
        ]
    );
    assert!(!report.is_valid);

    let lenient = candidate_schema().with_identifier("CANDIDATE_ID", false);
    let report = validate_rows(&rows, &lenient, &mapping);
    assert!(report.is_valid);
    assert_eq!(report.warning_count(), 2);
    assert_eq!(report.issues[0].message, "CANDIDATE_ID value is repeated in rows 1, 3, 4");
}

#[test]
fn errors_are_capped_per_field_but_counted() {
    let schema = candidate_schema();
    let mapping = identity_mapping(&schema);
    let rows: Vec<Row> = (0..105)
        .map(|i| {
            let id = format!("C{i}");
            row(&[("CANDIDATE_ID", id.as_str()), ("EMAIL", "not-an-email")])
        })
        .collect();

    let report = validate_rows(&rows, &schema, &mapping);
    assert!(!report.is_valid);
    assert_eq!(report.errors().count(), 100);
    assert_eq!(report.error_count(), 105);
    assert_eq!(report.summary.suppressed_errors, 5);
    let info: Vec<&str> = report.infos().map(|i| i.message.as_str()).collect();
    assert_eq!(info, vec!["5 further EMAIL errors not listed"]);
    assert_eq!(report.issues.last().map(|i| i.severity), Some(Severity::Info));
}

#[test]
fn one_validator_serves_concurrent_calls() {
    let schema = candidate_schema();
    let mapping = identity_mapping(&schema);
    let rows = vec![
        row(&[("CANDIDATE_ID", "C1"), ("EMAIL", "ada@example.com")]),
        row(&[("CANDIDATE_ID", "C1"), ("EMAIL", "not-an-email")]),
        row(&[("CANDIDATE_ID", "C3"), ("COUNTRY", "gbr")]),
    ];
    let validator = Validator::new(ValidationOptions::default());
    let expected = validator.validate_rows(&rows, &schema, &mapping);
    assert!(!expected.is_valid);

    let reports: Vec<ValidationReport> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| validator.validate_rows(&rows, &schema, &mapping)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("validator thread"))
            .collect()
    });

    assert!(reports.iter().all(|report| *report == expected));
}

#[test]
fn end_to_end_scenario_is_not_exportable() {
    let schema = EntitySchema::new(
        "candidate",
        vec![
            TargetFieldSpec::new("CANDIDATE_ID", FieldType::String).required(),
            TargetFieldSpec::new("FIRST_NAME", FieldType::String).required(),
            TargetFieldSpec::new("LAST_NAME", FieldType::String).required(),
            TargetFieldSpec::new("EMAIL", FieldType::Email),
        ],
    );
    let aliases = AliasDictionary::new().with_aliases("CANDIDATE_ID", ["PERSON ID"]);
    let index = TokenVectorIndex::from_schema(&schema);
    let sources: Vec<String> = ["PERSON ID", "WORK EMAILS", "FULL NAME", "BADGE_NUM"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    let mapping = FieldMapper::new(&aliases)
        .with_index(&index)
        .map(&sources, &schema, 0.70)
        .expect("map");

    let source_rows = vec![
        row(&[
            ("PERSON ID", "P-1"),
            ("WORK EMAILS", "ada@example.com"),
            ("FULL NAME", "Ada Lovelace"),
            ("BADGE_NUM", "17"),
        ]),
        row(&[
            ("PERSON ID", "P-2"),
            ("WORK EMAILS", "grace@example.com"),
            ("FULL NAME", "Grace Hopper"),
            ("BADGE_NUM", "18"),
        ]),
    ];
    let transformed = transform_rows(&source_rows, &mapping);
    assert_eq!(transformed.len(), source_rows.len());
    assert_eq!(transformed[0].get("EMAIL"), Some("ada@example.com"));

    let report = validate_rows(&transformed, &schema, &mapping);
    assert!(!report.is_valid);
    let unmapped: Vec<&str> = report
        .errors()
        .filter(|i| i.kind == IssueKind::RequiredUnmapped)
        .map(|i| i.field.as_str())
        .collect();
    assert_eq!(unmapped, vec!["FIRST_NAME", "LAST_NAME"]);

    let ids = KeyValues::from_rows("PERSON ID", &source_rows);
    assert_eq!(ids.values, vec![Some("P-1".to_string()), Some("P-2".to_string())]);
    assert_eq!(
        check_row_integrity(source_rows.len(), transformed.len(), false, &[ids], &[]),
        Ok(())
    );
}
