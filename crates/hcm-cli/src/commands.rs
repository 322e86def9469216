use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use hcm_cli::config::AppConfig;
use hcm_cli::input::{CsvTable, read_csv, write_csv};
use hcm_map::{FieldMapper, TokenVectorIndex, clear_mapping, set_manual_mapping, transform_rows};
use hcm_model::{EntitySchema, MappingResult, Row};
use hcm_standards::SchemaRegistry;
use hcm_validate::{KeyValues, Validator, check_row_integrity_with};

use crate::cli::{MapArgs, MappingArgs, SchemasArgs, ValidateArgs};
use crate::summary::{print_entities, print_fields};
use crate::types::ValidateOutcome;

/// Catalog from `--schema-dir`, then `HCM_SCHEMA_DIR`, then the embedded one.
pub fn load_registry(schema_dir: Option<&Path>) -> Result<SchemaRegistry> {
    let registry = match schema_dir {
        Some(dir) => SchemaRegistry::from_dir(dir)
            .with_context(|| format!("load schema catalog from {}", dir.display()))?,
        None => SchemaRegistry::from_env_or_embedded().context("load schema catalog")?,
    };
    info!(entities = registry.len(), "schema catalog loaded");
    Ok(registry)
}

pub fn run_schemas(registry: &SchemaRegistry, args: &SchemasArgs) -> Result<()> {
    match &args.entity {
        Some(entity) => {
            let schema = registry.load_schema(entity)?;
            let aliases = registry.aliases(entity)?;
            print_fields(schema, aliases);
        }
        None => print_entities(registry),
    }
    Ok(())
}

pub fn run_map(registry: &SchemaRegistry, config: &AppConfig, args: &MapArgs) -> Result<MappingResult> {
    let (_, schema, mapping) = map_input(registry, config, &args.mapping)?;
    if !mapping.is_complete() {
        warn!(
            entity = %schema.name,
            required_unmapped = mapping.required_unmapped.len(),
            "required targets left unmapped"
        );
    }
    Ok(mapping)
}

pub fn run_validate(
    registry: &SchemaRegistry,
    config: &AppConfig,
    args: &ValidateArgs,
) -> Result<ValidateOutcome> {
    let (table, schema, mapping) = map_input(registry, config, &args.mapping)?;
    let span = info_span!("export_check", entity = %schema.name);
    let _guard = span.enter();

    let transformed = transform_rows(&table.rows, &mapping);
    let (input_keys, output_keys) = identifier_keys(schema, &mapping, &table, &transformed);
    let data_loss = check_row_integrity_with(
        table.len(),
        transformed.len(),
        args.allow_dedup,
        &input_keys,
        &output_keys,
        &config.validation,
    )
    .err();

    let report = Validator::new(config.validation.clone()).validate_rows(&transformed, schema, &mapping);

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report).context("serialize validation report")?;
        fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
        info!(path = %path.display(), "wrote validation report");
    }

    let mut outcome = ValidateOutcome {
        mapping,
        report,
        data_loss,
        input_rows: table.len(),
        output_rows: transformed.len(),
        written: None,
    };

    if let Some(path) = &args.output {
        if outcome.is_exportable() {
            let headers: Vec<String> = schema
                .fields
                .iter()
                .filter(|f| outcome.mapping.is_target_mapped(&f.name))
                .map(|f| f.name.clone())
                .collect();
            write_csv(path, &headers, &transformed)?;
            outcome.written = Some(path.clone());
        } else {
            warn!(path = %path.display(), "export blocked; output not written");
        }
    }
    Ok(outcome)
}

/// Read the input and map its header, applying `--unset` then `--set`.
fn map_input<'r>(
    registry: &'r SchemaRegistry,
    config: &AppConfig,
    args: &MappingArgs,
) -> Result<(CsvTable, &'r EntitySchema, MappingResult)> {
    let schema = registry.load_schema(&args.entity)?;
    let aliases = registry.aliases(&args.entity)?;

    let mut mapper_config = config.mapping;
    if let Some(min_confidence) = args.min_confidence {
        mapper_config.min_confidence = min_confidence;
    }
    mapper_config.validate().context("invalid mapping settings")?;

    let table = read_csv(&args.input)?;

    let index = TokenVectorIndex::from_schema(schema);
    let mut mapper = FieldMapper::new(aliases).with_config(mapper_config);
    if !args.no_index {
        mapper = mapper.with_index(&index);
    }
    let mut mapping = mapper
        .map_default(&table.headers, schema)
        .with_context(|| format!("map columns of {}", args.input.display()))?;

    for source in &args.unset {
        clear_mapping(&mut mapping, source).with_context(|| format!("--unset {source}"))?;
    }
    for (source, target) in &args.set {
        set_manual_mapping(&mut mapping, source, target)
            .with_context(|| format!("--set {source}={target}"))?;
    }
    Ok((table, schema, mapping))
}

/// Identifier column before and after transformation, keyed by the target name.
fn identifier_keys(
    schema: &EntitySchema,
    mapping: &MappingResult,
    table: &CsvTable,
    transformed: &[Row],
) -> (Vec<KeyValues>, Vec<KeyValues>) {
    let Some(field) = schema.identifier_field() else {
        return (Vec::new(), Vec::new());
    };
    let Some(source) = mapping.mapping_for_target(&field.name).map(|m| m.source.as_str()) else {
        return (Vec::new(), Vec::new());
    };
    let input = KeyValues::new(field.name.as_str(), KeyValues::from_rows(source, &table.rows).values);
    let output = KeyValues::from_rows(&field.name, transformed);
    (vec![input], vec![output])
}
