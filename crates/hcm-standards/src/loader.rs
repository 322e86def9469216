//! CSV parsing for the schema catalog.

use std::collections::BTreeMap;
use std::io::Read;

use csv::ReaderBuilder;
use regex::Regex;

use hcm_model::{AliasDictionary, EntitySchema, FieldType, TargetFieldSpec};

use crate::error::{Result, StandardsError};

pub(crate) type CsvRow = BTreeMap<String, String>;

/// Read CSV content into a vector of row maps keyed by header.
///
/// Handles BOM characters and trims whitespace from values.
pub(crate) fn read_csv_rows<R: Read>(reader: R, origin: &str) -> Result<Vec<CsvRow>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|source| StandardsError::Csv {
            origin: origin.to_string(),
            source,
        })?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| StandardsError::Csv {
            origin: origin.to_string(),
            source,
        })?;
        let mut row = BTreeMap::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers
                .get(idx)
                .unwrap_or("")
                .trim_matches('\u{feff}')
                .to_string();
            row.insert(key, value.trim().to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

fn get_field<'a>(row: &'a CsvRow, key: &str) -> &'a str {
    row.get(key).map(String::as_str).unwrap_or("")
}

fn parse_flag(raw: &str, field: &'static str, origin: &str) -> Result<bool> {
    match raw.trim().to_uppercase().as_str() {
        "Y" | "YES" | "TRUE" | "1" => Ok(true),
        "" | "N" | "NO" | "FALSE" | "0" => Ok(false),
        _ => Err(StandardsError::InvalidValue {
            field,
            value: raw.to_string(),
            origin: origin.to_string(),
        }),
    }
}

fn parse_optional_number<T: std::str::FromStr>(
    raw: &str,
    field: &'static str,
    origin: &str,
) -> Result<Option<T>> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| StandardsError::InvalidValue {
            field,
            value: raw.to_string(),
            origin: origin.to_string(),
        })
}

#[derive(Default)]
struct SchemaDraft {
    name: String,
    fields: Vec<(u32, TargetFieldSpec)>,
    identifier: Option<String>,
    unique_identifier: bool,
}

/// Build entity schemas from `Fields.csv` rows, keyed by lowercase entity name.
pub(crate) fn build_schemas(
    rows: &[CsvRow],
    origin: &str,
) -> Result<BTreeMap<String, EntitySchema>> {
    let mut drafts: BTreeMap<String, SchemaDraft> = BTreeMap::new();

    for row in rows {
        let entity = get_field(row, "Entity");
        let name = get_field(row, "Field Name");
        if entity.is_empty() || name.is_empty() {
            continue;
        }
        let draft = drafts
            .entry(entity.to_lowercase())
            .or_insert_with(|| SchemaDraft {
                name: entity.to_string(),
                ..SchemaDraft::default()
            });

        let field_type: FieldType =
            get_field(row, "Type")
                .parse()
                .map_err(|_| StandardsError::InvalidValue {
                    field: "Type",
                    value: get_field(row, "Type").to_string(),
                    origin: origin.to_string(),
                })?;

        let mut spec = TargetFieldSpec::new(name, field_type);
        let display = get_field(row, "Display Name");
        if !display.is_empty() {
            spec = spec.with_display_name(display);
        }
        if parse_flag(get_field(row, "Required"), "Required", origin)? {
            spec = spec.required();
        }
        if let Some(max_length) = parse_optional_number(get_field(row, "Max Length"), "Max Length", origin)? {
            spec = spec.with_max_length(max_length);
        }
        let pattern = get_field(row, "Pattern");
        if !pattern.is_empty() {
            Regex::new(pattern).map_err(|err| {
                StandardsError::invalid_schema(
                    entity,
                    format!("field {name} has an invalid pattern: {err}"),
                )
            })?;
            spec = spec.with_pattern(pattern);
        }
        match get_field(row, "Separator") {
            "" => {}
            sep if sep.eq_ignore_ascii_case("default") => spec = spec.multi_value(None),
            sep => spec = spec.multi_value(Some(sep)),
        }

        if parse_flag(get_field(row, "Identifier"), "Identifier", origin)? {
            if let Some(existing) = &draft.identifier {
                return Err(StandardsError::invalid_schema(
                    entity,
                    format!("multiple identifier fields ({existing}, {name})"),
                ));
            }
            draft.identifier = Some(name.to_string());
            draft.unique_identifier = parse_flag(get_field(row, "Unique"), "Unique", origin)?;
        }

        let order =
            parse_optional_number(get_field(row, "Order"), "Order", origin)?.unwrap_or(u32::MAX);
        draft.fields.push((order, spec));
    }

    let mut schemas = BTreeMap::new();
    for (key, mut draft) in drafts {
        draft.fields.sort_by_key(|(order, _)| *order);
        let mut schema = EntitySchema::new(
            draft.name,
            draft.fields.into_iter().map(|(_, spec)| spec).collect(),
        );
        if let Some(identifier) = draft.identifier {
            schema = schema.with_identifier(identifier, draft.unique_identifier);
        }
        if let Some(duplicate) = schema.duplicate_field_name() {
            return Err(StandardsError::invalid_schema(
                &schema.name,
                format!("field {duplicate} is declared more than once"),
            ));
        }
        tracing::debug!(entity = %schema.name, fields = schema.len(), "loaded schema");
        schemas.insert(key, schema);
    }
    Ok(schemas)
}

/// Build alias dictionaries from `Aliases.csv` rows.
///
/// Every alias must name a field declared in `schemas`.
pub(crate) fn build_aliases(
    rows: &[CsvRow],
    schemas: &BTreeMap<String, EntitySchema>,
) -> Result<BTreeMap<String, AliasDictionary>> {
    let mut dictionaries: BTreeMap<String, AliasDictionary> = BTreeMap::new();
    for row in rows {
        let entity = get_field(row, "Entity");
        let field = get_field(row, "Field Name");
        let alias = get_field(row, "Alias");
        if entity.is_empty() || field.is_empty() || alias.is_empty() {
            continue;
        }
        let key = entity.to_lowercase();
        let Some(schema) = schemas.get(&key) else {
            return Err(StandardsError::invalid_schema(
                entity,
                "aliases reference an unknown entity",
            ));
        };
        if !schema.contains(field) {
            return Err(StandardsError::invalid_schema(
                entity,
                format!("alias '{alias}' references unknown field {field}"),
            ));
        }
        dictionaries.entry(key).or_default().insert(field, alias);
    }
    Ok(dictionaries)
}
