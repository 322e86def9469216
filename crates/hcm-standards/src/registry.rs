use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use hcm_model::{AliasDictionary, EntitySchema};

use crate::embedded::{ALIASES_CSV, ALIASES_FILE, FIELDS_CSV, FIELDS_FILE};
use crate::error::{Result, StandardsError};
use crate::loader::{build_aliases, build_schemas, read_csv_rows};

/// Environment variable for overriding the schema catalog directory.
pub const SCHEMA_DIR_ENV_VAR: &str = "HCM_SCHEMA_DIR";

/// Schema directory from `HCM_SCHEMA_DIR`, if set and non-empty.
pub fn default_schema_dir() -> Option<PathBuf> {
    std::env::var_os(SCHEMA_DIR_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Immutable catalog of entity schemas and their alias dictionaries.
///
/// Built once at startup; lookups are case-insensitive on entity name.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, EntitySchema>,
    aliases: BTreeMap<String, AliasDictionary>,
}

impl SchemaRegistry {
    /// Load the catalog compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_csv(FIELDS_CSV.as_bytes(), ALIASES_CSV.as_bytes(), "embedded catalog")
    }

    /// Load `Fields.csv` and the optional `Aliases.csv` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let fields_path = dir.join(FIELDS_FILE);
        let fields = open(&fields_path)?;
        let aliases_path = dir.join(ALIASES_FILE);
        let origin = dir.display().to_string();
        if aliases_path.is_file() {
            Self::from_csv(fields, open(&aliases_path)?, &origin)
        } else {
            tracing::debug!(path = %aliases_path.display(), "no alias file; using empty dictionaries");
            Self::from_csv(fields, io::empty(), &origin)
        }
    }

    /// Use `HCM_SCHEMA_DIR` when set, the embedded catalog otherwise.
    pub fn from_env_or_embedded() -> Result<Self> {
        match default_schema_dir() {
            Some(dir) => Self::from_dir(&dir),
            None => Self::embedded(),
        }
    }

    /// Parse catalog CSV content from any readers.
    pub fn from_csv<F: Read, A: Read>(fields: F, aliases: A, origin: &str) -> Result<Self> {
        let field_rows = read_csv_rows(fields, origin)?;
        let schemas = build_schemas(&field_rows, origin)?;
        let alias_rows = read_csv_rows(aliases, origin)?;
        let mut aliases = build_aliases(&alias_rows, &schemas)?;
        for key in schemas.keys() {
            aliases.entry(key.clone()).or_default();
        }
        tracing::info!(origin, entities = schemas.len(), "schema catalog loaded");
        Ok(Self { schemas, aliases })
    }

    /// Register a schema built in code, replacing any entity of the same name.
    pub fn insert(&mut self, schema: EntitySchema, aliases: AliasDictionary) -> Result<()> {
        if schema.is_empty() {
            return Err(StandardsError::invalid_schema(&schema.name, "schema has no fields"));
        }
        if let Some(duplicate) = schema.duplicate_field_name() {
            return Err(StandardsError::invalid_schema(
                &schema.name,
                format!("field {duplicate} is declared more than once"),
            ));
        }
        if let Some(target) = aliases.targets().find(|t| !schema.contains(t)) {
            return Err(StandardsError::invalid_schema(
                &schema.name,
                format!("aliases reference unknown field {target}"),
            ));
        }
        let key = schema.name.to_lowercase();
        self.aliases.insert(key.clone(), aliases);
        self.schemas.insert(key, schema);
        Ok(())
    }

    /// Look up the schema for `entity`.
    pub fn load_schema(&self, entity: &str) -> Result<&EntitySchema> {
        self.schemas
            .get(&entity.trim().to_lowercase())
            .ok_or_else(|| StandardsError::SchemaNotFound {
                entity: entity.to_string(),
            })
    }

    /// Alias dictionary for `entity`; empty when the catalog declares none.
    pub fn aliases(&self, entity: &str) -> Result<&AliasDictionary> {
        self.aliases
            .get(&entity.trim().to_lowercase())
            .ok_or_else(|| StandardsError::SchemaNotFound {
                entity: entity.to_string(),
            })
    }

    /// All schemas, ordered by entity name.
    pub fn entities(&self) -> impl Iterator<Item = &EntitySchema> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| StandardsError::Io {
        path: path.to_path_buf(),
        source,
    })
}
