//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "hcm",
    version,
    about = "Map HR export columns onto a target schema and check the data before export",
    long_about = "Map the columns of an HR data export (CSV) onto a target entity schema.\n\n\
                  Matching runs through curated aliases, a token similarity index and\n\
                  fuzzy name comparison. The validate command also checks row integrity,\n\
                  required fields, value formats and duplicate identifiers."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Show offending cell values in the issue table instead of [REDACTED].
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Directory holding Fields.csv and Aliases.csv (default: $HCM_SCHEMA_DIR, then the embedded catalog).
    #[arg(long = "schema-dir", value_name = "DIR", global = true)]
    pub schema_dir: Option<PathBuf>,

    /// TOML file with [mapping] and [validation] tables.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the entity schemas in the catalog.
    Schemas(SchemasArgs),

    /// Map the header of a CSV file onto an entity schema.
    Map(MapArgs),

    /// Map, transform and validate a CSV file.
    Validate(ValidateArgs),
}

#[derive(Args)]
pub struct SchemasArgs {
    /// Show the fields of this entity only.
    #[arg(value_name = "ENTITY")]
    pub entity: Option<String>,
}

/// Options shared by `map` and `validate`.
#[derive(Args)]
pub struct MappingArgs {
    /// CSV file with a header row.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Target entity schema.
    #[arg(long = "entity", short = 'e', default_value = "candidate")]
    pub entity: String,

    /// Minimum confidence for a match (overrides the config file).
    #[arg(long = "min-confidence", value_name = "SCORE")]
    pub min_confidence: Option<f64>,

    /// Skip the similarity index stage.
    #[arg(long = "no-index")]
    pub no_index: bool,

    /// Manual mapping SOURCE=TARGET, applied after automatic matching.
    #[arg(long = "set", value_name = "SOURCE=TARGET", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// Remove the automatic mapping of this source column.
    #[arg(long = "unset", value_name = "SOURCE")]
    pub unset: Vec<String>,
}

#[derive(Args)]
pub struct MapArgs {
    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Print the mapping result as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Accept fewer output rows than input rows.
    #[arg(long = "allow-dedup")]
    pub allow_dedup: bool,

    /// Write the validation report as JSON to this path.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Write the transformed rows here when validation passes.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_assignment(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((source, target)) if !source.trim().is_empty() && !target.trim().is_empty() => {
            Ok((source.trim().to_string(), target.trim().to_string()))
        }
        _ => Err(format!("expected SOURCE=TARGET, got '{value}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_split_on_first_equals() {
        assert_eq!(
            parse_assignment("Person ID = CANDIDATE_ID"),
            Ok(("Person ID".to_string(), "CANDIDATE_ID".to_string()))
        );
        assert!(parse_assignment("CANDIDATE_ID").is_err());
        assert!(parse_assignment("=EMAIL").is_err());
    }

    #[test]
    fn validate_command_parses() {
        let cli = Cli::try_parse_from([
            "hcm",
            "--log-data",
            "validate",
            "export.csv",
            "--entity",
            "requisition",
            "--set",
            "Req=REQUISITION_ID",
            "--allow-dedup",
        ])
        .unwrap();
        assert!(cli.log_data);
        let Command::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.mapping.entity, "requisition");
        assert_eq!(
            args.mapping.set,
            vec![("Req".to_string(), "REQUISITION_ID".to_string())]
        );
        assert!(args.allow_dedup);
    }
}
