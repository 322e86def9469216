use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use hcm_cli::logging::redact_value;
use hcm_model::{
    AliasDictionary, ConfidenceLevel, ConfidenceThresholds, EntitySchema, MappingMethod,
    MappingResult,
};
use hcm_standards::SchemaRegistry;
use hcm_validate::{DataLossError, Severity, ValidationIssue};

use crate::types::ValidateOutcome;

pub fn print_entities(registry: &SchemaRegistry) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Entity"),
        header_cell("Fields"),
        header_cell("Required"),
        header_cell("Identifier"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for schema in registry.entities() {
        table.add_row(vec![
            Cell::new(&schema.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(schema.len()),
            Cell::new(schema.required_fields().count()),
            schema
                .identifier
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
}

pub fn print_fields(schema: &EntitySchema, aliases: &AliasDictionary) {
    println!("Entity: {}", schema.name);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Display Name"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Max"),
        header_cell("Aliases"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);
    for field in &schema.fields {
        let aliases: Vec<&str> = aliases.aliases_for(&field.name).collect();
        let mut field_type = field.field_type.to_string();
        if let Some(separator) = field.separator() {
            field_type = format!("{field_type} ({separator})");
        }
        table.add_row(vec![
            Cell::new(&field.name).add_attribute(Attribute::Bold),
            Cell::new(&field.display_name),
            Cell::new(field_type),
            if field.required {
                Cell::new("✓").fg(Color::Green)
            } else {
                dim_cell("-")
            },
            field.max_length.map_or_else(|| dim_cell("-"), Cell::new),
            if aliases.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(aliases.join(", "))
            },
        ]);
    }
    println!("{table}");
}

pub fn print_mapping(result: &MappingResult) {
    println!("Entity: {}", result.entity);
    let thresholds = ConfidenceThresholds::default();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Target"),
        header_cell("Method"),
        header_cell("Confidence"),
        header_cell("Alternatives"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    for mapping in &result.mappings {
        let alternatives = mapping
            .alternatives
            .iter()
            .map(|a| format!("{} ({:.2})", a.target, a.confidence))
            .collect::<Vec<_>>();
        table.add_row(vec![
            Cell::new(&mapping.source),
            Cell::new(&mapping.target).add_attribute(Attribute::Bold),
            method_cell(mapping.method),
            confidence_cell(mapping.confidence, thresholds.categorize(mapping.confidence)),
            if alternatives.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(alternatives.join(", "))
            },
        ]);
    }
    for source in &result.unmapped_source {
        table.add_row(vec![
            Cell::new(source).fg(Color::DarkGrey),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    println!("{table}");

    let distribution = result.confidence_distribution();
    println!(
        "Mapped {}/{} columns (high {}, medium {}, low {})",
        result.mapped_count(),
        result.total_count(),
        distribution.high,
        distribution.medium,
        distribution.low
    );
    if let (Some(mean), Some(lowest)) = (result.mean_confidence(), result.lowest_confidence()) {
        println!("Mean confidence: {mean:.2} (lowest {lowest:.2})");
    }
    if result.semantic_stage_skipped {
        println!("Note: similarity index stage was skipped");
    }
    if !result.required_unmapped.is_empty() {
        eprintln!(
            "Required targets without a source: {}",
            result.required_unmapped.join(", ")
        );
    }
}

pub fn print_validation(outcome: &ValidateOutcome) {
    print_mapping(&outcome.mapping);
    println!();

    let summary = &outcome.report.summary;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows In"),
        header_cell("Rows Out"),
        header_cell("Required"),
        header_cell("Optional"),
        header_cell("Errors"),
        header_cell("Warnings"),
        header_cell("Info"),
        header_cell("Export"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 0..8 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(outcome.input_rows),
        Cell::new(outcome.output_rows),
        Cell::new(format!("{}/{}", summary.required_mapped, summary.required_total)),
        Cell::new(format!("{}/{}", summary.optional_mapped, summary.optional_total)),
        count_cell(summary.error_count, Color::Red),
        count_cell(summary.warning_count, Color::Yellow),
        count_cell(summary.info_count, Color::Cyan),
        if outcome.is_exportable() {
            Cell::new("✓")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new("BLOCKED")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold)
        },
    ]);
    println!("{table}");

    print_issue_table(&outcome.report.issues);
    if let Some(error) = &outcome.data_loss {
        print_data_loss(error);
    }
    if let Some(path) = &outcome.written {
        println!("Output: {}", path.display());
    }
}

fn print_issue_table(issues: &[ValidationIssue]) {
    if issues.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Field"),
        header_cell("Row"),
        header_cell("Message"),
        header_cell("Value"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    for issue in issues {
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(&issue.field),
            issue.row.map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(&issue.message),
            issue
                .value
                .as_deref()
                .map_or_else(|| dim_cell("-"), |v| Cell::new(redact_value(v))),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

fn print_data_loss(error: &DataLossError) {
    eprintln!();
    eprintln!("Data loss: {error}");
    if !error.missing_row_indices.is_empty() {
        let sample = error
            .missing_row_indices
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        eprintln!("Missing input rows (0-based): {sample}");
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(22)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Percentage(55)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn method_cell(method: MappingMethod) -> Cell {
    let color = match method {
        MappingMethod::Alias => Color::Green,
        MappingMethod::Semantic => Color::Blue,
        MappingMethod::Fuzzy => Color::Yellow,
        MappingMethod::Manual => Color::Magenta,
    };
    Cell::new(method.as_str()).fg(color)
}

fn confidence_cell(confidence: f64, level: Option<ConfidenceLevel>) -> Cell {
    let cell = Cell::new(format!("{confidence:.2}"));
    match level {
        Some(ConfidenceLevel::High) => cell.fg(Color::Green),
        Some(ConfidenceLevel::Medium) => cell.fg(Color::Yellow),
        Some(ConfidenceLevel::Low) | None => cell.fg(Color::Red),
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
        Severity::Info => Cell::new("INFO").fg(Color::Cyan),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
