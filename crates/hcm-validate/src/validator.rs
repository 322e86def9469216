//! Per-row data quality validation of a transformed row set.

use hcm_model::{EntitySchema, MappingResult, Row};

use crate::checks::{self, CheckContext};
use crate::issue::Severity;
use crate::options::ValidationOptions;
use crate::report::{IssueCollector, ValidationReport, ValidationSummary};
use crate::stage::ValidationStage;

/// Runs the required, format and duplicate checks over rows keyed by
/// target field name.
///
/// The validator keeps no state between calls.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: ValidationOptions,
}

impl Validator {
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate `rows` (already transformed onto `schema`'s field names)
    /// against `schema` and the `mapping` that produced them.
    pub fn validate_rows(
        &self,
        rows: &[Row],
        schema: &EntitySchema,
        mapping: &MappingResult,
    ) -> ValidationReport {
        let span = tracing::info_span!("validate", entity = %schema.name, rows = rows.len());
        let _guard = span.enter();

        let ctx = CheckContext {
            rows,
            schema,
            mapping,
            options: &self.options,
        };
        let mut collector = IssueCollector::new(self.options.error_cap_per_field);

        let mut stage = ValidationStage::Pending;
        while stage != ValidationStage::Complete {
            stage = stage.next();
            tracing::debug!(stage = stage.as_str(), "validation stage");
            match stage {
                ValidationStage::CheckingRequired => checks::run_required(&ctx, &mut collector),
                ValidationStage::CheckingFormats => checks::run_formats(&ctx, &mut collector),
                ValidationStage::CheckingDuplicates => checks::run_duplicates(&ctx, &mut collector),
                ValidationStage::Pending | ValidationStage::Complete => {}
            }
        }

        let (issues, suppressed_errors) = collector.finish();
        let count = |severity: Severity| issues.iter().filter(|i| i.severity == severity).count();
        let summary = ValidationSummary {
            required_mapped: schema
                .required_fields()
                .filter(|f| mapping.is_target_mapped(&f.name))
                .count(),
            required_total: schema.required_fields().count(),
            optional_mapped: schema
                .optional_fields()
                .filter(|f| mapping.is_target_mapped(&f.name))
                .count(),
            optional_total: schema.optional_fields().count(),
            rows_checked: rows.len(),
            error_count: count(Severity::Error) + suppressed_errors,
            warning_count: count(Severity::Warning),
            info_count: count(Severity::Info),
            suppressed_errors,
        };

        let report = ValidationReport {
            entity: schema.name.clone(),
            is_valid: summary.error_count == 0,
            issues,
            summary,
        };
        tracing::info!(
            is_valid = report.is_valid,
            errors = summary.error_count,
            warnings = summary.warning_count,
            suppressed = suppressed_errors,
            "validation complete"
        );
        report
    }
}

/// Validate with default [`ValidationOptions`].
pub fn validate_rows(rows: &[Row], schema: &EntitySchema, mapping: &MappingResult) -> ValidationReport {
    Validator::default().validate_rows(rows, schema, mapping)
}
