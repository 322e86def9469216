use std::path::PathBuf;

use hcm_model::MappingResult;
use hcm_validate::{DataLossError, ValidationReport};

/// Result of the `validate` command.
#[derive(Debug)]
pub struct ValidateOutcome {
    pub mapping: MappingResult,
    pub report: ValidationReport,
    pub data_loss: Option<DataLossError>,
    pub input_rows: usize,
    pub output_rows: usize,
    /// Transformed CSV written, if requested and allowed.
    pub written: Option<PathBuf>,
}

impl ValidateOutcome {
    /// Export is allowed only with a valid report and no lost rows.
    pub fn is_exportable(&self) -> bool {
        self.report.is_valid && self.data_loss.is_none()
    }
}
