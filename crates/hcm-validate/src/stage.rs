use serde::{Deserialize, Serialize};

/// Progress of one `validate_rows` call.
///
/// Stages only move forward and nothing is kept between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStage {
    Pending,
    CheckingRequired,
    CheckingFormats,
    CheckingDuplicates,
    Complete,
}

impl ValidationStage {
    /// The following stage; `Complete` stays `Complete`.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Pending => Self::CheckingRequired,
            Self::CheckingRequired => Self::CheckingFormats,
            Self::CheckingFormats => Self::CheckingDuplicates,
            Self::CheckingDuplicates | Self::Complete => Self::Complete,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::CheckingRequired => "CHECKING_REQUIRED",
            Self::CheckingFormats => "CHECKING_FORMATS",
            Self::CheckingDuplicates => "CHECKING_DUPLICATES",
            Self::Complete => "COMPLETE",
        }
    }
}
