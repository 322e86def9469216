use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// Tunables for [`FieldMapper`](crate::FieldMapper).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Minimum confidence for a stage result to be accepted.
    pub min_confidence: f64,
    /// Number of nearest targets requested from the similarity index.
    pub semantic_top_k: usize,
    /// Scores closer than this are treated as tied.
    pub tie_epsilon: f64,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.70,
            semantic_top_k: 3,
            tie_epsilon: 1e-6,
        }
    }
}

impl MapperConfig {
    pub fn validate(&self) -> Result<()> {
        check_threshold(self.min_confidence)?;
        self.check_tuning()
    }

    pub(crate) fn check_tuning(&self) -> Result<()> {
        if self.semantic_top_k == 0 {
            return Err(MapError::InvalidSetting {
                name: "semantic_top_k",
                value: self.semantic_top_k.to_string(),
                reason: "must be at least 1",
            });
        }
        if !(self.tie_epsilon.is_finite() && self.tie_epsilon >= 0.0) {
            return Err(MapError::InvalidSetting {
                name: "tie_epsilon",
                value: self.tie_epsilon.to_string(),
                reason: "must be a finite non-negative number",
            });
        }
        Ok(())
    }
}

pub(crate) fn check_threshold(value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MapError::InvalidThreshold { value })
    }
}
