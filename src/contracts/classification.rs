//! Intent classifier output

use super::{Category, ValidationError};
use serde::{Deserialize, Serialize};

/// Output of a single classification call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub confidence: f64,
    pub reason: String,
}

impl ClassificationResult {
    pub fn new(category: Category, confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            category,
            confidence,
            reason: reason.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.confidence.is_finite() && (0.0..=1.0).contains(&self.confidence) {
            Ok(())
        } else {
            Err(ValidationError::ConfidenceOutOfRange(self.confidence))
        }
    }
}
