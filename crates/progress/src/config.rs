//! Learning service configuration.

use std::path::Path;
use academy_core::{CompletionRequirements, TemplateType};
use serde::{Deserialize, Serialize};
use crate::error::{ProgressError, Result};

/// Watch ratio at which a lecture counts as completed.
pub const DEFAULT_COMPLETION_THRESHOLD: f64 = 0.8;

/// Configuration for the learning service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademyConfig {
    /// Watch ratio that completes a lecture (0.0-1.0)
    pub completion_threshold: f64,
    /// Policy a course completion is checked against
    pub requirements: CompletionRequirements,
    /// Issue a certificate as soon as a course is completed
    pub auto_issue: bool,
    /// Layout of newly issued certificates
    pub template_type: TemplateType,
}

impl Default for AcademyConfig {
    fn default() -> Self {
        Self {
            completion_threshold: DEFAULT_COMPLETION_THRESHOLD,
            requirements: CompletionRequirements::default(),
            auto_issue: true,
            template_type: TemplateType::default(),
        }
    }
}

impl AcademyConfig {
    /// Read configuration from a JSON file. Missing keys take their defaults.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ProgressError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| ProgressError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the rules cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.completion_threshold > 0.0 && self.completion_threshold <= 1.0) {
            return Err(ProgressError::Config(format!(
                "completion_threshold must be in (0, 1], got {}",
                self.completion_threshold
            )));
        }
        if self.requirements.min_progress_percentage > 100 {
            return Err(ProgressError::Config(format!(
                "min_progress_percentage must be at most 100, got {}",
                self.requirements.min_progress_percentage
            )));
        }
        Ok(())
    }
}
