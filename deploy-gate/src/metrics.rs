//! Evaluation metrics input

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DeployError, DeployResult};

/// Offline evaluation of the candidate model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
}

impl EvaluationMetrics {
    pub fn load(path: &Path) -> DeployResult<Self> {
        let fail = |reason: String| DeployError::Metrics {
            path: path.display().to_string(),
            reason,
        };

        let bytes = fs::read(path).map_err(|e| fail(e.to_string()))?;
        let metrics: Self = serde_json::from_slice(&bytes).map_err(|e| fail(e.to_string()))?;
        metrics.validate().map_err(fail)?;
        Ok(metrics)
    }

    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("accuracy", self.accuracy),
            ("precision", self.precision),
            ("recall", self.recall),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} {} is outside [0, 1]", name, value));
            }
        }
        Ok(())
    }
}
