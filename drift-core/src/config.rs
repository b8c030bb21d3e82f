//! Engine configuration
//!
//! Fixed for the life of the process. Loading from the environment is the
//! binary's job; this type only carries and validates the values.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::severity::{Severity, ThresholdConfig};

pub const DEFAULT_PSI_BUCKETS: usize = 10;
pub const MAX_PSI_BUCKETS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftConfig {
    pub thresholds: ThresholdConfig,

    /// Quantile buckets used for numeric PSI
    pub psi_buckets: usize,

    /// Severity assigned to a feature whose score could not be computed
    pub failure_severity: Severity,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            psi_buckets: DEFAULT_PSI_BUCKETS,
            failure_severity: Severity::Normal,
        }
    }
}

impl DriftConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        if self.psi_buckets == 0 || self.psi_buckets > MAX_PSI_BUCKETS {
            return Err(ConfigError::invalid(
                "psi_buckets",
                format!("must be between 1 and {}", MAX_PSI_BUCKETS),
            ));
        }
        Ok(())
    }
}
