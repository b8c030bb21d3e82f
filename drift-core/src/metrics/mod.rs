//! Metrics Sink
//!
//! The engine reports every classified feature to a `MetricsSink` after the
//! severity is known. Sink errors never change a scoring result.

mod registry;

pub use registry::{DriftMetrics, CONTENT_TYPE};

use thiserror::Error;

use crate::error::FailureReason;
use crate::severity::Severity;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    #[error("refusing non-finite value {value} for feature '{feature}'")]
    NonFinite { feature: String, value: f64 },

    #[error("metrics sink unavailable: {0}")]
    Unavailable(String),

    #[error("metrics registry error: {0}")]
    Registry(String),
}

impl From<prometheus::Error> for MetricsError {
    fn from(err: prometheus::Error) -> Self {
        MetricsError::Registry(err.to_string())
    }
}

/// Destination for per-feature drift signals. Implementations must tolerate
/// concurrent calls without losing updates.
pub trait MetricsSink: Send + Sync {
    /// Called once per scored feature, after classification
    fn record_score(&self, feature: &str, score: f64, severity: Severity) -> Result<(), MetricsError>;

    /// Called once per feature whose score could not be computed
    fn record_failure(&self, feature: &str, reason: FailureReason) -> Result<(), MetricsError>;
}
