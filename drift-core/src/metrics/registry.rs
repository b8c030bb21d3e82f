//! Process-wide drift metrics backed by a `prometheus` registry

use prometheus::proto::MetricFamily;
use prometheus::{Encoder, GaugeVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use super::{MetricsError, MetricsSink};
use crate::error::FailureReason;
use crate::severity::Severity;

// ============================================================================
// CONSTANTS
// ============================================================================

pub const WARNING_COUNTER: &str = "drift_warning_count";
pub const CRITICAL_COUNTER: &str = "drift_critical_count";
pub const SCORE_GAUGE: &str = "current_psi_score";
pub const FAILURE_COUNTER: &str = "drift_scoring_failures_count";

/// Exposition content type for the text format
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

// ============================================================================
// REGISTRY
// ============================================================================

/// Drift series registered on a private registry, so every instance
/// starts from zero.
#[derive(Clone)]
pub struct DriftMetrics {
    registry: Registry,
    warnings: IntCounter,
    criticals: IntCounter,
    scores: GaugeVec,
    failures: IntCounterVec,
}

impl DriftMetrics {
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let warnings = IntCounter::new(WARNING_COUNTER, "Number of drift warnings")?;
        let criticals = IntCounter::new(CRITICAL_COUNTER, "Number of critical drift alerts")?;
        let scores = GaugeVec::new(
            Opts::new(SCORE_GAUGE, "Latest drift score per feature"),
            &["feature"],
        )?;
        let failures = IntCounterVec::new(
            Opts::new(FAILURE_COUNTER, "Features whose drift score could not be computed"),
            &["feature", "reason"],
        )?;

        registry.register(Box::new(warnings.clone()))?;
        registry.register(Box::new(criticals.clone()))?;
        registry.register(Box::new(scores.clone()))?;
        registry.register(Box::new(failures.clone()))?;

        Ok(Self { registry, warnings, criticals, scores, failures })
    }

    pub fn warning_count(&self) -> u64 {
        self.warnings.get()
    }

    pub fn critical_count(&self) -> u64 {
        self.criticals.get()
    }

    /// Latest score recorded for `feature`
    pub fn score(&self, feature: &str) -> Option<f64> {
        self.sample(SCORE_GAUGE, &[("feature", feature)], |m| m.get_gauge().get_value())
    }

    pub fn failure_count(&self, feature: &str, reason: FailureReason) -> u64 {
        self.sample(
            FAILURE_COUNTER,
            &[("feature", feature), ("reason", reason.as_str())],
            |m| m.get_counter().get_value(),
        )
        .map(|v| v as u64)
        .unwrap_or(0)
    }

    /// Render all series in Prometheus text exposition format
    pub fn render(&self) -> Result<String, MetricsError> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| MetricsError::Registry(e.to_string()))
    }

    // Reads through `gather` so a lookup never creates a labeled child
    fn sample<F>(&self, name: &str, labels: &[(&str, &str)], value: F) -> Option<f64>
    where
        F: Fn(&prometheus::proto::Metric) -> f64,
    {
        let families: Vec<MetricFamily> = self.registry.gather();
        let family = families.iter().find(|f| f.get_name() == name)?;
        family
            .get_metric()
            .iter()
            .find(|m| {
                labels.iter().all(|(k, v)| {
                    m.get_label()
                        .iter()
                        .any(|l| l.get_name() == *k && l.get_value() == *v)
                })
            })
            .map(value)
    }
}

impl MetricsSink for DriftMetrics {
    fn record_score(&self, feature: &str, score: f64, severity: Severity) -> Result<(), MetricsError> {
        if !score.is_finite() {
            return Err(MetricsError::NonFinite { feature: feature.to_string(), value: score });
        }

        match severity {
            Severity::Warning => self.warnings.inc(),
            Severity::Critical => self.criticals.inc(),
            Severity::Normal => {}
        }

        self.scores.get_metric_with_label_values(&[feature])?.set(score);
        Ok(())
    }

    fn record_failure(&self, feature: &str, reason: FailureReason) -> Result<(), MetricsError> {
        self.failures
            .get_metric_with_label_values(&[feature, reason.as_str()])?
            .inc();
        Ok(())
    }
}
