//! Drift Engine - scores one observation against a baseline snapshot
//!
//! For each feature in the observation:
//! 1. skip it if the baseline does not track it
//! 2. score it (PSI or chi-square, by baseline kind)
//! 3. classify the score, or apply the failure severity
//! 4. report to the metrics sink
//!
//! The engine holds no baseline; every call receives the store by reference.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::baseline::{BaselineDistribution, BaselineStore, Reference};
use crate::config::DriftConfig;
use crate::error::{ConfigError, DriftError};
use crate::metrics::MetricsSink;
use crate::observation::{category_labels, numeric_values, Observation};
use crate::scoring::{categorical, CategoryCounts};
use crate::severity::{aggregate, Severity};

/// Result of scoring one observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub status: Severity,
    pub drift_scores: BTreeMap<String, f64>,

    /// Tracked features that could not be scored, with the reason
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub failed_features: BTreeMap<String, String>,

    /// Observation features the baseline does not know about
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub untracked_features: Vec<String>,
}

pub struct DriftEngine {
    config: DriftConfig,
    sink: Arc<dyn MetricsSink>,
}

impl DriftEngine {
    pub fn new(config: DriftConfig, sink: Arc<dyn MetricsSink>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, sink })
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    pub fn score(&self, store: &BaselineStore, observation: &Observation) -> DriftReport {
        let mut drift_scores = BTreeMap::new();
        let mut failed_features = BTreeMap::new();
        let mut untracked_features = Vec::new();
        let mut severities = Vec::new();

        for (name, value) in &observation.features {
            let Some(baseline) = store.get(name) else {
                untracked_features.push(name.clone());
                continue;
            };

            match score_feature(baseline, value) {
                Ok(score) => {
                    let severity = self.config.thresholds.classify(score);
                    severities.push(severity);
                    drift_scores.insert(name.clone(), score);
                    if let Err(e) = self.sink.record_score(name, score, severity) {
                        log::warn!("Metrics sink rejected score for '{}': {}", name, e);
                    }
                }
                Err(err) => {
                    log::warn!(
                        "Drift score for '{}' unavailable ({}); treating as {}",
                        name,
                        err,
                        self.config.failure_severity
                    );
                    severities.push(self.config.failure_severity);
                    failed_features.insert(name.clone(), err.to_string());
                    if let Err(e) = self.sink.record_failure(name, err.reason()) {
                        log::warn!("Metrics sink rejected failure for '{}': {}", name, e);
                    }
                }
            }
        }

        if !untracked_features.is_empty() {
            log::debug!("Skipped untracked features: {:?}", untracked_features);
        }

        let report = DriftReport {
            status: aggregate(severities),
            drift_scores,
            failed_features,
            untracked_features,
        };

        log::info!(
            "{}",
            serde_json::json!({
                "timestamp": observation.timestamp,
                "model_version": observation.model_version,
                "status": report.status,
                "drift_scores": report.drift_scores,
            })
        );

        report
    }
}

/// Score one tracked feature against its precomputed reference
pub fn score_feature(baseline: &BaselineDistribution, value: &Value) -> Result<f64, DriftError> {
    match &baseline.reference {
        Reference::Numeric { buckets, .. } => buckets.psi(&numeric_values(value)),
        Reference::Categorical { counts, .. } => {
            let incoming = CategoryCounts::from_labels(category_labels(value));
            categorical::score_counts(counts, &incoming)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureReason;
    use crate::metrics::{DriftMetrics, MetricsError};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use serde_json::json;

    fn normal_samples(n: usize, seed: u64) -> Vec<f64> {
        // Box-Muller
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
                let u2: f64 = rng.gen();
                (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
            })
            .collect()
    }

    fn engine(metrics: &Arc<DriftMetrics>) -> DriftEngine {
        DriftEngine::new(DriftConfig::default(), metrics.clone()).unwrap()
    }

    fn store(json: Value) -> BaselineStore {
        BaselineStore::from_slice(json.to_string().as_bytes(), 10).unwrap()
    }

    #[test]
    fn test_identical_numeric_sample_is_normal() {
        let samples = normal_samples(1000, 7);
        let store = store(json!({ "x": samples }));
        let metrics = Arc::new(DriftMetrics::new().unwrap());

        let obs = Observation::new("v1", "2024-01-01T00:00:00Z").with_feature("x", json!(samples));
        let report = engine(&metrics).score(&store, &obs);

        assert!(report.drift_scores["x"] < 0.01);
        assert_eq!(report.status, Severity::Normal);
        assert_eq!(metrics.warning_count() + metrics.critical_count(), 0);
    }

    #[test]
    fn test_categorical_shift_warns_or_worse() {
        let mut baseline = vec!["x"; 50];
        baseline.extend(vec!["y"; 50]);
        let mut incoming = vec!["x"; 10];
        incoming.extend(vec!["y"; 90]);

        let store = store(json!({ "a": baseline }));
        let metrics = Arc::new(DriftMetrics::new().unwrap());
        let obs = Observation::new("v1", "t").with_feature("a", json!(incoming));
        let report = engine(&metrics).score(&store, &obs);

        assert!(report.drift_scores["a"] > 0.2);
        assert!(report.status >= Severity::Warning);
        assert_eq!(metrics.critical_count(), 1);
    }

    #[test]
    fn test_shifted_numeric_is_critical() {
        let samples = normal_samples(500, 11);
        let shifted: Vec<f64> = samples.iter().map(|v| v + 100.0).collect();
        let store = store(json!({ "x": samples }));
        let metrics = Arc::new(DriftMetrics::new().unwrap());

        let obs = Observation::new("v1", "t").with_feature("x", json!(shifted));
        let report = engine(&metrics).score(&store, &obs);

        assert!(report.drift_scores["x"] > 0.5);
        assert_eq!(report.status, Severity::Critical);
        assert_eq!(metrics.critical_count(), 1);
        assert_eq!(metrics.score("x"), Some(report.drift_scores["x"]));
    }

    #[test]
    fn test_untracked_feature_is_skipped() {
        let store = store(json!({ "x": [1.0, 2.0, 3.0, 4.0] }));
        let metrics = Arc::new(DriftMetrics::new().unwrap());

        let obs = Observation::new("v1", "t")
            .with_feature("x", json!([1.0, 2.0, 3.0, 4.0]))
            .with_feature("unknown", json!(1e9));
        let report = engine(&metrics).score(&store, &obs);

        assert!(!report.drift_scores.contains_key("unknown"));
        assert_eq!(report.untracked_features, vec!["unknown".to_string()]);
        assert_eq!(report.status, Severity::Normal);
    }

    #[test]
    fn test_no_recognized_features_is_normal() {
        let store = store(json!({ "x": [1.0, 2.0] }));
        let metrics = Arc::new(DriftMetrics::new().unwrap());
        let obs = Observation::new("v1", "t").with_feature("y", json!("z"));

        let report = engine(&metrics).score(&store, &obs);
        assert_eq!(report.status, Severity::Normal);
        assert!(report.drift_scores.is_empty());
    }

    #[test]
    fn test_failures_use_fallback_severity() {
        let store = store(json!({ "x": [1.0, 2.0, 3.0], "c": ["a", "a", "a"] }));
        let metrics = Arc::new(DriftMetrics::new().unwrap());
        let obs = Observation::new("v1", "t")
            .with_feature("x", json!(null))
            .with_feature("c", json!("a"));

        // default fallback is normal
        let report = engine(&metrics).score(&store, &obs);
        assert_eq!(report.status, Severity::Normal);
        assert!(report.drift_scores.is_empty());
        assert!(report.failed_features["x"].starts_with("insufficient data"));
        assert!(report.failed_features["c"].starts_with("indeterminate drift"));
        assert_eq!(metrics.failure_count("x", FailureReason::InsufficientData), 1);
        assert_eq!(metrics.failure_count("c", FailureReason::Indeterminate), 1);

        let strict = DriftConfig { failure_severity: Severity::Warning, ..Default::default() };
        let report = DriftEngine::new(strict, metrics.clone()).unwrap().score(&store, &obs);
        assert_eq!(report.status, Severity::Warning);
    }

    #[test]
    fn test_numeric_category_codes_match_across_spellings() {
        let store = store(json!({
            "features": [{ "name": "zip", "kind": "categorical", "values": [1, 2, 1, 2] }]
        }));
        let metrics = Arc::new(DriftMetrics::new().unwrap());
        let obs = Observation::new("v1", "t").with_feature("zip", json!([1.0, 2.0, 1.0, 2.0]));

        let report = engine(&metrics).score(&store, &obs);
        assert!(report.drift_scores["zip"].abs() < 1e-12);
        assert_eq!(report.status, Severity::Normal);
    }

    struct BrokenSink;

    impl MetricsSink for BrokenSink {
        fn record_score(&self, _: &str, _: f64, _: Severity) -> Result<(), MetricsError> {
            Err(MetricsError::Unavailable("down".into()))
        }

        fn record_failure(&self, _: &str, _: FailureReason) -> Result<(), MetricsError> {
            Err(MetricsError::Unavailable("down".into()))
        }
    }

    #[test]
    fn test_sink_failure_does_not_change_report() {
        let store = store(json!({ "x": [1.0, 2.0, 3.0, 4.0] }));
        let obs = Observation::new("v1", "t")
            .with_feature("x", json!([100.0]))
            .with_feature("missing", json!(null));

        let healthy = Arc::new(DriftMetrics::new().unwrap());
        let expected = engine(&healthy).score(&store, &obs);

        let broken = DriftEngine::new(DriftConfig::default(), Arc::new(BrokenSink)).unwrap();
        assert_eq!(broken.score(&store, &obs), expected);
        assert_eq!(expected.status, Severity::Critical);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DriftConfig { psi_buckets: 0, ..Default::default() };
        assert!(DriftEngine::new(config, Arc::new(DriftMetrics::new().unwrap())).is_err());
    }

    #[test]
    fn test_report_json_shape() {
        let report = DriftReport {
            status: Severity::Warning,
            drift_scores: BTreeMap::from([("a".to_string(), 0.3)]),
            failed_features: BTreeMap::new(),
            untracked_features: Vec::new(),
        };
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({ "status": "warning", "drift_scores": { "a": 0.3 } })
        );
    }
}
