//! Drift Core - Statistical Drift Scoring Engine
//!
//! Compares incoming feature values against a stored baseline and classifies
//! every feature (and the whole observation) as normal, warning or critical.
//!
//! # Architecture
//! - `baseline`: immutable reference distributions, loaded once
//! - `scoring`: PSI for numeric features, chi-square for categorical ones
//! - `severity`: threshold classification and aggregation
//! - `metrics`: counters/gauges updated after classification
//! - `engine`: per-observation orchestration producing a `DriftReport`
//!
//! # Failure Strategy
//! Baseline and configuration errors are fatal to the caller.
//! Scoring errors only fail the feature they belong to.

pub mod baseline;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod observation;
pub mod scoring;
pub mod severity;

pub use baseline::{BaselineDistribution, BaselineHandle, BaselineStore, FeatureKind};
pub use config::DriftConfig;
pub use engine::{DriftEngine, DriftReport};
pub use error::{BaselineError, ConfigError, DriftError, FailureReason};
pub use metrics::{DriftMetrics, MetricsError, MetricsSink};
pub use observation::Observation;
pub use severity::{aggregate, Severity, ThresholdConfig};
