//! Error taxonomy
//!
//! `ConfigError` and `BaselineError` are startup failures: no request can be
//! served correctly after either. `DriftError` is scoped to one feature.

use std::path::PathBuf;

use thiserror::Error;

/// Missing or invalid process configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { key: key.into(), reason: reason.into() }
    }
}

/// Baseline source could not be turned into a store
#[derive(Debug, Error)]
pub enum BaselineError {
    #[error("cannot read baseline {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed baseline: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("baseline declares no features")]
    Empty,

    #[error("feature '{0}' is declared more than once")]
    Duplicate(String),

    #[error("feature '{feature}' cannot be classified: {reason}")]
    Unclassifiable { feature: String, reason: String },
}

impl BaselineError {
    pub(crate) fn unclassifiable(feature: &str, reason: impl Into<String>) -> Self {
        BaselineError::Unclassifiable { feature: feature.to_string(), reason: reason.into() }
    }
}

/// Per-feature scoring failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DriftError {
    /// Sample is empty once non-finite values are discarded
    #[error("insufficient data: {0}")]
    InsufficientData(&'static str),

    /// The contingency table cannot support an independence test
    #[error("indeterminate drift: {0}")]
    Indeterminate(String),
}

impl DriftError {
    pub fn reason(&self) -> FailureReason {
        match self {
            DriftError::InsufficientData(_) => FailureReason::InsufficientData,
            DriftError::Indeterminate(_) => FailureReason::Indeterminate,
        }
    }
}

/// Metric label for a failed feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureReason {
    InsufficientData,
    Indeterminate,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::InsufficientData => "insufficient_data",
            FailureReason::Indeterminate => "indeterminate",
        }
    }
}
