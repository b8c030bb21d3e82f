//! Configuration module

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use drift_core::config::DEFAULT_PSI_BUCKETS;
use drift_core::severity::{DEFAULT_CRITICAL_THRESHOLD, DEFAULT_WARNING_THRESHOLD};
use drift_core::{ConfigError, DriftConfig, Severity, ThresholdConfig};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Baseline snapshot (JSON)
    pub baseline_path: PathBuf,

    /// Server port
    pub port: u16,

    /// Scoring thresholds and options
    pub drift: DriftConfig,

    /// Upper bound on observations scored at the same time
    pub max_concurrent_scoring: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let baseline_path = lookup("BASELINE_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("BASELINE_PATH"))?;

        let thresholds = ThresholdConfig::new(
            parse_or(&lookup, "WARNING_THRESHOLD", DEFAULT_WARNING_THRESHOLD)?,
            parse_or(&lookup, "CRITICAL_THRESHOLD", DEFAULT_CRITICAL_THRESHOLD)?,
        )?;

        let drift = DriftConfig {
            thresholds,
            psi_buckets: parse_or(&lookup, "PSI_BUCKETS", DEFAULT_PSI_BUCKETS)?,
            failure_severity: parse_or(&lookup, "SCORING_FAILURE_SEVERITY", Severity::Normal)?,
        };
        drift.validate()?;

        let default_slots = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        let max_concurrent_scoring = parse_or(&lookup, "MAX_CONCURRENT_SCORING", default_slots)?;
        if max_concurrent_scoring == 0 {
            return Err(ConfigError::invalid("MAX_CONCURRENT_SCORING", "must be at least 1"));
        }

        Ok(Self {
            baseline_path,
            port: parse_or(&lookup, "PORT", 8080)?,
            drift,
            max_concurrent_scoring,
        })
    }
}

/// A set-but-unparsable value is an error, not a silent default
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(key, format!("'{}': {}", raw, e))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("BASELINE_PATH", "baseline.json")])).unwrap();
        assert_eq!(config.baseline_path, PathBuf::from("baseline.json"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.drift, DriftConfig::default());
        assert!(config.max_concurrent_scoring >= 1);
    }

    #[test]
    fn test_missing_baseline_path() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("BASELINE_PATH"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("BASELINE_PATH", "/data/b.json"),
            ("WARNING_THRESHOLD", "0.1"),
            ("CRITICAL_THRESHOLD", "0.3"),
            ("PSI_BUCKETS", "20"),
            ("SCORING_FAILURE_SEVERITY", "warning"),
            ("MAX_CONCURRENT_SCORING", "2"),
            ("PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(config.drift.thresholds.warning_threshold, 0.1);
        assert_eq!(config.drift.thresholds.critical_threshold, 0.3);
        assert_eq!(config.drift.psi_buckets, 20);
        assert_eq!(config.drift.failure_severity, Severity::Warning);
        assert_eq!(config.max_concurrent_scoring, 2);
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        for (key, value) in [
            ("WARNING_THRESHOLD", "abc"),
            ("CRITICAL_THRESHOLD", "0.1"),
            ("PSI_BUCKETS", "0"),
            ("PSI_BUCKETS", "18446744073709551615"),
            ("SCORING_FAILURE_SEVERITY", "panic"),
            ("MAX_CONCURRENT_SCORING", "0"),
            ("PORT", "99999"),
        ] {
            let result = Config::from_lookup(lookup(&[("BASELINE_PATH", "b.json"), (key, value)]));
            assert!(result.is_err(), "{}={} should be rejected", key, value);
        }
    }
}
