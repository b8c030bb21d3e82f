//! Severity Classifier
//!
//! Maps a drift score onto normal < warning < critical using two ordered
//! thresholds, and folds per-feature severities into one verdict.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ============================================================================
// CONSTANTS
// ============================================================================

pub const DEFAULT_WARNING_THRESHOLD: f64 = 0.2;
pub const DEFAULT_CRITICAL_THRESHOLD: f64 = 0.5;

// ============================================================================
// SEVERITY
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Severity::Normal),
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            other => Err(ConfigError::invalid("severity", format!("unknown severity '{}'", other))),
        }
    }
}

/// Highest severity in the set; `Normal` when nothing was scored
pub fn aggregate<I>(severities: I) -> Severity
where
    I: IntoIterator<Item = Severity>,
{
    severities.into_iter().max().unwrap_or_default()
}

// ============================================================================
// THRESHOLDS
// ============================================================================

/// Threshold Configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Scores strictly above this are at least `Warning`
    pub warning_threshold: f64,

    /// Scores strictly above this are `Critical`
    pub critical_threshold: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
        }
    }
}

impl ThresholdConfig {
    pub fn new(warning_threshold: f64, critical_threshold: f64) -> Result<Self, ConfigError> {
        let config = Self { warning_threshold, critical_threshold };
        config.validate()?;
        Ok(config)
    }

    /// Enforce `0 <= warning < critical`, both finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.warning_threshold.is_finite() || self.warning_threshold < 0.0 {
            return Err(ConfigError::invalid(
                "warning_threshold",
                format!("{} is not a finite non-negative number", self.warning_threshold),
            ));
        }
        if !self.critical_threshold.is_finite() {
            return Err(ConfigError::invalid(
                "critical_threshold",
                format!("{} is not finite", self.critical_threshold),
            ));
        }
        if self.warning_threshold >= self.critical_threshold {
            return Err(ConfigError::invalid(
                "critical_threshold",
                format!(
                    "must be greater than warning_threshold ({} >= {})",
                    self.warning_threshold, self.critical_threshold
                ),
            ));
        }
        Ok(())
    }

    pub fn classify(&self, score: f64) -> Severity {
        if score > self.critical_threshold {
            Severity::Critical
        } else if score > self.warning_threshold {
            Severity::Warning
        } else {
            Severity::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries_are_exclusive() {
        let t = ThresholdConfig::default();
        assert_eq!(t.classify(0.0), Severity::Normal);
        assert_eq!(t.classify(0.2), Severity::Normal);
        assert_eq!(t.classify(0.2001), Severity::Warning);
        assert_eq!(t.classify(0.5), Severity::Warning);
        assert_eq!(t.classify(0.5001), Severity::Critical);
        assert_eq!(t.classify(12.0), Severity::Critical);
    }

    #[test]
    fn test_classify_is_monotonic() {
        let t = ThresholdConfig::new(0.1, 0.3).unwrap();
        let scores: Vec<f64> = (0..200).map(|i| i as f64 * 0.005).collect();
        for pair in scores.windows(2) {
            assert!(t.classify(pair[0]) <= t.classify(pair[1]));
        }
    }

    #[test]
    fn test_aggregate() {
        assert_eq!(aggregate(Vec::<Severity>::new()), Severity::Normal);
        assert_eq!(aggregate([Severity::Normal, Severity::Warning]), Severity::Warning);
        assert_eq!(
            aggregate([Severity::Normal, Severity::Critical, Severity::Warning]),
            Severity::Critical
        );
    }

    #[test]
    fn test_threshold_validation() {
        assert!(ThresholdConfig::new(0.0, 0.1).is_ok());
        assert!(ThresholdConfig::new(0.5, 0.5).is_err());
        assert!(ThresholdConfig::new(0.6, 0.5).is_err());
        assert!(ThresholdConfig::new(-0.1, 0.5).is_err());
        assert!(ThresholdConfig::new(0.2, f64::INFINITY).is_err());
        assert!(ThresholdConfig::new(f64::NAN, 0.5).is_err());
    }

    #[test]
    fn test_severity_parse_and_serde() {
        assert_eq!("Critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert!("unknown".parse::<Severity>().is_err());
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
        assert!(Severity::Normal < Severity::Warning && Severity::Warning < Severity::Critical);
    }
}
