use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scoring::{CategoryCounts, QuantileBuckets};

// ============================================================================
// FEATURE KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Numeric,
    Categorical,
}

impl FeatureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Numeric => "numeric",
            FeatureKind::Categorical => "categorical",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numeric" => Ok(FeatureKind::Numeric),
            "categorical" => Ok(FeatureKind::Categorical),
            other => Err(format!("unknown kind '{}'", other)),
        }
    }
}

// ============================================================================
// BASELINE DISTRIBUTION
// ============================================================================

/// Reference data for one tracked feature, prepared for scoring
#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    Numeric {
        /// Finite reference values, in source order
        values: Vec<f64>,
        buckets: QuantileBuckets,
    },
    Categorical {
        /// Reference labels, in source order
        values: Vec<String>,
        counts: CategoryCounts,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaselineDistribution {
    pub name: String,
    pub reference: Reference,
}

impl BaselineDistribution {
    pub fn kind(&self) -> FeatureKind {
        match self.reference {
            Reference::Numeric { .. } => FeatureKind::Numeric,
            Reference::Categorical { .. } => FeatureKind::Categorical,
        }
    }

    /// Number of usable reference values
    pub fn sample_size(&self) -> usize {
        match &self.reference {
            Reference::Numeric { values, .. } => values.len(),
            Reference::Categorical { values, .. } => values.len(),
        }
    }
}

// ============================================================================
// SUMMARY (for health/status output)
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct FeatureSummary {
    pub name: String,
    pub kind: FeatureKind,
    pub samples: usize,
}

impl From<&BaselineDistribution> for FeatureSummary {
    fn from(d: &BaselineDistribution) -> Self {
        Self {
            name: d.name.clone(),
            kind: d.kind(),
            samples: d.sample_size(),
        }
    }
}
