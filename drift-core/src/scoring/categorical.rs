//! Categorical Drift Scorer - chi-square test of independence
//!
//! Rows are (baseline, incoming), columns are the union of observed labels.
//! No continuity correction. Score is `1 - p_value`.

use std::collections::BTreeMap;

use crate::error::DriftError;
use super::special::chi_square_sf;

/// Label frequencies of one sample
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    counts: BTreeMap<String, u64>,
    total: u64,
}

impl CategoryCounts {
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self::default();
        for label in labels {
            out.add(label.as_ref());
        }
        out
    }

    pub fn add(&mut self, label: &str) {
        *self.counts.entry(label.to_string()).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn get(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquareOutcome {
    pub statistic: f64,
    pub dof: usize,
    pub p_value: f64,
}

/// Pearson chi-square over the 2 x k table built from two samples
pub fn chi_square_test(
    baseline: &CategoryCounts,
    incoming: &CategoryCounts,
) -> Result<ChiSquareOutcome, DriftError> {
    if baseline.total() == 0 || incoming.total() == 0 {
        return Err(DriftError::Indeterminate(
            "contingency table has fewer than two non-empty rows".to_string(),
        ));
    }

    let mut labels: Vec<&str> = baseline.categories().chain(incoming.categories()).collect();
    labels.sort_unstable();
    labels.dedup();
    if labels.len() < 2 {
        return Err(DriftError::Indeterminate(
            "contingency table has fewer than two non-empty columns".to_string(),
        ));
    }

    let rows = [baseline, incoming];
    let grand_total = (baseline.total() + incoming.total()) as f64;

    let mut statistic = 0.0;
    for label in &labels {
        let column_total = (baseline.get(label) + incoming.get(label)) as f64;
        for row in rows {
            let expected = row.total() as f64 * column_total / grand_total;
            if expected <= 0.0 {
                return Err(DriftError::Indeterminate(format!(
                    "zero expected frequency for category '{}'",
                    label
                )));
            }
            let observed = row.get(label) as f64;
            statistic += (observed - expected).powi(2) / expected;
        }
    }

    let dof = labels.len() - 1;
    Ok(ChiSquareOutcome { statistic, dof, p_value: chi_square_sf(statistic, dof) })
}

/// Drift score from pre-counted samples
pub fn score_counts(baseline: &CategoryCounts, incoming: &CategoryCounts) -> Result<f64, DriftError> {
    let outcome = chi_square_test(baseline, incoming)?;
    Ok(1.0 - outcome.p_value)
}

pub fn score<S: AsRef<str>>(baseline: &[S], incoming: &[S]) -> Result<f64, DriftError> {
    score_counts(
        &CategoryCounts::from_labels(baseline),
        &CategoryCounts::from_labels(incoming),
    )
}
