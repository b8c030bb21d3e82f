//! Numeric Drift Scorer - Population Stability Index
//!
//! Buckets come from baseline quantiles (linear interpolation between order
//! statistics). Bucket `i` is `[e_i, e_{i+1})` except the last, which is
//! closed on both ends. Values outside `[e_0, e_k]` land in no bucket but
//! still count toward the sample size.

use crate::error::DriftError;

/// Smoothing term keeping `ln` finite for empty buckets
pub const PSI_EPSILON: f64 = 1e-6;

/// Baseline quantile buckets, fitted once and reused for every request
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileBuckets {
    edges: Vec<f64>,
    expected: Vec<f64>,
}

impl QuantileBuckets {
    /// Fit `bucket_count` buckets to `reference`. Non-finite values are dropped.
    pub fn fit(reference: &[f64], bucket_count: usize) -> Result<Self, DriftError> {
        let sorted = finite_sorted(reference);
        if sorted.is_empty() {
            return Err(DriftError::InsufficientData(
                "baseline sample is empty after filtering non-finite values",
            ));
        }

        let bucket_count = bucket_count.max(1);
        let edges: Vec<f64> = (0..=bucket_count)
            .map(|q| percentile(&sorted, q, bucket_count))
            .collect();
        let expected = proportions(&bucket_counts(&sorted, &edges), sorted.len());

        Ok(Self { edges, expected })
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Baseline share of each bucket
    pub fn expected(&self) -> &[f64] {
        &self.expected
    }

    pub fn bucket_count(&self) -> usize {
        self.expected.len()
    }

    /// PSI of `incoming` against the fitted baseline
    pub fn psi(&self, incoming: &[f64]) -> Result<f64, DriftError> {
        let sorted = finite_sorted(incoming);
        if sorted.is_empty() {
            return Err(DriftError::InsufficientData(
                "incoming sample is empty after filtering non-finite values",
            ));
        }

        let actual = proportions(&bucket_counts(&sorted, &self.edges), sorted.len());
        let psi = self
            .expected
            .iter()
            .zip(actual.iter())
            .map(|(&e, &a)| (a - e) * ((a + PSI_EPSILON) / (e + PSI_EPSILON)).ln())
            .sum();
        Ok(psi)
    }
}

/// One-shot PSI without keeping the fitted buckets around
pub fn score(baseline: &[f64], incoming: &[f64], bucket_count: usize) -> Result<f64, DriftError> {
    QuantileBuckets::fit(baseline, bucket_count)?.psi(incoming)
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

fn finite_sorted(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    out.sort_by(f64::total_cmp);
    out
}

/// `q / k`-th quantile of a sorted, non-empty sample
fn percentile(sorted: &[f64], q: usize, k: usize) -> f64 {
    let last = sorted.len() - 1;
    let position = (q * last) as f64 / k as f64;
    let lo = position.floor() as usize;
    let hi = (lo + 1).min(last);
    let fraction = position - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * fraction
}

fn bucket_counts(sorted: &[f64], edges: &[f64]) -> Vec<usize> {
    let below = |x: f64| sorted.partition_point(|&v| v < x);
    let at_or_below = |x: f64| sorted.partition_point(|&v| v <= x);

    let buckets = edges.len() - 1;
    (0..buckets)
        .map(|i| {
            let upper = if i + 1 == buckets { at_or_below(edges[i + 1]) } else { below(edges[i + 1]) };
            upper.saturating_sub(below(edges[i]))
        })
        .collect()
}

fn proportions(counts: &[usize], total: usize) -> Vec<f64> {
    counts.iter().map(|&c| c as f64 / total as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linspace(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_edges_match_linear_percentiles() {
        let buckets = QuantileBuckets::fit(&linspace(11), 10).unwrap();
        assert_eq!(buckets.edges(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);

        let buckets = QuantileBuckets::fit(&[1.0, 2.0, 3.0, 4.0], 2).unwrap();
        assert_eq!(buckets.edges(), &[1.0, 2.5, 4.0]);
    }

    #[test]
    fn test_last_bucket_is_closed() {
        let buckets = QuantileBuckets::fit(&[1.0, 2.0, 3.0, 4.0], 2).unwrap();
        // [1, 2.5) holds 1 and 2; [2.5, 4] holds 3 and 4
        assert_eq!(buckets.expected(), &[0.5, 0.5]);
    }

    #[test]
    fn test_psi_identical_is_zero() {
        let data: Vec<f64> = (0..500).map(|i| ((i * 37) % 101) as f64 / 7.0).collect();
        let psi = score(&data, &data, 10).unwrap();
        assert!(psi.abs() < 1e-12);
    }

    #[test]
    fn test_psi_outside_range_is_large() {
        let baseline = linspace(100);
        let shifted: Vec<f64> = baseline.iter().map(|v| v + 1000.0).collect();
        let psi = score(&baseline, &shifted, 10).unwrap();
        assert!(psi > 0.5);
        // every expected share is 0.1 and every actual share is 0
        let expected = 10.0 * 0.1 * ((0.1 + PSI_EPSILON) / PSI_EPSILON).ln();
        assert!((psi - expected).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_values_are_discarded() {
        let baseline = linspace(50);
        let mut incoming = baseline.clone();
        incoming.push(f64::NAN);
        incoming.push(f64::INFINITY);
        incoming.push(f64::NEG_INFINITY);
        assert!(score(&baseline, &incoming, 10).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_empty_incoming_is_insufficient() {
        let err = score(&linspace(10), &[f64::NAN], 10).unwrap_err();
        assert!(matches!(err, DriftError::InsufficientData(_)));

        let err = score(&[], &[1.0], 10).unwrap_err();
        assert!(matches!(err, DriftError::InsufficientData(_)));
    }

    #[test]
    fn test_single_valued_baseline_collapses_edges() {
        let baseline = vec![3.0; 20];
        let buckets = QuantileBuckets::fit(&baseline, 10).unwrap();
        assert!(buckets.edges().iter().all(|&e| e == 3.0));
        // only the closed last bucket can hold anything
        assert_eq!(buckets.expected()[9], 1.0);

        assert!(buckets.psi(&[3.0, 3.0]).unwrap().abs() < 1e-12);
        assert!(buckets.psi(&[4.0]).unwrap() > 0.5);
    }
}
