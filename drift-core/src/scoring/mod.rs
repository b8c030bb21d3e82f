//! Drift Scorers
//!
//! - `numeric`: Population Stability Index over baseline quantile buckets
//! - `categorical`: 1 - p-value of a chi-square independence test
//! - `special`: incomplete gamma function backing the chi-square p-value

pub mod categorical;
pub mod numeric;
pub mod special;

pub use categorical::{CategoryCounts, ChiSquareOutcome};
pub use numeric::QuantileBuckets;
