//! Baseline Module - Reference distributions for drift scoring
//!
//! Holds one `BaselineDistribution` per tracked feature.
//!
//! # Architecture
//! - `types.rs`: `FeatureKind`, `BaselineDistribution`, `Reference`
//! - `validate.rs`: kind inference / declared-kind checks
//! - `storage.rs`: source parsing and digest
//!
//! # Failure Strategy
//! Any load failure is returned to the caller, which cannot serve traffic
//! without a baseline. A store is never mutated after construction; refresh
//! means building a new store and swapping it into a `BaselineHandle`.

pub mod storage;
pub mod types;
pub mod validate;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::BaselineError;
use crate::observation::{category_labels, numeric_values};
use crate::scoring::{CategoryCounts, QuantileBuckets};

pub use types::{BaselineDistribution, FeatureKind, FeatureSummary, Reference};

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Clone)]
pub struct BaselineStore {
    features: BTreeMap<String, BaselineDistribution>,
    digest: String,
    loaded_at: DateTime<Utc>,
}

impl BaselineStore {
    /// Load from a JSON file, precomputing numeric buckets
    pub fn load(path: &Path, psi_buckets: usize) -> Result<Self, BaselineError> {
        let bytes = storage::read_source(path)?;
        let store = Self::from_slice(&bytes, psi_buckets)?;
        log::info!(
            "Loaded baseline {} ({} features, sha256 {})",
            path.display(),
            store.len(),
            &store.digest[..12]
        );
        Ok(store)
    }

    pub fn from_slice(bytes: &[u8], psi_buckets: usize) -> Result<Self, BaselineError> {
        let raw = storage::parse_features(bytes)?;

        let mut features = BTreeMap::new();
        for feature in raw {
            let reference = match feature.kind {
                FeatureKind::Numeric => {
                    let values: Vec<f64> = feature.values.iter().flat_map(numeric_values).collect();
                    let buckets = QuantileBuckets::fit(&values, psi_buckets)
                        .map_err(|e| BaselineError::unclassifiable(&feature.name, e.to_string()))?;
                    Reference::Numeric { values, buckets }
                }
                FeatureKind::Categorical => {
                    let values: Vec<String> = feature.values.iter().flat_map(category_labels).collect();
                    let counts = CategoryCounts::from_labels(&values);
                    Reference::Categorical { values, counts }
                }
            };
            log::debug!("Baseline feature '{}' ({})", feature.name, feature.kind);
            features.insert(
                feature.name.clone(),
                BaselineDistribution { name: feature.name, reference },
            );
        }

        Ok(Self {
            features,
            digest: storage::digest(bytes),
            loaded_at: Utc::now(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&BaselineDistribution> {
        self.features.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BaselineDistribution> {
        self.features.values()
    }

    /// Hex SHA-256 of the source this store was built from
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn summary(&self) -> Vec<FeatureSummary> {
        self.iter().map(FeatureSummary::from).collect()
    }
}

// ============================================================================
// HANDLE (atomic swap)
// ============================================================================

/// Shared pointer to the active store. Readers clone the `Arc` and keep a
/// consistent snapshot; `replace` swaps the whole store at once.
#[derive(Debug)]
pub struct BaselineHandle {
    current: RwLock<Arc<BaselineStore>>,
}

impl BaselineHandle {
    pub fn new(store: BaselineStore) -> Self {
        Self { current: RwLock::new(Arc::new(store)) }
    }

    pub fn current(&self) -> Arc<BaselineStore> {
        self.current.read().clone()
    }

    /// Install `store`, returning the one it replaced
    pub fn replace(&self, store: BaselineStore) -> Arc<BaselineStore> {
        let next = Arc::new(store);
        let previous = std::mem::replace(&mut *self.current.write(), next);
        log::info!(
            "Baseline swapped: sha256 {} -> {}",
            &previous.digest()[..12],
            &self.current().digest()[..12]
        );
        previous
    }
}
