//! Baseline status model

use chrono::{DateTime, Utc};
use drift_core::baseline::FeatureSummary;
use drift_core::BaselineStore;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BaselineStatus {
    pub digest: String,
    pub loaded_at: DateTime<Utc>,
    pub features: Vec<FeatureSummary>,
}

impl From<&BaselineStore> for BaselineStatus {
    fn from(store: &BaselineStore) -> Self {
        Self {
            digest: store.digest().to_string(),
            loaded_at: store.loaded_at(),
            features: store.summary(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub previous_digest: String,
    pub baseline: BaselineStatus,
}
