//! Baseline reload handler

use axum::{extract::State, Json};
use drift_core::BaselineStore;

use crate::models::{BaselineStatus, ReloadResponse};
use crate::{AppResult, AppState};

/// Rebuild the store from `BASELINE_PATH` and swap it in.
/// On failure the active store is left untouched.
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let path = state.config.baseline_path.clone();
    let buckets = state.config.drift.psi_buckets;

    let store = tokio::task::spawn_blocking(move || BaselineStore::load(&path, buckets)).await??;
    let previous = state.baseline.replace(store);
    let current = state.baseline.current();

    tracing::info!(
        "Baseline reloaded from {} ({} features)",
        state.config.baseline_path.display(),
        current.len()
    );

    Ok(Json(ReloadResponse {
        previous_digest: previous.digest().to_string(),
        baseline: BaselineStatus::from(current.as_ref()),
    }))
}
