//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::models::BaselineStatus;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    drift_detection_status: &'static str,
    version: &'static str,
    timestamp: i64,
    baseline: BaselineStatus,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.baseline.current();
    Json(HealthResponse {
        status: "healthy",
        drift_detection_status: "running",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        baseline: BaselineStatus::from(store.as_ref()),
    })
}
