//! Prediction monitoring handler

use axum::{extract::State, Json};
use drift_core::{DriftReport, Observation};
use validator::Validate;

use crate::models::PredictRequest;
use crate::{AppError, AppResult, AppState};

/// Score one observation against the active baseline
pub async fn predict(
    State(state): State<AppState>,
    Json(payload): Json<PredictRequest>,
) -> AppResult<Json<DriftReport>> {
    payload.validate()?;
    let observation = Observation::from(payload);

    let permit = state
        .scoring_slots
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| AppError::InternalError("scoring pool closed".to_string()))?;

    // Snapshot taken once; a concurrent reload does not affect this request
    let store = state.baseline.current();
    let engine = state.engine.clone();

    let report = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        engine.score(&store, &observation)
    })
    .await?;

    Ok(Json(report))
}
