//! Metrics exposition handler

use axum::{extract::State, http::header, response::IntoResponse};
use drift_core::metrics::CONTENT_TYPE;

use crate::{AppResult, AppState};

pub async fn export(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let body = state.metrics.render()?;
    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], body))
}
