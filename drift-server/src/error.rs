//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    // Request errors
    #[error("{0}")]
    ValidationError(String),

    // Baseline reload errors
    #[error("{0}")]
    BaselineRejected(String),

    // Generic errors
    #[error("{0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::BaselineRejected(msg) => {
                tracing::warn!("Baseline reload rejected: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, msg.as_str())
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<drift_core::BaselineError> for AppError {
    fn from(err: drift_core::BaselineError) -> Self {
        AppError::BaselineRejected(err.to_string())
    }
}

impl From<drift_core::MetricsError> for AppError {
    fn from(err: drift_core::MetricsError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("scoring task failed: {}", err))
    }
}
