//! Error handling

use thiserror::Error;

pub type DeployResult<T> = Result<T, DeployError>;

#[derive(Debug, Error)]
pub enum DeployError {
    // Configuration errors
    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    InvalidEnv { key: &'static str, reason: String },

    // Evaluation errors
    #[error("Failed to read evaluation metrics {path}: {reason}")]
    Metrics { path: String, reason: String },

    #[error("Model file not found at {0}")]
    ModelNotFound(String),

    #[error("Model accuracy {accuracy:.3} below deployment gate {minimum:.3}")]
    AccuracyGate { accuracy: f64, minimum: f64 },

    // Step errors
    #[error("Deployment failed: {0}")]
    Deploy(String),

    #[error("Missing 'deployment_id' in response")]
    MissingDeploymentId,

    #[error("Failed to update database: {0}")]
    Registry(#[from] sqlx::Error),

    #[error("Failed to send notification: {0}")]
    Notify(String),
}
