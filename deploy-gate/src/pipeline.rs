//! Deployment pipeline
//!
//! Gate, deploy, register, notify. Each step runs only after the previous
//! one succeeded and nothing is rolled back on a later failure.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::error::{DeployError, DeployResult};
use crate::metrics::EvaluationMetrics;

/// Target environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload sent to the deployment API
#[derive(Debug, Clone, Serialize)]
pub struct DeployRequest {
    pub model_path: String,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub version: String,
    pub environment: Environment,
    pub deployed_at: DateTime<Utc>,
}

/// A deployment accepted by the API
#[derive(Debug, Clone, PartialEq)]
pub struct Deployment {
    pub id: String,
    pub version: String,
    pub environment: Environment,
    pub metrics: EvaluationMetrics,
    pub deployed_at: DateTime<Utc>,
}

pub trait DeployApi {
    /// Returns the `deployment_id` assigned by the API
    async fn deploy(&self, request: &DeployRequest) -> DeployResult<String>;
}

pub trait DeploymentRegistry {
    async fn register(&self, deployment: &Deployment) -> DeployResult<()>;
}

pub trait Notifier {
    async fn notify(&self, deployment: &Deployment) -> DeployResult<()>;
}

pub struct Pipeline<A, R, N> {
    pub api: A,
    pub registry: R,
    pub notifier: N,
    pub min_accuracy: f64,
    pub model_path: PathBuf,
    pub version: String,
}

impl<A, R, N> Pipeline<A, R, N>
where
    A: DeployApi,
    R: DeploymentRegistry,
    N: Notifier,
{
    pub async fn run(
        &self,
        environment: Environment,
        metrics: EvaluationMetrics,
    ) -> DeployResult<Deployment> {
        tracing::info!(
            "Model Performance: Accuracy={:.3}, Precision={:.3}, Recall={:.3}",
            metrics.accuracy,
            metrics.precision,
            metrics.recall
        );

        if metrics.accuracy < self.min_accuracy {
            tracing::warn!("Model accuracy too low for deployment");
            return Err(DeployError::AccuracyGate {
                accuracy: metrics.accuracy,
                minimum: self.min_accuracy,
            });
        }

        if !self.model_path.exists() {
            return Err(DeployError::ModelNotFound(self.model_path.display().to_string()));
        }

        let request = DeployRequest {
            model_path: self.model_path.display().to_string(),
            accuracy: metrics.accuracy,
            precision: metrics.precision,
            recall: metrics.recall,
            version: self.version.clone(),
            environment,
            deployed_at: Utc::now(),
        };

        let id = self.api.deploy(&request).await?;
        if id.is_empty() {
            return Err(DeployError::MissingDeploymentId);
        }
        tracing::info!("Model deployed successfully with ID: {}", id);

        let deployment = Deployment {
            id,
            version: request.version,
            environment,
            metrics,
            deployed_at: request.deployed_at,
        };

        self.registry.register(&deployment).await?;
        tracing::info!("Database updated successfully");

        self.notifier.notify(&deployment).await?;

        Ok(deployment)
    }
}
