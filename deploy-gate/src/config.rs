//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::error::{DeployError, DeployResult};

pub const DEFAULT_API_BASE: &str = "http://ml-api.company.com";
pub const DEFAULT_MIN_ACCURACY: f64 = 0.75;

/// Deployment configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Bearer token for the deployment API
    pub api_key: String,

    /// Postgres URL of the deployment registry
    pub database_url: String,

    pub api_base: String,

    /// Model artifact handed to the deployment API
    pub model_path: PathBuf,

    /// Short commit hash
    pub version: String,

    pub min_accuracy: f64,

    /// Chat webhook; notification is skipped when unset
    pub slack_webhook: Option<String>,
}

impl GateConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> DeployResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> DeployResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(DeployError::MissingEnv(key))
        };

        let min_accuracy = match lookup("MIN_ACCURACY") {
            Some(raw) => {
                let value: f64 = raw.trim().parse().map_err(|_| DeployError::InvalidEnv {
                    key: "MIN_ACCURACY",
                    reason: format!("'{}' is not a number", raw),
                })?;
                if !(0.0..=1.0).contains(&value) {
                    return Err(DeployError::InvalidEnv {
                        key: "MIN_ACCURACY",
                        reason: format!("{} is outside [0, 1]", value),
                    });
                }
                value
            }
            None => DEFAULT_MIN_ACCURACY,
        };

        let version = lookup("GITHUB_SHA")
            .filter(|sha| !sha.is_empty())
            .map(|sha| sha.chars().take(8).collect())
            .unwrap_or_else(|| "unknown".to_string());

        Ok(Self {
            api_key: required("API_KEY")?,
            database_url: required("DATABASE_URL")?,
            api_base: lookup("DEPLOY_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model_path: PathBuf::from(required("MODEL_PATH")?),
            version,
            min_accuracy,
            slack_webhook: lookup("SLACK_WEBHOOK").filter(|url| !url.is_empty()),
        })
    }
}
