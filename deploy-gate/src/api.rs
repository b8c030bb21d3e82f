//! Deployment API client

use std::time::Duration;

use serde::Deserialize;

use crate::error::{DeployError, DeployResult};
use crate::pipeline::{DeployApi, DeployRequest};

const DEPLOY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct DeployResponse {
    #[serde(default)]
    deployment_id: Option<String>,
}

/// Deployment API over HTTP
pub struct HttpDeployApi {
    base_url: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl HttpDeployApi {
    pub fn new(base_url: &str, api_key: &str) -> DeployResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEPLOY_TIMEOUT_SECS))
            .build()
            .map_err(|e| DeployError::Deploy(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http_client,
        })
    }

    fn endpoint(&self, request: &DeployRequest) -> String {
        format!("{}/{}/deploy", self.base_url, request.environment)
    }
}

impl DeployApi for HttpDeployApi {
    async fn deploy(&self, request: &DeployRequest) -> DeployResult<String> {
        let url = self.endpoint(request);
        tracing::debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| DeployError::Deploy(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeployError::Deploy(format!("{} {}", status, body)));
        }

        let body: DeployResponse = response
            .json()
            .await
            .map_err(|e| DeployError::Deploy(format!("invalid response: {}", e)))?;

        body.deployment_id
            .filter(|id| !id.is_empty())
            .ok_or(DeployError::MissingDeploymentId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Environment;
    use chrono::Utc;

    #[test]
    fn test_endpoint_per_environment() {
        let api = HttpDeployApi::new("http://ml-api.company.com/", "key").unwrap();
        let mut request = DeployRequest {
            model_path: "model.pkl".into(),
            accuracy: 0.9,
            precision: 0.9,
            recall: 0.9,
            version: "unknown".into(),
            environment: Environment::Staging,
            deployed_at: Utc::now(),
        };
        assert_eq!(api.endpoint(&request), "http://ml-api.company.com/staging/deploy");

        request.environment = Environment::Production;
        assert_eq!(api.endpoint(&request), "http://ml-api.company.com/production/deploy");
    }

    #[test]
    fn test_response_without_id() {
        let body: DeployResponse = serde_json::from_str(r#"{ "status": "ok" }"#).unwrap();
        assert!(body.deployment_id.is_none());
    }
}
