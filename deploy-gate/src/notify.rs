//! Chat notification (Slack-compatible webhook)

use serde_json::{json, Value};

use crate::error::{DeployError, DeployResult};
use crate::pipeline::{Deployment, Notifier};

pub struct SlackNotifier {
    webhook: Option<String>,
    http_client: reqwest::Client,
}

impl SlackNotifier {
    pub fn new(webhook: Option<String>) -> Self {
        Self {
            webhook,
            http_client: reqwest::Client::new(),
        }
    }
}

fn message(deployment: &Deployment) -> Value {
    let text = format!(
        "*Model Deployment*\nEnvironment: {}\nDeployment ID: {}\nAccuracy: {:.3}\nPrecision: {:.3}\nRecall: {:.3}",
        deployment.environment,
        deployment.id,
        deployment.metrics.accuracy,
        deployment.metrics.precision,
        deployment.metrics.recall,
    );

    json!({
        "text": "Model deployed successfully!",
        "blocks": [
            { "type": "section", "text": { "type": "mrkdwn", "text": text } }
        ]
    })
}

impl Notifier for SlackNotifier {
    async fn notify(&self, deployment: &Deployment) -> DeployResult<()> {
        let Some(webhook) = &self.webhook else {
            tracing::warn!("SLACK_WEBHOOK not set; skipping notification");
            return Ok(());
        };

        let response = self
            .http_client
            .post(webhook)
            .json(&message(deployment))
            .send()
            .await
            .map_err(|e| DeployError::Notify(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DeployError::Notify(format!("webhook returned {}", response.status())));
        }

        tracing::info!("Notification sent");
        Ok(())
    }
}
