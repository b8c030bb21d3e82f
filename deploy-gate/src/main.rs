//! Model Deployment Gate
//!
//! Deploys a candidate model only when its offline accuracy clears the gate,
//! then records the deployment and announces it.
//!
//! Usage:
//!   deploy-gate --env staging --metrics eval/metrics.json

mod api;
mod config;
mod error;
mod metrics;
mod notify;
mod pipeline;
mod registry;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::HttpDeployApi;
use crate::config::GateConfig;
use crate::error::DeployResult;
use crate::metrics::EvaluationMetrics;
use crate::notify::SlackNotifier;
use crate::pipeline::{Environment, Pipeline};
use crate::registry::PgRegistry;

/// Gate and deploy a trained model
#[derive(Parser, Debug)]
#[command(name = "deploy-gate")]
#[command(about = "Deploy a model when its evaluation clears the accuracy gate")]
struct Args {
    /// Target environment
    #[arg(long, value_enum, default_value_t = Environment::Production)]
    env: Environment,

    /// Evaluation metrics JSON ({ accuracy, precision, recall })
    #[arg(long)]
    metrics: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "deploy_gate=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    tracing::info!("Starting model deployment for environment: {}", args.env);

    match run(args).await {
        Ok(()) => {
            tracing::info!("Deployment process completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> DeployResult<()> {
    let config = GateConfig::from_env()?;
    let metrics = EvaluationMetrics::load(&args.metrics)?;

    let pipeline = Pipeline {
        api: HttpDeployApi::new(&config.api_base, &config.api_key)?,
        registry: PgRegistry::connect_lazy(&config.database_url)?,
        notifier: SlackNotifier::new(config.slack_webhook.clone()),
        min_accuracy: config.min_accuracy,
        model_path: config.model_path.clone(),
        version: config.version.clone(),
    };

    pipeline.run(args.env, metrics).await?;
    Ok(())
}
