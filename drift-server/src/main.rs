//! Drift Monitor Server
//!
//! HTTP front end for the drift scoring engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    DRIFT MONITOR                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────────┐  ┌─────────────────────┐ │
//! │  │  API      │  │  Scoring pool │  │  Metrics registry   │ │
//! │  │  (Axum)   │─▶│  (blocking)   │─▶│  (Prometheus text)  │ │
//! │  └─────┬─────┘  └───────┬───────┘  └─────────────────────┘ │
//! │        │                ▼                                   │
//! │        │         ┌─────────────┐                            │
//! │        └────────▶│  Baseline   │◀── BASELINE_PATH (JSON)    │
//! │         reload   └─────────────┘                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use drift_core::{BaselineHandle, BaselineStore, DriftEngine, DriftMetrics};
use tokio::sync::Semaphore;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "drift_server=debug,drift_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env().context("invalid configuration")?;

    tracing::info!("Drift Monitor starting...");
    tracing::info!("Baseline: {}", config.baseline_path.display());

    // Fatal if the baseline cannot be built
    let store = BaselineStore::load(&config.baseline_path, config.drift.psi_buckets)
        .with_context(|| format!("failed to load baseline {}", config.baseline_path.display()))?;
    tracing::info!("Loaded {} baseline features (sha256 {})", store.len(), store.digest());

    let state = AppState::new(config.clone(), store)?;
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DriftEngine>,
    pub metrics: Arc<DriftMetrics>,
    pub baseline: Arc<BaselineHandle>,
    pub config: config::Config,
    pub scoring_slots: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: config::Config, store: BaselineStore) -> anyhow::Result<Self> {
        let metrics = Arc::new(DriftMetrics::new()?);
        let engine = DriftEngine::new(config.drift.clone(), metrics.clone())?;

        Ok(Self {
            engine: Arc::new(engine),
            metrics,
            baseline: Arc::new(BaselineHandle::new(store)),
            scoring_slots: Arc::new(Semaphore::new(config.max_concurrent_scoring.max(1))),
            config,
        })
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let monitor_routes = Router::new()
        .route("/monitor/predict", post(handlers::monitor::predict))
        .route("/monitor/health", get(handlers::health::check))
        .route("/monitor/metrics", get(handlers::metrics::export))
        .route("/monitor/baseline/reload", post(handlers::baseline::reload));

    Router::new()
        .merge(monitor_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
