//! CallBreach HTTP Server
//!
//! Hosts many isolated scan sessions over HTTP. Each session owns its own
//! capture window and findings; nothing is persisted.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   CALLBREACH SERVER                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────────┐  ┌──────────────────┐  │
//! │  │  API      │  │  Session Store   │  │  Reaper          │  │
//! │  │  (Axum)   │──│  RwLock<HashMap> │──│  (TTL purge)     │  │
//! │  └───────────┘  └────────┬─────────┘  └──────────────────┘  │
//! │                          ▼                                  │
//! │                 ┌─────────────────┐                         │
//! │                 │ callbreach-core │                         │
//! │                 └─────────────────┘                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;
mod store;


use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use callbreach_core::ExposurePolicy;

pub use error::{AppError, AppResult};
use store::SessionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "callbreach_server=debug,callbreach_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();

    tracing::info!("CallBreach Server starting ({})...", config.environment);

    let policy = match &config.policy_file {
        Some(path) => ExposurePolicy::load(path)
            .with_context(|| format!("loading policy from {}", path.display()))?,
        None => {
            if config.is_production() {
                tracing::warn!("No POLICY_FILE set in production, using built-in policy");
            }
            ExposurePolicy::default()
        }
    };
    tracing::info!(
        "Policy: thresholds {}/{}, window {} ms, max {} sessions",
        policy.thresholds.low,
        policy.thresholds.high,
        policy.capture.window_ms,
        config.max_sessions
    );

    // Build application state
    let state = AppState::new(config.clone(), policy);

    spawn_reaper(state.sessions.clone(), Duration::from_secs(config.session_ttl_secs));

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub policy: Arc<ExposurePolicy>,
    pub config: config::Config,
}

impl AppState {
    pub fn new(config: config::Config, policy: ExposurePolicy) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new(config.max_sessions)),
            policy: Arc::new(policy),
            config,
        }
    }
}

/// Periodically drop sessions past their TTL
fn spawn_reaper(sessions: Arc<SessionStore>, ttl: Duration) {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(60));
        loop {
            tick.tick().await;
            let purged = sessions.purge_older_than(ttl);
            if purged > 0 {
                tracing::info!("Purged {} expired scans", purged);
            }
        }
    });
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let scan_routes = Router::new()
        .route("/api/v1/scans", post(handlers::scans::create))
        .route("/api/v1/scans/:id", get(handlers::scans::get).delete(handlers::scans::abandon))
        .route("/api/v1/scans/:id/candidates", post(handlers::scans::push_candidates))
        .route("/api/v1/scans/:id/close", post(handlers::scans::close))
        .route("/api/v1/scans/:id/provisional", get(handlers::scans::provisional));

    let stateless_routes = Router::new()
        .route("/api/v1/flows/analyze", post(handlers::flows::analyze))
        .route("/api/v1/records/score", post(handlers::records::score))
        .route("/api/v1/simulations", get(handlers::simulations::list))
        .route("/api/v1/simulations/:dataset", get(handlers::simulations::run));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health::check))
        .merge(scan_routes)
        .merge(stateless_routes)
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
