//! HTTP job API
//!
//! Exposes harvest jobs over HTTP: start a job, poll its status, download
//! the finished archive.

mod error;
mod routes;

pub use error::{ApiError, ApiResult};
pub use routes::{HealthResponse, ScrapeRequest, ScrapeResponse};

use crate::config::Config;
use crate::crawler::Coordinator;
use crate::jobs::{JobRegistry, JobRunner};
use crate::HarvestError;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub runner: JobRunner,
}

impl AppState {
    pub fn new(runner: JobRunner) -> Self {
        Self { runner }
    }
}

/// Builds the application router with request tracing
///
/// Only the JSON API and health check are routed; there is no page at `/`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/scrape", post(routes::start_scrape))
        .route("/api/status/{job_id}", get(routes::job_status))
        .route("/api/download/{job_id}", get(routes::download_archive))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Binds the configured address and serves the job API until shutdown
pub async fn serve(config: &Config) -> Result<(), HarvestError> {
    tokio::fs::create_dir_all(&config.output.work_dir).await?;

    let runner = JobRunner::new(
        JobRegistry::new(),
        Coordinator::new(config)?,
        &config.output.work_dir,
    );
    let app = router(AppState::new(runner));

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
