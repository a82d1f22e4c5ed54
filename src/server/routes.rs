//! Job API handlers

use crate::jobs::Job;
use crate::server::error::{ApiError, ApiResult};
use crate::server::AppState;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

const INVALID_CREATOR: &str =
    "Invalid creator name. Use the itch.io username (letters, numbers, hyphens).";

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub creator: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub job_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// POST /api/scrape -- validates the creator and starts a job
pub async fn start_scrape(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> ApiResult<Json<ScrapeResponse>> {
    let job_id = state.runner.start(&request.creator).map_err(|e| {
        tracing::debug!("Rejected scrape request: {}", e);
        ApiError::BadRequest(INVALID_CREATOR.to_string())
    })?;

    Ok(Json(ScrapeResponse { job_id }))
}

/// GET /api/status/{job_id} -- returns a snapshot of the job
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<Job>> {
    state
        .runner
        .registry()
        .get(&job_id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))
}

/// GET /api/download/{job_id} -- streams the finished archive
pub async fn download_archive(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let archive = state
        .runner
        .registry()
        .get(&job_id)
        .and_then(|job| job.archive)
        .ok_or_else(|| ApiError::NotFound("Zip not ready".to_string()))?;

    let file = match tokio::fs::File::open(&archive).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound("Zip file missing".to_string()));
        }
        Err(e) => return Err(ApiError::Internal(e.to_string())),
    };
    let file_size = file
        .metadata()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .len();

    let file_name = archive
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}.zip", job_id));

    Ok((
        [
            (CONTENT_TYPE, "application/zip".to_string()),
            (CONTENT_LENGTH, file_size.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        Body::from_stream(ReaderStream::new(file)),
    ))
}

/// GET /health -- liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
