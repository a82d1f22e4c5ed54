//! Job API tests driven through the router with `oneshot`

use crate::common::{create_test_config, listing_html, mount_asset, mount_listing, mount_project, project_html};
use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use itch_harvest::crawler::Coordinator;
use itch_harvest::jobs::{JobRegistry, JobRunner};
use itch_harvest::server::{router, AppState};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::MockServer;

fn build_test_app(server: &MockServer, work_dir: &Path) -> Router {
    let config = create_test_config(server);
    let runner = JobRunner::new(
        JobRegistry::new(),
        Coordinator::new(&config).unwrap(),
        work_dir,
    );
    router(AppState::new(runner))
}

async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Polls the status endpoint until the job leaves `running`
async fn wait_for_job(app: &Router, job_id: &str) -> Value {
    for _ in 0..200 {
        let status = body_json(get(app, &format!("/api/status/{}", job_id)).await).await;
        if status["status"] != "running" {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("job {} did not finish", job_id);
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let app = build_test_app(&server, dir.path());

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_root_page_is_not_served() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let app = build_test_app(&server, dir.path());

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_scrape_rejects_invalid_creator() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let app = build_test_app(&server, dir.path());

    for creator in ["", "../etc", "bad name"] {
        let response = post_json(&app, "/api/scrape", serde_json::json!({ "creator": creator })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert!(json["detail"]
            .as_str()
            .unwrap()
            .starts_with("Invalid creator name"));
    }
}

#[tokio::test]
async fn test_unknown_job_is_404() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let app = build_test_app(&server, dir.path());

    let response = get(&app, "/api/status/000000000000").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["detail"], "Job not found");

    let response = get(&app, "/api/download/000000000000").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["detail"], "Zip not ready");
}

#[tokio::test]
async fn test_job_lifecycle_and_download() {
    let server = MockServer::start().await;
    mount_listing(&server, "dev", 1, listing_html(&server, &["game"], false)).await;
    mount_project(
        &server,
        "game",
        project_html(&server, "Game", "/img/cover.png", &[]),
    )
    .await;
    mount_asset(&server, "/img/cover.png", 200, b"cover").await;

    let dir = TempDir::new().unwrap();
    let app = build_test_app(&server, dir.path());

    let response = post_json(&app, "/api/scrape", serde_json::json!({ "creator": " Dev " })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let job_id = body_json(response).await["job_id"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(job_id.len(), 12);

    let status = wait_for_job(&app, &job_id).await;
    assert_eq!(status["status"], "done");
    assert_eq!(status["total"], 1);
    assert_eq!(status["progress"], serde_json::json!(["Game"]));
    assert!(status["error"].is_null());
    assert!(status["zip"].as_str().unwrap().ends_with("dev_itch.zip"));
    assert!(dir.path().join(&job_id).join("dev").join("index.json").exists());

    let response = get(&app, &format!("/api/download/{}", job_id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/zip"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"dev_itch.zip\""
    );
    let archive = status["zip"].as_str().unwrap().to_string();
    let on_disk = std::fs::read(&archive).unwrap();
    assert_eq!(
        response.headers()[header::CONTENT_LENGTH],
        on_disk.len().to_string().as_str()
    );
    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"PK"));
    assert_eq!(bytes, on_disk);

    std::fs::remove_file(&archive).unwrap();
    let response = get(&app, &format!("/api/download/{}", job_id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["detail"], "Zip file missing");
}

#[tokio::test]
async fn test_failed_job_reports_error() {
    let server = MockServer::start().await;
    mount_listing(&server, "nobody", 1, listing_html(&server, &[], false)).await;

    let dir = TempDir::new().unwrap();
    let app = build_test_app(&server, dir.path());

    let response = post_json(&app, "/api/scrape", serde_json::json!({ "creator": "nobody" })).await;
    let job_id = body_json(response).await["job_id"]
        .as_str()
        .unwrap()
        .to_string();

    let status = wait_for_job(&app, &job_id).await;
    assert_eq!(status["status"], "error");
    assert_eq!(status["error"], "No public projects found for 'nobody'");
    assert!(status["zip"].is_null());

    let response = get(&app, &format!("/api/download/{}", job_id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
