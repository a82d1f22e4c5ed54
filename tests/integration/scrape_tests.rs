//! End-to-end harvests against a mock storefront

use crate::common::{
    create_test_config, listing_html, mount_asset, mount_listing, mount_page, mount_project,
    mount_slow_asset, project_html, RecordingSink,
};
use itch_harvest::crawler::{build_http_client, discover_project_urls, RequestLimiter};
use itch_harvest::output::{read_index, read_metadata};
use itch_harvest::{scrape_creator, HarvestError, JobRegistry, JobStatus, ProgressEvent};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::MockServer;

#[tokio::test]
async fn test_two_page_listing_harvest() {
    let server = MockServer::start().await;

    mount_listing(&server, "dev", 1, listing_html(&server, &["alpha"], true)).await;
    mount_listing(&server, "dev", 2, listing_html(&server, &["beta"], false)).await;
    mount_project(
        &server,
        "alpha",
        project_html(&server, "Alpha", "/img/alpha.png", &["/img/a0.png"]),
    )
    .await;
    mount_project(
        &server,
        "beta",
        project_html(&server, "Beta", "/img/beta.gif", &[]),
    )
    .await;
    mount_asset(&server, "/img/alpha.png", 200, b"alpha-cover").await;
    mount_asset(&server, "/img/a0.png", 200, b"alpha-shot").await;
    mount_asset(&server, "/img/beta.gif", 200, b"beta-cover").await;

    let dir = TempDir::new().unwrap();
    let sink = RecordingSink::default();
    let summary = scrape_creator(&create_test_config(&server), "dev", dir.path(), &sink)
        .await
        .unwrap();

    assert_eq!(summary.project_count, 2);
    assert_eq!(
        sink.events(),
        vec![
            ProgressEvent::Total(2),
            ProgressEvent::ItemDone("Alpha".to_string()),
            ProgressEvent::ItemDone("Beta".to_string()),
        ]
    );

    let index = read_index(&dir.path().join("index.json")).await.unwrap();
    assert_eq!(index.creator, "dev");
    assert_eq!(index.project_count, 2);
    assert_eq!(index.projects[0].slug, "alpha");
    assert_eq!(index.projects[1].slug, "beta");

    let alpha = read_metadata(&dir.path().join("alpha").join("metadata.json"))
        .await
        .unwrap();
    assert_eq!(alpha.title, "Alpha");
    assert_eq!(alpha.short_description, "About Alpha");
    assert_eq!(alpha.info["Status"], "Released");
    assert_eq!(alpha.cover_image.as_deref(), Some("images/cover.png"));
    assert_eq!(alpha.screenshots, vec!["images/screenshot_0.png"]);
    assert_eq!(
        std::fs::read(dir.path().join("alpha/images/cover.png")).unwrap(),
        b"alpha-cover"
    );
    assert_eq!(
        std::fs::read(dir.path().join("alpha/images/screenshot_0.png")).unwrap(),
        b"alpha-shot"
    );
    assert_eq!(
        std::fs::read(dir.path().join("beta/images/cover.gif")).unwrap(),
        b"beta-cover"
    );
}

#[tokio::test]
async fn test_single_page_without_next_link() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "solo",
        1,
        listing_html(&server, &["one", "two", "one"], false),
    )
    .await;

    let config = create_test_config(&server);
    let client = build_http_client(&config.user_agent, &config.scraper).unwrap();
    let urls = discover_project_urls(&client, &RequestLimiter::new(2), &config.scraper, "solo")
        .await
        .unwrap();

    assert_eq!(
        urls,
        vec![
            format!("{}/games/one", server.uri()),
            format!("{}/games/two", server.uri()),
        ]
    );
}

#[tokio::test]
async fn test_pagination_stops_when_page_adds_nothing() {
    let server = MockServer::start().await;
    // Page 2 repeats page 1 and still offers a next link; page 3 is never mounted.
    mount_listing(&server, "loop", 1, listing_html(&server, &["a"], true)).await;
    mount_listing(&server, "loop", 2, listing_html(&server, &["a"], true)).await;

    let config = create_test_config(&server);
    let client = build_http_client(&config.user_agent, &config.scraper).unwrap();
    let urls = discover_project_urls(&client, &RequestLimiter::new(1), &config.scraper, "loop")
        .await
        .unwrap();

    assert_eq!(urls, vec![format!("{}/games/a", server.uri())]);
}

#[tokio::test]
async fn test_max_pages_caps_pagination() {
    let server = MockServer::start().await;
    mount_listing(&server, "many", 1, listing_html(&server, &["p1"], true)).await;
    mount_listing(&server, "many", 2, listing_html(&server, &["p2"], true)).await;

    let mut config = create_test_config(&server);
    config.scraper.max_pages = 2;
    let client = build_http_client(&config.user_agent, &config.scraper).unwrap();
    let urls = discover_project_urls(&client, &RequestLimiter::new(1), &config.scraper, "many")
        .await
        .unwrap();

    assert_eq!(urls.len(), 2);
}

#[tokio::test]
async fn test_zero_projects_is_not_found() {
    let server = MockServer::start().await;
    mount_listing(&server, "ghost", 1, listing_html(&server, &[], true)).await;

    let dir = TempDir::new().unwrap();
    let sink = RecordingSink::default();
    let result = scrape_creator(&create_test_config(&server), "ghost", dir.path(), &sink).await;

    match result {
        Err(e @ HarvestError::NotFound { .. }) => {
            assert_eq!(e.to_string(), "No public projects found for 'ghost'");
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert!(sink.events().is_empty());
    assert!(!dir.path().join("index.json").exists());
}

#[tokio::test]
async fn test_download_cover_gets_default_extension() {
    let server = MockServer::start().await;
    mount_listing(&server, "dev", 1, listing_html(&server, &["game"], false)).await;
    mount_project(
        &server,
        "game",
        project_html(&server, "Game", "/file/123/download", &[]),
    )
    .await;
    mount_asset(&server, "/file/123/download", 200, b"jpeg-bytes").await;

    let dir = TempDir::new().unwrap();
    let sink = RecordingSink::default();
    let summary = scrape_creator(&create_test_config(&server), "dev", dir.path(), &sink)
        .await
        .unwrap();

    assert_eq!(
        summary.projects[0].cover_image.as_deref(),
        Some("images/cover.jpg")
    );
    assert!(dir.path().join("game/images/cover.jpg").exists());
}

#[tokio::test]
async fn test_failed_screenshot_keeps_others() {
    let server = MockServer::start().await;
    mount_listing(&server, "dev", 1, listing_html(&server, &["game"], false)).await;
    mount_project(
        &server,
        "game",
        project_html(
            &server,
            "Game",
            "/img/cover.png",
            &["/img/s0.png", "/img/s1.png", "/img/s2.png"],
        ),
    )
    .await;
    mount_asset(&server, "/img/cover.png", 200, b"cover").await;
    mount_asset(&server, "/img/s0.png", 200, b"s0").await;
    mount_asset(&server, "/img/s1.png", 500, b"").await;
    mount_asset(&server, "/img/s2.png", 200, b"s2").await;

    let dir = TempDir::new().unwrap();
    let sink = RecordingSink::default();
    let summary = scrape_creator(&create_test_config(&server), "dev", dir.path(), &sink)
        .await
        .unwrap();

    let images = dir.path().join("game").join("images");
    assert!(images.join("screenshot_0.png").exists());
    assert!(!images.join("screenshot_1.png").exists());
    assert!(images.join("screenshot_2.png").exists());

    // Saved screenshots keep their index; the failed one is left out
    assert_eq!(
        summary.projects[0].screenshots,
        vec!["images/screenshot_0.png", "images/screenshot_2.png"]
    );
    let metadata = read_metadata(&dir.path().join("game").join("metadata.json"))
        .await
        .unwrap();
    assert_eq!(metadata.screenshots, summary.projects[0].screenshots);
    assert_eq!(metadata.cover_image.as_deref(), Some("images/cover.png"));
    assert!(dir.path().join("index.json").exists());
}

#[tokio::test]
async fn test_failed_cover_is_not_recorded() {
    let server = MockServer::start().await;
    mount_listing(&server, "dev", 1, listing_html(&server, &["game"], false)).await;
    mount_project(
        &server,
        "game",
        project_html(&server, "Game", "/img/cover.png", &["/img/s0.png"]),
    )
    .await;
    mount_asset(&server, "/img/cover.png", 404, b"").await;
    mount_asset(&server, "/img/s0.png", 200, b"s0").await;

    let dir = TempDir::new().unwrap();
    let summary = scrape_creator(
        &create_test_config(&server),
        "dev",
        dir.path(),
        &RecordingSink::default(),
    )
    .await
    .unwrap();

    let project = &summary.projects[0];
    assert!(project.cover_image.is_none());
    assert_eq!(project.screenshots, vec!["images/screenshot_0.png"]);
    assert!(!dir.path().join("game/images/cover.png").exists());
}

#[tokio::test]
async fn test_same_last_segment_gets_distinct_slugs() {
    let server = MockServer::start().await;
    let listing = format!(
        r#"<html><body>
            <div class="game_cell"><a class="title game_link" href="{uri}/games/x">First</a></div>
            <div class="game_cell"><a class="title game_link" href="{uri}/other/x">Second</a></div>
        </body></html>"#,
        uri = server.uri()
    );
    mount_listing(&server, "dev", 1, listing).await;
    mount_page(&server, "/games/x", project_html(&server, "First", "/img/1.png", &[])).await;
    mount_page(&server, "/other/x", project_html(&server, "Second", "/img/2.png", &[])).await;
    mount_asset(&server, "/img/1.png", 200, b"first").await;
    mount_asset(&server, "/img/2.png", 200, b"second").await;

    let dir = TempDir::new().unwrap();
    let summary = scrape_creator(
        &create_test_config(&server),
        "dev",
        dir.path(),
        &RecordingSink::default(),
    )
    .await
    .unwrap();

    let slugs: Vec<&str> = summary.projects.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["x", "x-2"]);

    let first = read_metadata(&dir.path().join("x").join("metadata.json"))
        .await
        .unwrap();
    let second = read_metadata(&dir.path().join("x-2").join("metadata.json"))
        .await
        .unwrap();
    assert_eq!(first.title, "First");
    assert_eq!(second.title, "Second");
    assert_eq!(std::fs::read(dir.path().join("x/images/cover.png")).unwrap(), b"first");
    assert_eq!(std::fs::read(dir.path().join("x-2/images/cover.png")).unwrap(), b"second");
}

#[tokio::test]
async fn test_request_limit_caps_image_downloads() {
    let server = MockServer::start().await;
    let shots: Vec<String> = (0..12).map(|i| format!("/img/s{}.png", i)).collect();
    let shot_refs: Vec<&str> = shots.iter().map(String::as_str).collect();

    mount_listing(&server, "dev", 1, listing_html(&server, &["game"], false)).await;
    mount_project(
        &server,
        "game",
        project_html(&server, "Game", "/img/cover.png", &shot_refs[1..]),
    )
    .await;
    mount_slow_asset(&server, "/img/cover.png", Duration::from_millis(200)).await;
    for shot in &shots[1..] {
        mount_slow_asset(&server, shot, Duration::from_millis(200)).await;
    }

    let mut config = create_test_config(&server);
    config.scraper.max_concurrent_requests = 2;

    let dir = TempDir::new().unwrap();
    let started = Instant::now();
    let summary = scrape_creator(&config, "dev", dir.path(), &RecordingSink::default())
        .await
        .unwrap();
    let elapsed = started.elapsed();

    // 12 images of 200ms each through 2 slots take at least 6 rounds
    assert!(
        elapsed >= Duration::from_millis(1100),
        "finished in {:?}",
        elapsed
    );
    assert_eq!(summary.projects[0].screenshots.len(), 11);
    assert!(summary.projects[0].cover_image.is_some());
}

#[tokio::test]
async fn test_project_failure_aborts_run() {
    let server = MockServer::start().await;
    mount_listing(&server, "dev", 1, listing_html(&server, &["ok", "broken"], false)).await;
    mount_project(&server, "ok", project_html(&server, "Ok", "/img/ok.png", &[])).await;
    mount_asset(&server, "/img/ok.png", 200, b"ok").await;
    // "broken" is not mounted, so the mock server answers 404

    let dir = TempDir::new().unwrap();
    let sink = RecordingSink::default();
    let result = scrape_creator(&create_test_config(&server), "dev", dir.path(), &sink).await;

    assert!(matches!(
        result,
        Err(HarvestError::Status { status: 404, .. })
    ));
    assert!(!dir.path().join("index.json").exists());
    assert_eq!(
        sink.events(),
        vec![
            ProgressEvent::Total(2),
            ProgressEvent::ItemDone("Ok".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_concurrent_projects_keep_discovery_order() {
    let server = MockServer::start().await;
    let slugs = ["p0", "p1", "p2", "p3", "p4"];
    mount_listing(&server, "dev", 1, listing_html(&server, &slugs, false)).await;
    for slug in slugs {
        mount_project(
            &server,
            slug,
            project_html(&server, &slug.to_uppercase(), &format!("/img/{}.png", slug), &[]),
        )
        .await;
        mount_asset(&server, &format!("/img/{}.png", slug), 200, b"img").await;
    }

    let mut config = create_test_config(&server);
    config.scraper.max_concurrent_projects = 3;
    config.scraper.max_concurrent_requests = 2;

    let dir = TempDir::new().unwrap();
    let summary = scrape_creator(&config, "dev", dir.path(), &RecordingSink::default())
        .await
        .unwrap();

    let order: Vec<&str> = summary.projects.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(order, slugs);
}

#[tokio::test]
async fn test_concurrent_jobs_are_independent() {
    let server = MockServer::start().await;
    mount_listing(&server, "alpha", 1, listing_html(&server, &["a-game"], false)).await;
    mount_listing(&server, "beta", 1, listing_html(&server, &[], false)).await;
    mount_project(
        &server,
        "a-game",
        project_html(&server, "A Game", "/img/a.png", &[]),
    )
    .await;
    mount_asset(&server, "/img/a.png", 200, b"a").await;

    let config = create_test_config(&server);
    let registry = JobRegistry::new();
    let job_a = registry.create("alpha");
    let job_b = registry.create("beta");
    assert_ne!(job_a, job_b);

    let dir = TempDir::new().unwrap();
    let sink_a = registry.sink(&job_a);
    let sink_b = registry.sink(&job_b);
    let out_a = dir.path().join("alpha");
    let out_b = dir.path().join("beta");

    let (result_a, result_b) = tokio::join!(
        scrape_creator(&config, "alpha", &out_a, &sink_a),
        scrape_creator(&config, "beta", &out_b, &sink_b),
    );

    match result_a {
        Ok(_) => registry.complete(&job_a, None),
        Err(e) => registry.fail(&job_a, e.to_string()),
    }
    match result_b {
        Ok(_) => registry.complete(&job_b, None),
        Err(e) => registry.fail(&job_b, e.to_string()),
    }

    let a = registry.get(&job_a).unwrap();
    let b = registry.get(&job_b).unwrap();
    assert_eq!(a.status, JobStatus::Done);
    assert_eq!(a.total, 1);
    assert_eq!(a.progress, vec!["A Game"]);
    assert_eq!(b.status, JobStatus::Error);
    assert_eq!(b.total, 0);
    assert!(b.progress.is_empty());
    assert_eq!(
        b.error.as_deref(),
        Some("No public projects found for 'beta'")
    );
}
