//! Single project scraping
//!
//! Fetches one project page, extracts its fields, downloads its images and
//! writes `<slug>/metadata.json` under the creator output directory.

use crate::crawler::downloader::{download_all, DownloadTask};
use crate::crawler::extractor::{extract_project, ExtractedProject};
use crate::crawler::fetcher::fetch_page;
use crate::crawler::limiter::RequestLimiter;
use crate::crawler::progress::{ProgressEvent, ProgressSink};
use crate::output::{cover_path, project_file, screenshot_path, write_metadata, ProjectRecord};
use crate::url::extension_from_url;
use crate::HarvestError;
use reqwest::Client;
use std::path::Path;
use url::Url;

/// Scrapes one project into `base_dir/<slug>/`
///
/// The page fetch holds a limiter permit only while the request is in
/// flight; each image download takes its own permit. Image failures are
/// logged and do not fail the project. Only images that were saved keep
/// their path in the record.
///
/// # Returns
///
/// * `Ok(ProjectRecord)` - Metadata was written
/// * `Err(HarvestError)` - The page could not be fetched or the metadata
///   could not be written
pub async fn scrape_project(
    client: &Client,
    limiter: &RequestLimiter,
    url: &str,
    slug: &str,
    base_dir: &Path,
    progress: &dyn ProgressSink,
) -> Result<ProjectRecord, HarvestError> {
    let fetched = {
        let _permit = limiter.acquire().await?;
        fetch_page(client, url).await?
    };

    let page_url = Url::parse(&fetched.final_url)?;
    let extracted = extract_project(&fetched.body, &page_url);

    let project_dir = base_dir.join(slug);
    let (mut record, tasks) = build_record(url, slug.to_string(), extracted, &project_dir);

    if !tasks.is_empty() {
        let report = download_all(client, limiter, &tasks).await;
        if report.failed > 0 {
            tracing::warn!(
                "{}: {}/{} image(s) failed to download",
                record.slug,
                report.failed,
                report.attempted
            );
        } else {
            tracing::debug!("{}: {} image(s) downloaded", record.slug, report.succeeded);
        }
        drop_unsaved_assets(&mut record, &report.saved);
    }

    write_metadata(&project_dir, &record).await?;
    tracing::info!("Scraped {} ({})", record.title, record.url);

    let label = if record.title.is_empty() {
        record.slug.clone()
    } else {
        record.title.clone()
    };
    progress.report(ProgressEvent::ItemDone(label));

    Ok(record)
}

/// Assigns on-disk names to every image and assembles the record
fn build_record(
    url: &str,
    slug: String,
    extracted: ExtractedProject,
    project_dir: &Path,
) -> (ProjectRecord, Vec<DownloadTask>) {
    let mut tasks = Vec::with_capacity(extracted.screenshot_urls.len() + 1);

    let cover_image = extracted.cover_url.map(|cover_url| {
        let relative = cover_path(&extension_from_url(&cover_url));
        tasks.push(DownloadTask {
            label: "cover".to_string(),
            dest: project_file(project_dir, &relative),
            url: cover_url,
        });
        relative
    });

    let screenshots = extracted
        .screenshot_urls
        .into_iter()
        .enumerate()
        .map(|(index, screenshot_url)| {
            let relative = screenshot_path(index, &extension_from_url(&screenshot_url));
            tasks.push(DownloadTask {
                label: format!("screenshot {}", index),
                dest: project_file(project_dir, &relative),
                url: screenshot_url,
            });
            relative
        })
        .collect();

    let record = ProjectRecord {
        url: url.to_string(),
        title: extracted.title,
        slug,
        short_description: extracted.short_description,
        description: extracted.description,
        tags: extracted.tags,
        info: extracted.info,
        price: extracted.price,
        platforms: extracted.platforms,
        rating: extracted.rating,
        rating_count: extracted.rating_count,
        cover_image,
        screenshots,
    };

    (record, tasks)
}

/// Removes paths of images that were not saved
///
/// `saved` follows task order: the cover first when there is one, then the
/// screenshots. Remaining screenshots keep their original index in the file
/// name, so the list may have gaps.
fn drop_unsaved_assets(record: &mut ProjectRecord, saved: &[bool]) {
    let mut outcomes = saved.iter().copied();
    if record.cover_image.is_some() && !outcomes.next().unwrap_or(false) {
        record.cover_image = None;
    }
    let screenshots = std::mem::take(&mut record.screenshots);
    record.screenshots = screenshots
        .into_iter()
        .zip(outcomes)
        .filter_map(|(path, ok)| ok.then_some(path))
        .collect();
}
