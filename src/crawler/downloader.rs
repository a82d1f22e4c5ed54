//! Asset downloader
//!
//! Downloads project images to disk. A failed download is logged and
//! reported as `false`; it never aborts the project it belongs to and never
//! touches files written by other downloads.

use crate::crawler::fetcher::fetch_bytes;
use crate::crawler::limiter::RequestLimiter;
use futures::future::join_all;
use reqwest::Client;
use std::path::{Path, PathBuf};

/// One image to fetch and where to put it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// Short label used in log messages (`cover`, `screenshot 2`, ...)
    pub label: String,
    pub url: String,
    pub dest: PathBuf,
}

/// Outcome of a batch of downloads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Per-task success, in task order
    pub saved: Vec<bool>,
}

impl DownloadReport {
    fn from_outcomes(saved: Vec<bool>) -> Self {
        let succeeded = saved.iter().filter(|ok| **ok).count();
        Self {
            attempted: saved.len(),
            succeeded,
            failed: saved.len() - succeeded,
            saved,
        }
    }
}

/// Downloads `url` to `dest`, creating parent directories as needed
///
/// # Returns
///
/// `true` when the file was written; `false` on any network, status or
/// filesystem failure (already logged).
pub async fn download_asset(client: &Client, url: &str, dest: &Path) -> bool {
    let bytes = match fetch_bytes(client, url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Download failed for {}: {}", url, e);
            return false;
        }
    };

    if let Some(parent) = dest.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            tracing::warn!("Cannot create {}: {}", parent.display(), e);
            return false;
        }
    }

    match tokio::fs::write(dest, &bytes).await {
        Ok(()) => {
            tracing::trace!("Saved {} ({} bytes)", dest.display(), bytes.len());
            true
        }
        Err(e) => {
            tracing::warn!("Cannot write {}: {}", dest.display(), e);
            false
        }
    }
}

/// Runs every task concurrently, each under its own limiter permit
pub async fn download_all(
    client: &Client,
    limiter: &RequestLimiter,
    tasks: &[DownloadTask],
) -> DownloadReport {
    let saved = join_all(tasks.iter().map(|task| async move {
        let _permit = match limiter.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                tracing::warn!("Skipping {} ({}): {}", task.label, task.url, e);
                return false;
            }
        };
        download_asset(client, &task.url, &task.dest).await
    }))
    .await;

    DownloadReport::from_outcomes(saved)
}
