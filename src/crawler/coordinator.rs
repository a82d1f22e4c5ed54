//! Creator coordinator - harvest orchestration
//!
//! This module drives one creator harvest end to end:
//! - Discovering project URLs across listing pages
//! - Reporting the expected total
//! - Scraping projects with bounded, order-preserving concurrency
//! - Writing the creator index

use crate::config::{Config, ScraperConfig};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::limiter::RequestLimiter;
use crate::crawler::paginator::discover_project_urls;
use crate::crawler::progress::{ProgressEvent, ProgressSink};
use crate::crawler::project::scrape_project;
use crate::output::{write_index, CreatorSummary};
use crate::url::unique_slugs;
use crate::HarvestError;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use std::path::Path;

/// Harvest coordinator shared by every job of a process
///
/// Holds the HTTP client and scraper settings. Each call to [`run`] gets its
/// own request limiter, so concurrent harvests do not throttle each other.
///
/// [`run`]: Coordinator::run
#[derive(Debug, Clone)]
pub struct Coordinator {
    client: Client,
    config: ScraperConfig,
}

impl Coordinator {
    /// Creates a coordinator with a client built from the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run harvests
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.user_agent, &config.scraper)?;
        Ok(Self::with_client(client, config.scraper.clone()))
    }

    /// Creates a coordinator around an existing client
    pub fn with_client(client: Client, config: ScraperConfig) -> Self {
        Self { client, config }
    }

    /// Scraper settings in effect
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Harvests every public project of `creator` into `output_dir`
    ///
    /// The creator must already be normalized. On success `output_dir`
    /// contains one directory per project plus `index.json`. Any project
    /// failure aborts the run before the index is written.
    ///
    /// # Returns
    ///
    /// * `Ok(CreatorSummary)` - All projects scraped, in discovery order
    /// * `Err(HarvestError::NotFound)` - The creator lists no projects
    /// * `Err(HarvestError)` - A listing or project page failed
    pub async fn run(
        &self,
        creator: &str,
        output_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<CreatorSummary, HarvestError> {
        let start_time = std::time::Instant::now();
        tracing::info!("Starting harvest of {}", creator);

        tokio::fs::create_dir_all(output_dir).await?;
        let limiter = RequestLimiter::new(self.config.max_concurrent_requests as usize);

        let urls = discover_project_urls(&self.client, &limiter, &self.config, creator).await?;
        if urls.is_empty() {
            return Err(HarvestError::NotFound {
                creator: creator.to_string(),
            });
        }

        tracing::info!("Found {} project(s) for {}", urls.len(), creator);
        progress.report(ProgressEvent::Total(urls.len()));

        let slugs = unique_slugs(&urls);
        let scrapes: Vec<_> = urls
            .iter()
            .zip(slugs.iter())
            .map(|(url, slug)| {
                scrape_project(&self.client, &limiter, url, slug, output_dir, progress)
            })
            .collect();

        let concurrency = (self.config.max_concurrent_projects as usize).max(1);
        let projects: Vec<_> = stream::iter(scrapes)
            .buffered(concurrency)
            .try_collect()
            .await?;

        let summary = CreatorSummary::new(creator, projects);
        write_index(output_dir, &summary).await?;

        tracing::info!(
            "Harvest of {} completed: {} project(s) in {:?}",
            creator,
            summary.project_count,
            start_time.elapsed()
        );

        Ok(summary)
    }
}

/// Harvests a creator with a one-off coordinator
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `creator` - A normalized creator handle
/// * `output_dir` - Directory receiving project folders and `index.json`
/// * `progress` - Receiver of progress events
///
/// # Example
///
/// ```no_run
/// use itch_harvest::{scrape_creator, Config, ProgressEvent};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let report = |event: ProgressEvent| println!("{}", event);
/// let summary = scrape_creator(&config, "some-dev", Path::new("out"), &report).await?;
/// println!("{} projects", summary.project_count);
/// # Ok(())
/// # }
/// ```
pub async fn scrape_creator(
    config: &Config,
    creator: &str,
    output_dir: &Path,
    progress: &dyn ProgressSink,
) -> Result<CreatorSummary, HarvestError> {
    Coordinator::new(config)?.run(creator, output_dir, progress).await
}
