//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by the harvester:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests for listing and project pages
//! - GET requests for binary assets
//!
//! Redirects are followed by the client. Any non-2xx status is an error.
//! There is no retry logic: callers decide whether a failure is fatal.

use crate::config::{ScraperConfig, UserAgentConfig};
use crate::HarvestError;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;

/// Maximum number of redirects followed for one request
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Page body content
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `scraper` - Scraper settings carrying the connect and total timeouts
///
/// # Example
///
/// ```no_run
/// use itch_harvest::config::Config;
/// use itch_harvest::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.user_agent, &config.scraper).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    scraper: &ScraperConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(scraper.request_timeout_secs))
        .connect_timeout(Duration::from_secs(scraper.connect_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches an HTML page
///
/// # Returns
///
/// * `Ok(FetchedPage)` - 2xx response with its decoded body
/// * `Err(HarvestError::Http)` - Network error (connect, timeout, body read)
/// * `Err(HarvestError::Status)` - Non-success status code
pub async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, HarvestError> {
    let response = send(client, url).await?;
    let status_code = response.status().as_u16();
    let final_url = response.url().to_string();

    let body = response.text().await.map_err(|source| HarvestError::Http {
        url: url.to_string(),
        source,
    })?;

    tracing::trace!("Fetched {} ({} bytes)", final_url, body.len());

    Ok(FetchedPage {
        final_url,
        status_code,
        body,
    })
}

/// Fetches a binary resource
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, HarvestError> {
    let response = send(client, url).await?;

    let bytes = response.bytes().await.map_err(|source| HarvestError::Http {
        url: url.to_string(),
        source,
    })?;

    Ok(bytes.to_vec())
}

/// Sends a GET request and rejects non-success statuses
async fn send(client: &Client, url: &str) -> Result<reqwest::Response, HarvestError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| {
            if source.is_timeout() {
                tracing::debug!("Request timeout for {}", url);
            } else if source.is_connect() {
                tracing::debug!("Connection failed for {}", url);
            }
            HarvestError::Http {
                url: url.to_string(),
                source,
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(status_error(url, status));
    }

    Ok(response)
}

fn status_error(url: &str, status: StatusCode) -> HarvestError {
    HarvestError::Status {
        url: url.to_string(),
        status: status.as_u16(),
    }
}
