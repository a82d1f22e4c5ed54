//! Crawler module for storefront harvesting
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching and a per-job request limiter
//! - Listing pagination and project page extraction
//! - Image downloads
//! - Overall harvest coordination and progress reporting

mod coordinator;
mod downloader;
mod extractor;
mod fetcher;
mod limiter;
mod paginator;
mod progress;
mod project;

pub use coordinator::{scrape_creator, Coordinator};
pub use downloader::{download_all, download_asset, DownloadReport, DownloadTask};
pub use extractor::{clean_text, extract_project, ExtractedProject, PageContext, Strategy};
pub use fetcher::{build_http_client, fetch_bytes, fetch_page, FetchedPage};
pub use limiter::RequestLimiter;
pub use paginator::{discover_project_urls, parse_listing_page, ListingPage};
pub use progress::{NoProgress, ProgressEvent, ProgressSink};
pub use project::scrape_project;
