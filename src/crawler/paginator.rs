//! Listing paginator
//!
//! Walks a creator's listing pages and collects project URLs in discovery
//! order. Pagination continues while a page both contributes new URLs and
//! carries a next-page link.

use crate::config::ScraperConfig;
use crate::crawler::fetcher::fetch_page;
use crate::crawler::limiter::RequestLimiter;
use crate::url::{listing_page_url, resolve_link};
use crate::HarvestError;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Primary selector for project links on a listing page
const PROJECT_LINKS: &str = ".game_cell a.game_link, .game_cell a.title";

/// Used only when the primary selector matches nothing
const THUMB_LINKS: &str = ".game_cell .game_thumb a";

const NEXT_PAGE: &str = "a.next_page";

/// Links found on one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Absolute project URLs in document order (may repeat)
    pub project_urls: Vec<String>,
    pub has_next_page: bool,
}

/// Parses one listing page
///
/// Relative hrefs are resolved against `page_url`.
pub fn parse_listing_page(html: &str, page_url: &Url) -> ListingPage {
    let document = Html::parse_document(html);

    let mut project_urls = select_hrefs(&document, PROJECT_LINKS, page_url);
    if project_urls.is_empty() {
        project_urls = select_hrefs(&document, THUMB_LINKS, page_url);
    }

    let has_next_page = Selector::parse(NEXT_PAGE)
        .map(|selector| document.select(&selector).next().is_some())
        .unwrap_or(false);

    ListingPage {
        project_urls,
        has_next_page,
    }
}

fn select_hrefs(document: &Html, css: &str, page_url: &Url) -> Vec<String> {
    let selector = match Selector::parse(css) {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, page_url))
        .collect()
}

/// Discovers every public project URL of a creator
///
/// # Returns
///
/// * `Ok(urls)` - Unique project URLs in discovery order (may be empty)
/// * `Err(HarvestError)` - A listing page could not be fetched
pub async fn discover_project_urls(
    client: &Client,
    limiter: &RequestLimiter,
    config: &ScraperConfig,
    creator: &str,
) -> Result<Vec<String>, HarvestError> {
    let mut urls: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut page: u32 = 1;

    loop {
        let page_url = listing_page_url(&config.listing_url_template, creator, page)?;

        let fetched = {
            let _permit = limiter.acquire().await?;
            fetch_page(client, page_url.as_str()).await?
        };

        let listing = parse_listing_page(&fetched.body, &page_url);

        let mut found = 0;
        for url in listing.project_urls {
            if seen.insert(url.clone()) {
                urls.push(url);
                found += 1;
            }
        }

        tracing::debug!(
            "Listing page {} for {}: {} new project(s)",
            page,
            creator,
            found
        );

        if found == 0 || !listing.has_next_page {
            break;
        }

        if page >= config.max_pages {
            tracing::warn!(
                "Stopped listing {} after {} pages (max-pages reached)",
                creator,
                config.max_pages
            );
            break;
        }

        page += 1;
    }

    Ok(urls)
}
