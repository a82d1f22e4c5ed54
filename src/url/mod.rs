//! URL handling module for itch-harvest
//!
//! This module turns creator handles into listing page URLs, resolves
//! hrefs found in markup, and derives on-disk names (slugs and file
//! extensions) from URLs.

mod extension;
mod resolve;
mod slug;

use crate::{UrlError, UrlResult};

// Re-export main functions
pub use extension::{extension_from_url, DEFAULT_EXTENSION};
pub use resolve::resolve_link;
pub use slug::{last_path_segment, slug_from_url, unique_slugs};

/// Validates and normalizes a creator handle
///
/// Handles are trimmed and lowercased, then must be non-empty and made of
/// ASCII letters, digits and hyphens only.
///
/// # Examples
///
/// ```
/// use itch_harvest::url::normalize_creator;
///
/// assert_eq!(normalize_creator("  Some-Dev ").unwrap(), "some-dev");
/// assert!(normalize_creator("../etc").is_err());
/// ```
pub fn normalize_creator(raw: &str) -> UrlResult<String> {
    let creator = raw.trim().to_lowercase();

    if creator.is_empty()
        || !creator
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(UrlError::InvalidCreator(raw.to_string()));
    }

    Ok(creator)
}

/// Builds the URL of one listing page for a creator
///
/// Page 1 is the bare listing URL; later pages add a `page` query parameter.
///
/// # Arguments
///
/// * `template` - Listing URL template containing `{creator}`
/// * `creator` - A validated creator handle
/// * `page` - 1-based page number
///
/// # Examples
///
/// ```
/// use itch_harvest::url::listing_page_url;
///
/// let first = listing_page_url("https://{creator}.itch.io", "dev", 1).unwrap();
/// assert_eq!(first.as_str(), "https://dev.itch.io/");
///
/// let third = listing_page_url("https://{creator}.itch.io", "dev", 3).unwrap();
/// assert_eq!(third.as_str(), "https://dev.itch.io/?page=3");
/// ```
pub fn listing_page_url(template: &str, creator: &str, page: u32) -> UrlResult<::url::Url> {
    if !template.contains("{creator}") {
        return Err(UrlError::MissingPlaceholder(template.to_string()));
    }

    let mut url = ::url::Url::parse(&template.replace("{creator}", creator))
        .map_err(|e| UrlError::Parse(e.to_string()))?;

    if page > 1 {
        url.query_pairs_mut()
            .append_pair("page", &page.to_string());
    }

    Ok(url)
}
