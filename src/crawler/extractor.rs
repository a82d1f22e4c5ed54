//! Project page extraction
//!
//! Every field of a project page is read through an ordered list of
//! strategies. A strategy is a pure function from the parsed page to an
//! optional value; the first one that yields a non-empty value wins and the
//! field falls back to its default when none does. Extraction never fails.

use crate::output::FREE_PRICE;
use crate::url::{last_path_segment, resolve_link};
use indexmap::IndexMap;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Parsed page plus the URL it was requested from
pub struct PageContext<'a> {
    pub document: &'a Html,
    pub url: &'a Url,
}

/// One way of reading a field from a page
pub type Strategy<T> = fn(&PageContext<'_>) -> Option<T>;

/// Everything read from one project page, before assets are downloaded
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedProject {
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub tags: Vec<String>,
    pub info: IndexMap<String, String>,
    pub price: String,
    pub platforms: Vec<String>,
    pub rating: Option<String>,
    pub rating_count: Option<String>,
    /// Absolute cover image URL
    pub cover_url: Option<String>,
    /// Absolute screenshot URLs in document order
    pub screenshot_urls: Vec<String>,
}

const TITLE: &[Strategy<String>] = &[title_from_heading, title_from_og_meta, title_from_url];
const SHORT_DESCRIPTION: &[Strategy<String>] = &[short_description_from_og_meta];
const DESCRIPTION: &[Strategy<String>] = &[description_from_body];
const TAGS: &[Strategy<Vec<String>>] = &[tags_from_info_panel];
const INFO: &[Strategy<IndexMap<String, String>>] = &[info_from_panel_table];
const PRICE: &[Strategy<String>] = &[price_from_buy_widget];
const PLATFORMS: &[Strategy<Vec<String>>] = &[platforms_from_icons];
const RATING: &[Strategy<String>] = &[rating_from_meta];
const RATING_COUNT: &[Strategy<String>] = &[rating_count_from_meta];
const COVER: &[Strategy<String>] = &[cover_from_og_image, cover_from_header_image];
const SCREENSHOTS: &[Strategy<Vec<String>>] = &[screenshots_from_links, screenshots_from_images];

/// Extracts a project record from page markup
///
/// # Arguments
///
/// * `html` - The page markup
/// * `page_url` - The URL the page was requested from; used to resolve
///   relative asset links and as the last title fallback
///
/// # Example
///
/// ```
/// use itch_harvest::crawler::extract_project;
/// use url::Url;
///
/// let html = r#"<html><body><h1 class="game_title"> Space
///     Game </h1></body></html>"#;
/// let url = Url::parse("https://dev.itch.io/space-game").unwrap();
/// let project = extract_project(html, &url);
/// assert_eq!(project.title, "Space Game");
/// assert_eq!(project.price, "Free");
/// ```
pub fn extract_project(html: &str, page_url: &Url) -> ExtractedProject {
    let document = Html::parse_document(html);
    let ctx = PageContext {
        document: &document,
        url: page_url,
    };

    ExtractedProject {
        title: first_match(&ctx, TITLE).unwrap_or_else(|| page_url.to_string()),
        short_description: first_match(&ctx, SHORT_DESCRIPTION).unwrap_or_default(),
        description: first_match(&ctx, DESCRIPTION).unwrap_or_default(),
        tags: first_match(&ctx, TAGS).unwrap_or_default(),
        info: first_match(&ctx, INFO).unwrap_or_default(),
        price: first_match(&ctx, PRICE).unwrap_or_else(|| FREE_PRICE.to_string()),
        platforms: first_match(&ctx, PLATFORMS).unwrap_or_default(),
        rating: first_match(&ctx, RATING),
        rating_count: first_match(&ctx, RATING_COUNT),
        cover_url: first_match(&ctx, COVER),
        screenshot_urls: first_match(&ctx, SCREENSHOTS).unwrap_or_default(),
    }
}

/// Applies strategies in order and returns the first non-empty result
pub fn first_match<T: Emptiable>(ctx: &PageContext<'_>, strategies: &[Strategy<T>]) -> Option<T> {
    strategies
        .iter()
        .filter_map(|strategy| strategy(ctx))
        .find(|value| !value.is_empty_value())
}

/// Values a strategy can produce, with their notion of "empty"
pub trait Emptiable {
    fn is_empty_value(&self) -> bool;
}

impl Emptiable for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Emptiable for Vec<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> Emptiable for IndexMap<K, V> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

/// Collapses every whitespace run (newlines included) to one space and trims
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(element: &ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    select_first(document, css)
        .map(|element| element_text(&element))
        .filter(|text| !text.is_empty())
}

fn first_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    select_first(document, css)
        .and_then(|element| element.value().attr(attr).map(clean_text))
        .filter(|value| !value.is_empty())
}

/// `src`, falling back to the lazy-load attribute
fn image_source(element: &ElementRef<'_>) -> Option<String> {
    ["src", "data-lazy_src"]
        .iter()
        .filter_map(|attr| element.value().attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

// ===== Title =====

fn title_from_heading(ctx: &PageContext<'_>) -> Option<String> {
    first_text(ctx.document, "h1.game_title")
}

fn title_from_og_meta(ctx: &PageContext<'_>) -> Option<String> {
    first_attr(ctx.document, r#"meta[property="og:title"]"#, "content")
}

fn title_from_url(ctx: &PageContext<'_>) -> Option<String> {
    last_path_segment(ctx.url.as_str())
}

// ===== Text fields =====

fn short_description_from_og_meta(ctx: &PageContext<'_>) -> Option<String> {
    first_attr(ctx.document, r#"meta[property="og:description"]"#, "content")
}

fn description_from_body(ctx: &PageContext<'_>) -> Option<String> {
    first_text(ctx.document, ".formatted_description")
}

fn price_from_buy_widget(ctx: &PageContext<'_>) -> Option<String> {
    first_text(ctx.document, ".buy_btn_widget .price")
}

fn rating_from_meta(ctx: &PageContext<'_>) -> Option<String> {
    first_attr(ctx.document, r#"meta[itemprop="ratingValue"]"#, "content")
}

fn rating_count_from_meta(ctx: &PageContext<'_>) -> Option<String> {
    first_attr(ctx.document, r#"meta[itemprop="ratingCount"]"#, "content")
}

// ===== Info panel =====

fn tags_from_info_panel(ctx: &PageContext<'_>) -> Option<Vec<String>> {
    let tags = select_all(ctx.document, ".game_info_panel_widget a[href*='/tag-']")
        .iter()
        .map(element_text)
        .collect();
    Some(tags)
}

fn info_from_panel_table(ctx: &PageContext<'_>) -> Option<IndexMap<String, String>> {
    let cell_selector = Selector::parse("td").ok()?;
    let mut info = IndexMap::new();

    for row in select_all(ctx.document, ".game_info_panel_widget table tr") {
        let cells: Vec<ElementRef<'_>> = row.select(&cell_selector).collect();
        if cells.len() != 2 {
            continue;
        }

        let key = element_text(&cells[0]);
        let key = key.trim_end_matches(':').trim_end().to_string();
        if key.is_empty() {
            continue;
        }
        info.insert(key, element_text(&cells[1]));
    }

    Some(info)
}

fn platforms_from_icons(ctx: &PageContext<'_>) -> Option<Vec<String>> {
    let platforms = select_all(ctx.document, ".game_info_panel_widget .icon")
        .iter()
        .flat_map(|element| {
            element
                .value()
                .classes()
                .filter_map(|class| class.strip_prefix("icon-"))
                .filter(|platform| !platform.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();
    Some(platforms)
}

// ===== Images =====

fn cover_from_og_image(ctx: &PageContext<'_>) -> Option<String> {
    first_attr(ctx.document, r#"meta[property="og:image"]"#, "content")
        .and_then(|href| resolve_link(&href, ctx.url))
}

fn cover_from_header_image(ctx: &PageContext<'_>) -> Option<String> {
    select_first(ctx.document, ".header img, .game_cover img")
        .and_then(|element| image_source(&element))
        .and_then(|src| resolve_link(&src, ctx.url))
}

fn screenshots_from_links(ctx: &PageContext<'_>) -> Option<Vec<String>> {
    let urls = select_all(ctx.document, ".screenshot_list a")
        .iter()
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, ctx.url))
        .collect();
    Some(urls)
}

fn screenshots_from_images(ctx: &PageContext<'_>) -> Option<Vec<String>> {
    let urls = select_all(ctx.document, ".screenshot_list img")
        .iter()
        .filter_map(image_source)
        .filter_map(|src| resolve_link(&src, ctx.url))
        .collect();
    Some(urls)
}
