//! Records persisted by a harvest run

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Price shown for projects without a price widget
pub const FREE_PRICE: &str = "Free";

/// One scraped project, persisted as `<slug>/metadata.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Source page URL (unique within one creator)
    pub url: String,

    /// Project title, never empty
    pub title: String,

    /// Directory name derived from the URL, unique within one creator
    pub slug: String,

    pub short_description: String,

    pub description: String,

    /// Tags in document order, duplicates kept
    pub tags: Vec<String>,

    /// Info panel rows in document order
    pub info: IndexMap<String, String>,

    pub price: String,

    pub platforms: Vec<String>,

    pub rating: Option<String>,

    pub rating_count: Option<String>,

    /// Relative path of the cover image, e.g. `images/cover.png`
    pub cover_image: Option<String>,

    /// Relative screenshot paths, indexed in document order
    pub screenshots: Vec<String>,
}

/// Aggregate of every project of a creator, persisted as `index.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorSummary {
    pub creator: String,
    pub project_count: usize,
    /// Projects in discovery order
    pub projects: Vec<ProjectRecord>,
}

impl CreatorSummary {
    /// Builds a summary; `project_count` always matches `projects.len()`
    pub fn new(creator: impl Into<String>, projects: Vec<ProjectRecord>) -> Self {
        Self {
            creator: creator.into(),
            project_count: projects.len(),
            projects,
        }
    }
}
