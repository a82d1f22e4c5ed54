//! Output module for persisting harvest results
//!
//! This module handles:
//! - The record types written to disk (`ProjectRecord`, `CreatorSummary`)
//! - JSON persistence of `metadata.json` and `index.json`
//! - Zip packaging of a finished output tree

mod archive;
mod json;
mod records;

pub use archive::{archive_file_name, create_archive, create_archive_async};
pub use json::{
    read_index, read_metadata, write_index, write_metadata, INDEX_FILE, METADATA_FILE,
};
pub use records::{CreatorSummary, ProjectRecord, FREE_PRICE};

use std::path::{Path, PathBuf};

/// Directory (relative to a project directory) that holds downloaded images
pub const IMAGES_DIR: &str = "images";

/// Relative path of a project's cover image for a given extension
pub fn cover_path(ext: &str) -> String {
    format!("{}/cover{}", IMAGES_DIR, ext)
}

/// Relative path of the `index`-th screenshot for a given extension
pub fn screenshot_path(index: usize, ext: &str) -> String {
    format!("{}/screenshot_{}{}", IMAGES_DIR, index, ext)
}

/// Resolves a record-relative path against a project directory
pub fn project_file(project_dir: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .fold(project_dir.to_path_buf(), |path, part| path.join(part))
}
