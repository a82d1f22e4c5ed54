//! JSON persistence for project metadata and creator summaries

use crate::output::records::{CreatorSummary, ProjectRecord};
use crate::HarvestError;
use std::path::{Path, PathBuf};

/// File name of the per-project metadata document
pub const METADATA_FILE: &str = "metadata.json";

/// File name of the creator summary document
pub const INDEX_FILE: &str = "index.json";

/// Writes `<project_dir>/metadata.json`, creating the directory if needed
pub async fn write_metadata(
    project_dir: &Path,
    record: &ProjectRecord,
) -> Result<PathBuf, HarvestError> {
    tokio::fs::create_dir_all(project_dir).await?;
    let path = project_dir.join(METADATA_FILE);
    let body = serde_json::to_string_pretty(record)?;
    tokio::fs::write(&path, body).await?;
    Ok(path)
}

/// Reads a `metadata.json` document back into a record
pub async fn read_metadata(path: &Path) -> Result<ProjectRecord, HarvestError> {
    let body = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&body)?)
}

/// Writes `<output_dir>/index.json`
pub async fn write_index(
    output_dir: &Path,
    summary: &CreatorSummary,
) -> Result<PathBuf, HarvestError> {
    tokio::fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(INDEX_FILE);
    let body = serde_json::to_string_pretty(summary)?;
    tokio::fs::write(&path, body).await?;
    Ok(path)
}

/// Reads an `index.json` document back into a summary
pub async fn read_index(path: &Path) -> Result<CreatorSummary, HarvestError> {
    let body = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&body)?)
}
