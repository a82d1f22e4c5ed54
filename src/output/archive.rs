//! Zip packaging of a finished creator output directory

use crate::HarvestError;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Archive file name for a creator, e.g. `dev_itch.zip`
pub fn archive_file_name(creator: &str) -> String {
    format!("{}_itch.zip", creator)
}

/// Zips every file under `source_dir` into `archive_path`
///
/// Entry names are relative to `source_dir` and use `/` separators, so the
/// archive unpacks to the same tree (`index.json`, `<slug>/metadata.json`,
/// `<slug>/images/...`). Entries are added in sorted order.
pub fn create_archive(source_dir: &Path, archive_path: &Path) -> Result<PathBuf, HarvestError> {
    if let Some(parent) = archive_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(archive_path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut files = Vec::new();
    collect_files(source_dir, &mut files)?;
    files.sort();

    for path in files {
        let relative = match path.strip_prefix(source_dir) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        zip.start_file(name, options)?;
        let data = std::fs::read(&path)?;
        zip.write_all(&data)?;
    }

    zip.finish()?;
    tracing::debug!("Wrote archive {}", archive_path.display());
    Ok(archive_path.to_path_buf())
}

/// Async wrapper running [`create_archive`] on the blocking pool
pub async fn create_archive_async(
    source_dir: PathBuf,
    archive_path: PathBuf,
) -> Result<PathBuf, HarvestError> {
    tokio::task::spawn_blocking(move || create_archive(&source_dir, &archive_path))
        .await
        .map_err(|e| HarvestError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}
