//! Background execution of harvest jobs
//!
//! A job harvests one creator into `<work-dir>/<job_id>/<creator>`, zips it
//! to `<work-dir>/<job_id>/<creator>_itch.zip`, and records the outcome in
//! the registry. Each job runs on its own tokio task.

use crate::crawler::Coordinator;
use crate::jobs::registry::JobRegistry;
use crate::output::{archive_file_name, create_archive_async};
use crate::url::normalize_creator;
use crate::{HarvestError, UrlResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Starts harvest jobs and tracks them in a registry
#[derive(Debug, Clone)]
pub struct JobRunner {
    registry: JobRegistry,
    coordinator: Arc<Coordinator>,
    work_dir: PathBuf,
}

impl JobRunner {
    pub fn new(registry: JobRegistry, coordinator: Coordinator, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            coordinator: Arc::new(coordinator),
            work_dir: work_dir.into(),
        }
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Validates the creator, registers a job and spawns it
    ///
    /// Returns the new job id immediately; the harvest continues in the
    /// background.
    pub fn start(&self, raw_creator: &str) -> UrlResult<String> {
        let creator = normalize_creator(raw_creator)?;
        let job_id = self.registry.create(&creator);

        tracing::info!("Job {} started for {}", job_id, creator);

        let runner = self.clone();
        let id = job_id.clone();
        tokio::spawn(async move {
            runner.run(&id, &creator).await;
        });

        Ok(job_id)
    }

    /// Runs a registered job to completion and records its outcome
    pub async fn run(&self, job_id: &str, creator: &str) {
        match self.execute(job_id, creator).await {
            Ok(archive) => {
                tracing::info!("Job {} done: {}", job_id, archive.display());
                self.registry.complete(job_id, Some(archive));
            }
            Err(e) => {
                tracing::error!("Job {} failed: {}", job_id, e);
                self.registry.fail(job_id, e.to_string());
            }
        }
    }

    async fn execute(&self, job_id: &str, creator: &str) -> Result<PathBuf, HarvestError> {
        let job_dir = self.work_dir.join(job_id);
        let output_dir = job_dir.join(creator);
        let sink = self.registry.sink(job_id);

        self.coordinator.run(creator, &output_dir, &sink).await?;

        let archive_path = job_dir.join(archive_file_name(creator));
        create_archive_async(output_dir, archive_path).await
    }

    /// Directory under which job outputs are written
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }
}
