//! Process-wide registry of harvest jobs
//!
//! Each entry is written only by the task driving that job; readers (the
//! status API) take snapshots. The map itself is never handed out.

use crate::crawler::{ProgressEvent, ProgressSink};
use crate::jobs::status::JobStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Length of the hex job identifiers handed to callers
const JOB_ID_LEN: usize = 12;

/// Snapshot of one job's state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub id: String,
    pub creator: String,
    pub status: JobStatus,
    /// Completion messages, append-only
    pub progress: Vec<String>,
    /// Expected project count, 0 until discovery finishes
    pub total: usize,
    pub error: Option<String>,
    /// Path of the finished archive
    #[serde(rename = "zip")]
    pub archive: Option<PathBuf>,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    fn new(id: String, creator: String) -> Self {
        Self {
            id,
            creator,
            status: JobStatus::Running,
            progress: Vec::new(),
            total: 0,
            error: None,
            archive: None,
            created_at: Utc::now(),
            finished_at: None,
        }
    }
}

/// Registry mapping job ids to job state
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
}

impl JobRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new running job for `creator` and returns its id
    pub fn create(&self, creator: &str) -> String {
        let mut jobs = self.write();
        let id = loop {
            let candidate: String = Uuid::new_v4()
                .simple()
                .to_string()
                .chars()
                .take(JOB_ID_LEN)
                .collect();
            if !jobs.contains_key(&candidate) {
                break candidate;
            }
        };

        jobs.insert(id.clone(), Job::new(id.clone(), creator.to_string()));
        tracing::debug!("Registered job {} for creator {}", id, creator);
        id
    }

    /// Returns a snapshot of a job
    pub fn get(&self, job_id: &str) -> Option<Job> {
        self.read().get(job_id).cloned()
    }

    /// Number of jobs known to the registry
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if no job was ever registered
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Records the expected project count
    pub fn set_total(&self, job_id: &str, total: usize) {
        self.update(job_id, |job| job.total = total);
    }

    /// Appends a completion message
    pub fn push_progress(&self, job_id: &str, message: impl Into<String>) {
        let message = message.into();
        self.update(job_id, |job| job.progress.push(message));
    }

    /// Applies a progress event to a job
    pub fn apply(&self, job_id: &str, event: ProgressEvent) {
        match event {
            ProgressEvent::Total(total) => self.set_total(job_id, total),
            ProgressEvent::ItemDone(message) => self.push_progress(job_id, message),
        }
    }

    /// Marks a job as done
    pub fn complete(&self, job_id: &str, archive: Option<PathBuf>) {
        self.update(job_id, |job| {
            if job.status.is_terminal() {
                return;
            }
            job.status = JobStatus::Done;
            job.archive = archive;
            job.finished_at = Some(Utc::now());
        });
    }

    /// Marks a job as failed with a message
    pub fn fail(&self, job_id: &str, error: impl Into<String>) {
        let error = error.into();
        self.update(job_id, |job| {
            if job.status.is_terminal() {
                return;
            }
            job.status = JobStatus::Error;
            job.error = Some(error);
            job.finished_at = Some(Utc::now());
        });
    }

    /// Returns a progress sink that feeds events into one job
    pub fn sink(&self, job_id: &str) -> JobProgress {
        JobProgress {
            registry: self.clone(),
            job_id: job_id.to_string(),
        }
    }

    fn update(&self, job_id: &str, f: impl FnOnce(&mut Job)) {
        match self.write().get_mut(job_id) {
            Some(job) => f(job),
            None => tracing::warn!("Update for unknown job {}", job_id),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Job>> {
        self.jobs.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Job>> {
        self.jobs.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Progress sink bound to one job of a registry
#[derive(Debug, Clone)]
pub struct JobProgress {
    registry: JobRegistry,
    job_id: String,
}

impl ProgressSink for JobProgress {
    fn report(&self, event: ProgressEvent) {
        self.registry.apply(&self.job_id, event);
    }
}
