//! Harvest job tracking
//!
//! This module handles:
//! - Job states (`running`, `done`, `error`)
//! - The process-wide job registry
//! - Spawning jobs and packaging their output

mod registry;
mod runner;
mod status;

pub use registry::{Job, JobProgress, JobRegistry};
pub use runner::JobRunner;
pub use status::JobStatus;
