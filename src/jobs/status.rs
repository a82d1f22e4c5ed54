/// Job status definitions for tracking harvest jobs
///
/// A job starts `Running` and ends in exactly one terminal state.
use serde::Serialize;
use std::fmt;

/// Represents the current state of a harvest job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// The scrape task is still discovering or processing projects
    Running,

    /// Every project was scraped and the output packaged
    Done,

    /// The run aborted; the job's error message says why
    Error,
}

impl JobStatus {
    /// Returns true if no further transitions can happen
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Returns the wire representation used by the status API
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
