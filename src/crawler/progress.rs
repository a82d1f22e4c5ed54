//! Progress events reported by a harvest run

use std::fmt;

/// Event emitted by the orchestrator while a creator is being harvested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Number of projects that will be processed, sent once after discovery
    Total(usize),

    /// One project finished; carries its title (or slug when untitled)
    ItemDone(String),
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Total(n) => write!(f, "total: {}", n),
            Self::ItemDone(message) => write!(f, "done: {}", message),
        }
    }
}

/// Receiver of progress events
///
/// Implemented for any `Fn(ProgressEvent)` closure, so callers can pass a
/// closure directly.
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn report(&self, event: ProgressEvent) {
        self(event)
    }
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _event: ProgressEvent) {}
}
