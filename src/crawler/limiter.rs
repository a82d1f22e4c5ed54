//! Request limiter bounding in-flight outbound requests
//!
//! One limiter is created per harvest job. Every page fetch and every asset
//! download holds a permit for the duration of its request only, so a task
//! never waits for a permit while holding another one.

use crate::HarvestError;
use std::sync::Arc;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Counting limiter shared by all requests of one job
#[derive(Debug, Clone)]
pub struct RequestLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl RequestLimiter {
    /// Creates a limiter allowing `capacity` concurrent requests (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Waits for a free slot; the slot is released when the permit drops
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, HarvestError> {
        self.semaphore
            .acquire()
            .await
            .map_err(|_| HarvestError::LimiterClosed)
    }

    /// Total number of slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently free
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
