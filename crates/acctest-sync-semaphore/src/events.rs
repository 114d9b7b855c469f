//! Event types for named semaphores.

use acctest_sync_core::events::SyncEvent;
use std::time::{Duration, Instant};

/// Events emitted by a named semaphore.
#[derive(Debug, Clone)]
pub enum SemaphoreEvent {
    /// A caller obtained a permit.
    PermitAcquired {
        /// Name of the semaphore.
        semaphore: String,
        /// When the event occurred.
        timestamp: Instant,
        /// Permits held after this acquisition.
        in_use: usize,
        /// Time spent waiting for the permit.
        waited: Duration,
    },
    /// A permit was dropped and its slot returned.
    PermitReleased {
        /// Name of the semaphore.
        semaphore: String,
        /// When the event occurred.
        timestamp: Instant,
        /// How long the permit was held.
        held: Duration,
    },
    /// A caller gave up waiting for a permit.
    AcquireTimedOut {
        /// Name of the semaphore.
        semaphore: String,
        /// When the event occurred.
        timestamp: Instant,
        /// Capacity of the semaphore.
        capacity: usize,
    },
    /// A non-waiting acquisition found the semaphore full, or the semaphore
    /// was closed.
    AcquireRejected {
        /// Name of the semaphore.
        semaphore: String,
        /// When the event occurred.
        timestamp: Instant,
        /// Capacity of the semaphore.
        capacity: usize,
    },
}

impl SyncEvent for SemaphoreEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SemaphoreEvent::PermitAcquired { .. } => "permit_acquired",
            SemaphoreEvent::PermitReleased { .. } => "permit_released",
            SemaphoreEvent::AcquireTimedOut { .. } => "acquire_timed_out",
            SemaphoreEvent::AcquireRejected { .. } => "acquire_rejected",
        }
    }

    fn source_name(&self) -> &str {
        match self {
            SemaphoreEvent::PermitAcquired { semaphore, .. }
            | SemaphoreEvent::PermitReleased { semaphore, .. }
            | SemaphoreEvent::AcquireTimedOut { semaphore, .. }
            | SemaphoreEvent::AcquireRejected { semaphore, .. } => semaphore,
        }
    }
}
