//! Error types for named semaphores.

use std::time::Duration;

/// Errors that can occur when creating or acquiring a named semaphore.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemaphoreError {
    /// A semaphore was requested without a name.
    #[error("semaphore name must not be empty")]
    EmptyName,
    /// The requested capacity is zero or above [`MAX_CAPACITY`](crate::MAX_CAPACITY).
    #[error(
        "semaphore {name:?} needs a capacity between 1 and {max}, got {capacity}",
        max = crate::config::MAX_CAPACITY
    )]
    InvalidCapacity {
        /// Name of the semaphore being created.
        name: String,
        /// The rejected capacity.
        capacity: usize,
    },
    /// Every permit is held and the caller asked not to wait.
    #[error("semaphore {name:?} is full: all {capacity} permits are held")]
    Full {
        /// Name of the semaphore.
        name: String,
        /// Capacity of the semaphore.
        capacity: usize,
    },
    /// Timeout waiting for a permit.
    #[error("timeout after {waited:?} waiting for a permit on semaphore {name:?}")]
    Timeout {
        /// Name of the semaphore.
        name: String,
        /// How long the caller waited.
        waited: Duration,
    },
    /// The semaphore was closed while waiting.
    #[error("semaphore {name:?} is closed")]
    Closed {
        /// Name of the semaphore.
        name: String,
    },
}

impl SemaphoreError {
    /// Returns `true` if the caller gave up waiting for a permit.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SemaphoreError::Timeout { .. })
    }

    /// Returns `true` if the error came from an invalid configuration rather
    /// than from contention.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            SemaphoreError::EmptyName | SemaphoreError::InvalidCapacity { .. }
        )
    }
}

/// Result type for semaphore operations.
pub type Result<T> = std::result::Result<T, SemaphoreError>;
