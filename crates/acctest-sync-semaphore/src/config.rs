//! Configuration for named semaphores.
//!
//! Capacity is resolved once, when the semaphore is built: an environment
//! variable holding a positive integer overrides the compiled default, and
//! anything else (unset, empty, zero, negative, not a number, above
//! [`MAX_CAPACITY`]) falls back to the default without failing the run.

use crate::error::SemaphoreError;
use crate::events::SemaphoreEvent;
use crate::semaphore::Semaphore;
use acctest_sync_core::events::{EventListeners, FnListener};
use std::time::Duration;

/// Largest capacity a semaphore can be built with.
pub const MAX_CAPACITY: usize = tokio::sync::Semaphore::MAX_PERMITS;

/// Configuration for a named semaphore.
#[derive(Clone, Debug)]
pub struct SemaphoreConfig {
    /// Name of the scarce-resource class, e.g. `ClientVPN`.
    pub(crate) name: String,
    /// Effective capacity after the environment override was applied.
    pub(crate) capacity: usize,
    /// Maximum time `acquire` waits for a permit.
    pub(crate) max_wait_duration: Option<Duration>,
    /// Event listeners.
    pub(crate) event_listeners: EventListeners<SemaphoreEvent>,
}

impl SemaphoreConfig {
    /// Creates a new configuration builder for the semaphore `name`.
    pub fn builder(name: impl Into<String>) -> SemaphoreConfigBuilder {
        SemaphoreConfigBuilder::new(name)
    }
}

/// Builder for semaphore configuration.
pub struct SemaphoreConfigBuilder {
    name: String,
    default_capacity: usize,
    capacity_env_var: Option<String>,
    max_wait_duration: Option<Duration>,
    event_listeners: EventListeners<SemaphoreEvent>,
}

impl SemaphoreConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_capacity: 1,
            capacity_env_var: None,
            max_wait_duration: None,
            event_listeners: EventListeners::new(),
        }
    }

    /// Sets the capacity used when no valid override is present.
    ///
    /// Default: 1
    pub fn default_capacity(mut self, capacity: usize) -> Self {
        self.default_capacity = capacity;
        self
    }

    /// Names the environment variable that may override the capacity.
    ///
    /// The variable is read once, when the semaphore is built.
    /// Default: None
    pub fn capacity_env_var(mut self, var: impl Into<String>) -> Self {
        self.capacity_env_var = Some(var.into());
        self
    }

    /// Sets the maximum time [`Semaphore::acquire`] waits for a permit.
    ///
    /// If `None`, callers wait indefinitely.
    /// Default: None
    pub fn max_wait_duration(mut self, duration: Option<Duration>) -> Self {
        self.max_wait_duration = duration;
        self
    }

    /// Registers a callback when a permit is acquired.
    ///
    /// # Callback Signature
    /// `Fn(usize)` - Called with the number of permits held after this
    /// acquisition, between 1 and the capacity (inclusive).
    ///
    /// # Example
    /// ```rust
    /// use acctest_sync_semaphore::SemaphoreConfig;
    ///
    /// let semaphore = SemaphoreConfig::builder("ClientVPN")
    ///     .default_capacity(5)
    ///     .on_permit_acquired(|in_use| {
    ///         if in_use == 5 {
    ///             println!("every Client VPN slot is taken");
    ///         }
    ///     })
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(semaphore.capacity(), 5);
    /// ```
    pub fn on_permit_acquired<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let SemaphoreEvent::PermitAcquired { in_use, .. } = event {
                f(*in_use);
            }
        }));
        self
    }

    /// Registers a callback when a permit is released.
    ///
    /// # Callback Signature
    /// `Fn(Duration)` - Called with how long the permit was held.
    pub fn on_permit_released<F>(mut self, f: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let SemaphoreEvent::PermitReleased { held, .. } = event {
                f(*held);
            }
        }));
        self
    }

    /// Registers a callback when a caller gives up waiting for a permit.
    ///
    /// # Callback Signature
    /// `Fn(usize)` - Called with the capacity of the semaphore.
    pub fn on_acquire_timed_out<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let SemaphoreEvent::AcquireTimedOut { capacity, .. } = event {
                f(*capacity);
            }
        }));
        self
    }

    /// Registers a callback when a non-waiting acquisition is turned away.
    ///
    /// # Callback Signature
    /// `Fn(usize)` - Called with the capacity of the semaphore.
    pub fn on_acquire_rejected<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let SemaphoreEvent::AcquireRejected { capacity, .. } = event {
                f(*capacity);
            }
        }));
        self
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn requested_capacity(&self) -> usize {
        self.default_capacity
    }

    /// Resolves the capacity and builds the semaphore.
    ///
    /// Fails if the name is empty or the default capacity is zero or above
    /// [`MAX_CAPACITY`]; a bad environment override is not an error.
    pub fn build(self) -> Result<Semaphore, SemaphoreError> {
        if self.name.is_empty() {
            return Err(SemaphoreError::EmptyName);
        }
        if !(1..=MAX_CAPACITY).contains(&self.default_capacity) {
            return Err(SemaphoreError::InvalidCapacity {
                name: self.name,
                capacity: self.default_capacity,
            });
        }

        let capacity = match &self.capacity_env_var {
            Some(var) => resolve_capacity(var, self.default_capacity),
            None => self.default_capacity,
        };

        Ok(Semaphore::new(SemaphoreConfig {
            name: self.name,
            capacity,
            max_wait_duration: self.max_wait_duration,
            event_listeners: self.event_listeners,
        }))
    }
}

/// Parses an override value, accepting only integers in `1..=MAX_CAPACITY`.
pub fn parse_override(raw: &str) -> Option<usize> {
    raw.parse::<usize>()
        .ok()
        .filter(|n| (1..=MAX_CAPACITY).contains(n))
}

/// Applies an optional override value to a default capacity.
///
/// ```
/// use acctest_sync_semaphore::parse_capacity;
///
/// assert_eq!(parse_capacity(Some("3"), 5), 3);
/// assert_eq!(parse_capacity(Some("0"), 5), 5);
/// assert_eq!(parse_capacity(Some("-1"), 5), 5);
/// assert_eq!(parse_capacity(None, 5), 5);
/// ```
pub fn parse_capacity(raw: Option<&str>, default_capacity: usize) -> usize {
    raw.and_then(parse_override).unwrap_or(default_capacity)
}

/// Reads `env_var` and applies it to `default_capacity`.
pub fn resolve_capacity(env_var: &str, default_capacity: usize) -> usize {
    let raw = std::env::var(env_var).ok();
    match raw.as_deref().map(parse_override) {
        Some(Some(capacity)) => capacity,
        Some(None) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                env_var,
                value = raw.as_deref().unwrap_or_default(),
                default_capacity,
                "ignoring invalid semaphore capacity override"
            );
            default_capacity
        }
        None => default_capacity,
    }
}
