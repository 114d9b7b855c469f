//! Named counting semaphore with scoped permits.

use crate::config::{SemaphoreConfig, SemaphoreConfigBuilder};
use crate::error::SemaphoreError;
use crate::events::SemaphoreEvent;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, TryAcquireError};

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
#[cfg(feature = "metrics")]
use std::sync::Once;

#[cfg(feature = "metrics")]
static METRICS_INIT: Once = Once::new();

/// A counting admission gate for one scarce-resource class.
///
/// Handles are cheap to clone and all clones share the same permits. At most
/// [`capacity`](Semaphore::capacity) [`SemaphorePermit`]s exist at any
/// instant; a permit returns its slot when dropped, whether the holder
/// finished, returned an error, panicked or was cancelled.
#[derive(Clone)]
pub struct Semaphore {
    inner: Arc<Inner>,
}

struct Inner {
    permits: Arc<tokio::sync::Semaphore>,
    config: SemaphoreConfig,
}

impl Semaphore {
    pub(crate) fn new(config: SemaphoreConfig) -> Self {
        #[cfg(feature = "metrics")]
        {
            METRICS_INIT.call_once(|| {
                describe_counter!(
                    "semaphore_permits_acquired_total",
                    "Total number of permits handed out"
                );
                describe_counter!(
                    "semaphore_acquire_timeouts_total",
                    "Total number of acquisitions that gave up waiting"
                );
                describe_counter!(
                    "semaphore_acquire_rejections_total",
                    "Total number of acquisitions refused without waiting"
                );
                describe_gauge!("semaphore_permits_in_use", "Permits currently held");
                describe_histogram!(
                    "semaphore_wait_duration_seconds",
                    "Time spent waiting to acquire a permit"
                );
                describe_histogram!(
                    "semaphore_hold_duration_seconds",
                    "Time a permit was held before release"
                );
            });
        }

        Self {
            inner: Arc::new(Inner {
                permits: Arc::new(tokio::sync::Semaphore::new(config.capacity)),
                config,
            }),
        }
    }

    /// Creates a new builder for a semaphore named `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use acctest_sync_semaphore::Semaphore;
    /// use std::time::Duration;
    ///
    /// let semaphore = Semaphore::builder("ClientVPN")
    ///     .default_capacity(5)
    ///     .capacity_env_var("AWS_EC2_CLIENT_VPN_LIMIT")
    ///     .max_wait_duration(Some(Duration::from_secs(600)))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(semaphore.name(), "ClientVPN");
    /// ```
    pub fn builder(name: impl Into<String>) -> SemaphoreConfigBuilder {
        SemaphoreConfigBuilder::new(name)
    }

    /// Name of the resource class this semaphore guards.
    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    /// Maximum number of simultaneously held permits.
    pub fn capacity(&self) -> usize {
        self.inner.config.capacity
    }

    /// Number of permits that can be acquired right now without waiting.
    pub fn available(&self) -> usize {
        self.inner.permits.available_permits()
    }

    /// Number of permits currently held.
    pub fn in_use(&self) -> usize {
        self.capacity().saturating_sub(self.available())
    }

    /// Returns `true` if both handles refer to the same semaphore.
    pub fn ptr_eq(&self, other: &Semaphore) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Waits for a permit.
    ///
    /// Honors the configured `max_wait_duration`; without one the caller
    /// waits until a slot frees up or the semaphore is closed.
    pub async fn acquire(&self) -> Result<SemaphorePermit, SemaphoreError> {
        match self.inner.config.max_wait_duration {
            Some(timeout) => self.acquire_timeout(timeout).await,
            None => {
                let start = Instant::now();
                match Arc::clone(&self.inner.permits).acquire_owned().await {
                    Ok(permit) => Ok(self.permitted(permit, start)),
                    Err(_) => Err(self.rejected_closed()),
                }
            }
        }
    }

    /// Waits at most `timeout` for a permit.
    pub async fn acquire_timeout(
        &self,
        timeout: Duration,
    ) -> Result<SemaphorePermit, SemaphoreError> {
        let start = Instant::now();
        let acquire = Arc::clone(&self.inner.permits).acquire_owned();
        match tokio::time::timeout(timeout, acquire).await {
            Ok(Ok(permit)) => Ok(self.permitted(permit, start)),
            Ok(Err(_)) => Err(self.rejected_closed()),
            Err(_) => Err(self.timed_out(start.elapsed())),
        }
    }

    /// Takes a permit only if one is free right now.
    pub fn try_acquire(&self) -> Result<SemaphorePermit, SemaphoreError> {
        match Arc::clone(&self.inner.permits).try_acquire_owned() {
            Ok(permit) => Ok(self.permitted(permit, Instant::now())),
            Err(TryAcquireError::NoPermits) => {
                self.emit_rejected();
                Err(SemaphoreError::Full {
                    name: self.name().to_string(),
                    capacity: self.capacity(),
                })
            }
            Err(TryAcquireError::Closed) => Err(self.rejected_closed()),
        }
    }

    /// Closes the semaphore.
    ///
    /// Waiters and later acquisitions fail with [`SemaphoreError::Closed`];
    /// permits already handed out stay valid until dropped.
    pub fn close(&self) {
        self.inner.permits.close();
    }

    /// Returns `true` once [`close`](Semaphore::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.permits.is_closed()
    }

    fn permitted(&self, permit: OwnedSemaphorePermit, start: Instant) -> SemaphorePermit {
        let config = &self.inner.config;
        let waited = start.elapsed();
        let in_use = self.in_use();

        config.event_listeners.emit(&SemaphoreEvent::PermitAcquired {
            semaphore: config.name.clone(),
            timestamp: Instant::now(),
            in_use,
            waited,
        });

        #[cfg(feature = "tracing")]
        tracing::trace!(semaphore = %config.name, in_use, capacity = config.capacity, ?waited, "permit acquired");

        #[cfg(feature = "metrics")]
        {
            counter!("semaphore_permits_acquired_total", "semaphore" => config.name.clone())
                .increment(1);
            gauge!("semaphore_permits_in_use", "semaphore" => config.name.clone())
                .set(in_use as f64);
            histogram!("semaphore_wait_duration_seconds", "semaphore" => config.name.clone())
                .record(waited.as_secs_f64());
        }

        SemaphorePermit {
            permit: Some(permit),
            semaphore: self.clone(),
            acquired_at: Instant::now(),
        }
    }

    fn timed_out(&self, waited: Duration) -> SemaphoreError {
        let config = &self.inner.config;
        config.event_listeners.emit(&SemaphoreEvent::AcquireTimedOut {
            semaphore: config.name.clone(),
            timestamp: Instant::now(),
            capacity: config.capacity,
        });

        #[cfg(feature = "tracing")]
        tracing::warn!(semaphore = %config.name, capacity = config.capacity, ?waited, "gave up waiting for a permit");

        #[cfg(feature = "metrics")]
        counter!("semaphore_acquire_timeouts_total", "semaphore" => config.name.clone())
            .increment(1);

        SemaphoreError::Timeout {
            name: config.name.clone(),
            waited,
        }
    }

    fn rejected_closed(&self) -> SemaphoreError {
        self.emit_rejected();
        SemaphoreError::Closed {
            name: self.name().to_string(),
        }
    }

    fn emit_rejected(&self) {
        let config = &self.inner.config;
        config.event_listeners.emit(&SemaphoreEvent::AcquireRejected {
            semaphore: config.name.clone(),
            timestamp: Instant::now(),
            capacity: config.capacity,
        });

        #[cfg(feature = "metrics")]
        counter!("semaphore_acquire_rejections_total", "semaphore" => config.name.clone())
            .increment(1);
    }
}

impl fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Semaphore")
            .field("name", &self.name())
            .field("capacity", &self.capacity())
            .field("available", &self.available())
            .finish()
    }
}

/// A held slot on a [`Semaphore`].
///
/// The slot is returned when the permit is dropped.
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct SemaphorePermit {
    permit: Option<OwnedSemaphorePermit>,
    semaphore: Semaphore,
    acquired_at: Instant,
}

impl SemaphorePermit {
    /// The semaphore this permit belongs to.
    pub fn semaphore(&self) -> &Semaphore {
        &self.semaphore
    }

    /// How long this permit has been held so far.
    pub fn held_for(&self) -> Duration {
        self.acquired_at.elapsed()
    }
}

impl fmt::Debug for SemaphorePermit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemaphorePermit")
            .field("semaphore", &self.semaphore.name())
            .field("held_for", &self.held_for())
            .finish()
    }
}

impl Drop for SemaphorePermit {
    fn drop(&mut self) {
        // Return the slot before reporting so listeners observe the new count.
        drop(self.permit.take());

        let held = self.acquired_at.elapsed();
        let config = &self.semaphore.inner.config;
        config.event_listeners.emit(&SemaphoreEvent::PermitReleased {
            semaphore: config.name.clone(),
            timestamp: Instant::now(),
            held,
        });

        #[cfg(feature = "tracing")]
        tracing::trace!(semaphore = %config.name, ?held, "permit released");

        #[cfg(feature = "metrics")]
        {
            gauge!("semaphore_permits_in_use", "semaphore" => config.name.clone())
                .set(self.semaphore.in_use() as f64);
            histogram!("semaphore_hold_duration_seconds", "semaphore" => config.name.clone())
                .record(held.as_secs_f64());
        }
    }
}
