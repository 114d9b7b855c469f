//! Process-wide registry of named semaphores.
//!
//! Independent test functions that contend for the same external resource
//! agree on a name (`"ClientVPN"`) and each ask the registry for it. The
//! first request creates the semaphore; every later request, from any thread,
//! gets a handle to that same instance, and the capacity arguments of later
//! requests are ignored.

use crate::config::SemaphoreConfigBuilder;
use crate::error::SemaphoreError;
use crate::semaphore::Semaphore;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::LazyLock;

static GLOBAL: LazyLock<SemaphoreRegistry> = LazyLock::new(SemaphoreRegistry::new);

/// Name-to-semaphore map guarded by a single lock.
///
/// Most callers use [`get_semaphore`], which goes through
/// [`SemaphoreRegistry::global`]. A separate registry is useful when a call
/// chain should not share state with the rest of the process.
#[derive(Default)]
pub struct SemaphoreRegistry {
    semaphores: Mutex<HashMap<String, Semaphore>>,
}

impl SemaphoreRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process.
    pub fn global() -> &'static SemaphoreRegistry {
        &GLOBAL
    }

    /// Returns the semaphore registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<Semaphore> {
        self.semaphores.lock().get(name).cloned()
    }

    /// Returns the semaphore for `name`, creating it on first use.
    ///
    /// On creation the capacity is read from `env_var` when it holds a
    /// positive integer and is `default_capacity` otherwise.
    pub fn get_or_create(
        &self,
        name: &str,
        env_var: &str,
        default_capacity: usize,
    ) -> Result<Semaphore, SemaphoreError> {
        self.get_or_create_with(
            Semaphore::builder(name)
                .default_capacity(default_capacity)
                .capacity_env_var(env_var),
        )
    }

    /// Returns the semaphore named by `builder`, building it on first use.
    ///
    /// The builder is dropped unused when the name is already registered.
    pub fn get_or_create_with(
        &self,
        builder: SemaphoreConfigBuilder,
    ) -> Result<Semaphore, SemaphoreError> {
        let mut semaphores = self.semaphores.lock();

        if let Some(existing) = semaphores.get(builder.name()) {
            #[cfg(feature = "tracing")]
            {
                if existing.capacity() != builder.requested_capacity() {
                    tracing::debug!(
                        semaphore = builder.name(),
                        capacity = existing.capacity(),
                        requested = builder.requested_capacity(),
                        "semaphore already registered, keeping its capacity"
                    );
                }
            }
            return Ok(existing.clone());
        }

        let semaphore = builder.build()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            semaphore = semaphore.name(),
            capacity = semaphore.capacity(),
            "registered semaphore"
        );

        semaphores.insert(semaphore.name().to_string(), semaphore.clone());
        Ok(semaphore)
    }

    /// Number of registered semaphores.
    pub fn len(&self) -> usize {
        self.semaphores.lock().len()
    }

    /// Returns `true` if nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.semaphores.lock().is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.semaphores.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

/// Returns the process-wide semaphore for `name`, creating it on first use.
///
/// # Examples
///
/// ```
/// use acctest_sync_semaphore::get_semaphore;
///
/// let first = get_semaphore("DocClientVPN", "DOC_CLIENT_VPN_LIMIT", 5).unwrap();
/// let again = get_semaphore("DocClientVPN", "DOC_CLIENT_VPN_LIMIT", 50).unwrap();
/// assert!(first.ptr_eq(&again));
/// assert_eq!(again.capacity(), 5);
/// ```
pub fn get_semaphore(
    name: &str,
    env_var: &str,
    default_capacity: usize,
) -> Result<Semaphore, SemaphoreError> {
    SemaphoreRegistry::global().get_or_create(name, env_var, default_capacity)
}
