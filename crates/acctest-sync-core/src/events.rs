//! Listener plumbing shared by semaphores and test runners.
//!
//! Semaphores report permit traffic and runners report test progress. Both
//! register `on_*` callbacks on their builders, which land here as
//! [`FnListener`]s.

use std::fmt;
use std::marker::PhantomData;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// An event a semaphore or runner hands to its listeners.
pub trait SyncEvent: Send + Sync + fmt::Debug {
    /// Stable snake_case tag, e.g. `permit_acquired` or `test_finished`.
    fn event_type(&self) -> &'static str;

    /// Semaphore name or full test name the event is about.
    fn source_name(&self) -> &str;
}

/// Receives events of type `E`.
pub trait EventListener<E: SyncEvent>: Send + Sync {
    /// Called once per emitted event.
    fn on_event(&self, event: &E);
}

/// Listeners registered on one semaphore or runner.
///
/// Clones share the listeners, so every clone of a semaphore handle reports
/// to the same callbacks.
pub struct EventListeners<E: SyncEvent> {
    listeners: Vec<Arc<dyn EventListener<E>>>,
}

impl<E: SyncEvent> EventListeners<E> {
    /// No listeners.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Registers `listener`; listeners are called in registration order.
    pub fn add<L>(&mut self, listener: L)
    where
        L: EventListener<E> + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    /// Delivers `event` to every listener.
    ///
    /// A listener that panics is skipped over. Permits emit from `Drop`, so
    /// the panic must not reach the caller.
    pub fn emit(&self, event: &E) {
        for listener in &self.listeners {
            let _ = catch_unwind(AssertUnwindSafe(|| listener.on_event(event)));
        }
    }
}

impl<E: SyncEvent> Clone for EventListeners<E> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<E: SyncEvent> Default for EventListeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: SyncEvent> fmt::Debug for EventListeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Adapts a closure into an [`EventListener`].
pub struct FnListener<E, F> {
    f: F,
    _event: PhantomData<fn(&E)>,
}

impl<E, F> FnListener<E, F>
where
    F: Fn(&E) + Send + Sync,
{
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _event: PhantomData,
        }
    }
}

impl<E, F> EventListener<E> for FnListener<E, F>
where
    E: SyncEvent,
    F: Fn(&E) + Send + Sync,
{
    fn on_event(&self, event: &E) {
        (self.f)(event)
    }
}
