//! Core infrastructure for acctest-sync.
//!
//! This crate provides the functionality shared by the semaphore and runner
//! crates:
//! - Event system for observability of permits and test executions

pub mod events;

pub use events::{EventListener, EventListeners, FnListener, SyncEvent};
