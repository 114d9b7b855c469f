//! Tests for the serial and limited-concurrency runners.
//!
//! Test organization:
//! - serial.rs: ordering, non-overlap and inter-case delay
//! - limited.rs: critical sections bounded by the semaphore
//! - isolation.rs: failures and panics stay with their test
//! - synchronize.rs: holding a slot until cleanup
//! - parallelism.rs: runner-wide parallel slots and timeouts

mod synchronize;

use std::sync::Mutex;
use tokio::time::Instant;

/// Records when named steps start and end.
#[derive(Default)]
pub struct Timeline {
    spans: Mutex<Vec<(String, Instant, Instant)>>,
}

impl Timeline {
    pub fn record(&self, name: &str, start: Instant) {
        self.spans
            .lock()
            .unwrap()
            .push((name.to_string(), start, Instant::now()));
    }

    /// Spans in the order they finished.
    pub fn spans(&self) -> Vec<(String, Instant, Instant)> {
        self.spans.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.spans().into_iter().map(|(name, _, _)| name).collect()
    }
}
