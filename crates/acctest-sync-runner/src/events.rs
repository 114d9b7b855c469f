//! Event types for test runners.

use crate::report::Outcome;
use acctest_sync_core::events::SyncEvent;
use std::time::{Duration, Instant};

/// Events emitted while tests execute.
#[derive(Debug, Clone)]
pub enum RunnerEvent {
    /// A test body is about to run.
    TestStarted {
        /// Full slash-separated test name.
        test: String,
        /// When the event occurred.
        timestamp: Instant,
    },
    /// A test and its cleanups completed.
    TestFinished {
        /// Full slash-separated test name.
        test: String,
        /// When the event occurred.
        timestamp: Instant,
        /// Final outcome, including failures of subtests.
        outcome: Outcome,
        /// Wall time from start to the end of cleanups.
        duration: Duration,
    },
}

impl SyncEvent for RunnerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RunnerEvent::TestStarted { .. } => "test_started",
            RunnerEvent::TestFinished { .. } => "test_finished",
        }
    }

    fn source_name(&self) -> &str {
        match self {
            RunnerEvent::TestStarted { test, .. } | RunnerEvent::TestFinished { test, .. } => test,
        }
    }
}
