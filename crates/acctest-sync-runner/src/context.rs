//! The handle a test body uses to report and to start subtests.

use crate::error::TestFailure;
use crate::events::RunnerEvent;
use crate::report::{Outcome, TestReport};
use crate::runner::{execute, Shared, Unit};
use crate::TestResult;
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "metrics")]
use metrics::{counter, gauge, histogram};

type Cleanup = Box<dyn FnOnce() + Send>;

/// Reporting handle for one running test.
///
/// Clones refer to the same test. Names are slash-separated paths from the
/// top-level test down, e.g. `TestAccClientVPN_serial/Endpoint/basic`.
#[derive(Clone)]
pub struct TestContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    name: String,
    shared: Arc<Shared>,
    state: Mutex<ContextState>,
}

#[derive(Default)]
struct ContextState {
    failed: bool,
    finished: bool,
    outcome: Option<Outcome>,
    logs: Vec<String>,
    cleanups: Vec<Cleanup>,
    children: Vec<TestContext>,
    started: Option<Instant>,
    duration: Duration,
}

impl TestContext {
    pub(crate) fn root(name: &str, shared: Arc<Shared>) -> Self {
        Self::with_name(name.replace(' ', "_"), shared)
    }

    fn with_name(name: String, shared: Arc<Shared>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                name,
                shared,
                state: Mutex::new(ContextState::default()),
            }),
        }
    }

    /// Full slash-separated name of this test.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Records a log line on this test.
    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();

        #[cfg(feature = "tracing")]
        tracing::info!(test = %self.name(), "{message}");

        self.inner.state.lock().logs.push(message);
    }

    /// Records a failure and keeps running.
    pub fn error(&self, message: impl Into<String>) {
        self.log(message);
        self.inner.state.lock().failed = true;
    }

    /// Builds the failure that ends this test; return it with `Err(..)`.
    ///
    /// ```rust
    /// use acctest_sync_runner::{TestContext, TestResult};
    ///
    /// async fn test_endpoint_basic(t: TestContext) -> TestResult {
    ///     let endpoint_id: Option<&str> = None;
    ///     let Some(_id) = endpoint_id else {
    ///         return Err(t.fatal("Client VPN endpoint was not created"));
    ///     };
    ///     Ok(())
    /// }
    /// ```
    pub fn fatal(&self, message: impl fmt::Display) -> TestFailure {
        TestFailure::failed(message)
    }

    /// Builds the skip that ends this test; return it with `Err(..)`.
    pub fn skip(&self, reason: impl fmt::Display) -> TestFailure {
        TestFailure::skipped(reason)
    }

    /// Returns `true` if this test or one of its subtests has failed so far.
    pub fn failed(&self) -> bool {
        let (failed, children) = {
            let state = self.inner.state.lock();
            (state.failed, state.children.clone())
        };
        failed
            || children
                .iter()
                .any(|c| c.outcome().is_some_and(Outcome::is_failure) || c.failed())
    }

    /// Registers `f` to run after this test's body returns.
    ///
    /// Cleanups run last-registered first, also when the body failed,
    /// panicked or timed out. A cleanup registered after that point runs
    /// immediately.
    pub fn cleanup<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.inner.state.lock();
        if state.finished {
            drop(state);
            self.run_cleanup(Box::new(f));
        } else {
            state.cleanups.push(Box::new(f));
        }
    }

    /// Runs `body` as a subtest named `name` and waits for it.
    ///
    /// Returns `false` if the subtest failed. A subtest excluded by the
    /// runner's filter is not run and counts as passed.
    pub async fn run<F, Fut>(&self, name: &str, body: F) -> bool
    where
        F: FnOnce(TestContext) -> Fut + Send + 'static,
        Fut: Future<Output = TestResult> + Send + 'static,
    {
        match self.subtest(name) {
            Some(child) => execute(child, body, Unit::Case { parallel: false }).await,
            None => true,
        }
    }

    /// Registers a child test, or returns `None` if the filter excludes it.
    pub(crate) fn subtest(&self, name: &str) -> Option<TestContext> {
        let base = format!("{}/{}", self.name(), name.replace(' ', "_"));
        if let Some(filter) = &self.inner.shared.config.filter {
            if !filter.matches(&base) {
                return None;
            }
        }

        let mut state = self.inner.state.lock();
        let mut unique = base.clone();
        let mut suffix = 1;
        while state.children.iter().any(|c| c.name() == unique) {
            unique = format!("{base}#{suffix:02}");
            suffix += 1;
        }

        let child = Self::with_name(unique, Arc::clone(&self.inner.shared));
        state.children.push(child.clone());
        Some(child)
    }

    pub(crate) fn shared(&self) -> &Arc<Shared> {
        &self.inner.shared
    }

    pub(crate) fn start(&self) {
        self.inner.state.lock().started = Some(Instant::now());

        self.inner
            .shared
            .config
            .event_listeners
            .emit(&RunnerEvent::TestStarted {
                test: self.name().to_string(),
                timestamp: Instant::now(),
            });

        #[cfg(feature = "tracing")]
        tracing::debug!(test = %self.name(), "test started");

        #[cfg(feature = "metrics")]
        gauge!("acctest_tests_running").increment(1.0);
    }

    pub(crate) fn run_cleanups(&self) {
        loop {
            let next = {
                let mut state = self.inner.state.lock();
                match state.cleanups.pop() {
                    Some(cleanup) => cleanup,
                    None => {
                        state.finished = true;
                        return;
                    }
                }
            };
            self.run_cleanup(next);
        }
    }

    fn run_cleanup(&self, cleanup: Cleanup) {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(cleanup));
        if result.is_err() {
            self.error("cleanup panicked");
        }
    }

    /// Settles the outcome once the body and cleanups are done.
    pub(crate) fn finish(&self, outcome: Outcome) -> Outcome {
        let children_failed = self.failed();
        let (outcome, duration) = {
            let mut state = self.inner.state.lock();
            let outcome = match outcome {
                Outcome::Passed | Outcome::Skipped if children_failed => Outcome::Failed,
                other => other,
            };
            state.outcome = Some(outcome);
            state.duration = state.started.map(|s| s.elapsed()).unwrap_or_default();
            (outcome, state.duration)
        };

        self.inner
            .shared
            .config
            .event_listeners
            .emit(&RunnerEvent::TestFinished {
                test: self.name().to_string(),
                timestamp: Instant::now(),
                outcome,
                duration,
            });

        #[cfg(feature = "tracing")]
        {
            if outcome.is_failure() {
                tracing::info!(test = %self.name(), %outcome, ?duration, "test finished");
            } else {
                tracing::debug!(test = %self.name(), %outcome, ?duration, "test finished");
            }
        }

        #[cfg(feature = "metrics")]
        {
            gauge!("acctest_tests_running").decrement(1.0);
            counter!("acctest_tests_total", "outcome" => outcome.as_str()).increment(1);
            histogram!("acctest_test_duration_seconds").record(duration.as_secs_f64());
        }

        outcome
    }

    fn outcome(&self) -> Option<Outcome> {
        self.inner.state.lock().outcome
    }

    /// Snapshot of this test and its subtests.
    pub(crate) fn report(&self) -> TestReport {
        let state = self.inner.state.lock();
        TestReport {
            name: self.name().to_string(),
            outcome: state.outcome.unwrap_or(Outcome::Failed),
            duration: state.duration,
            logs: state.logs.clone(),
            children: state.children.iter().map(TestContext::report).collect(),
        }
    }
}

impl fmt::Debug for TestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestContext")
            .field("name", &self.name())
            .field("failed", &self.inner.state.lock().failed)
            .finish()
    }
}
