//! Test execution: panic capture, timeouts, parallel slots.

use crate::config::{RunnerConfig, RunnerConfigBuilder};
use crate::context::TestContext;
use crate::error::{TestFailure, TestResult};
use crate::report::{Outcome, TestReport};
use acctest_sync_semaphore::Semaphore;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use tokio::task::AbortHandle;

#[cfg(feature = "metrics")]
use metrics::{describe_counter, describe_gauge, describe_histogram};
#[cfg(feature = "metrics")]
use std::sync::Once;

#[cfg(feature = "metrics")]
static METRICS_INIT: Once = Once::new();

/// How a test is scheduled by [`execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unit {
    /// A top-level test or a group: only waits for its subtests.
    Wrapper { parallel: bool },
    /// A test case: subject to the runner's test timeout.
    Case { parallel: bool },
}

impl Unit {
    fn parallel(self) -> bool {
        match self {
            Unit::Wrapper { parallel } | Unit::Case { parallel } => parallel,
        }
    }
}

/// State shared by every context of one run.
pub(crate) struct Shared {
    pub(crate) config: RunnerConfig,
    slots: Option<Semaphore>,
}

/// Entry point for a top-level test.
///
/// # Examples
///
/// ```
/// use acctest_sync_runner::Runner;
/// use std::time::Duration;
///
/// # async fn example() {
/// let runner = Runner::builder()
///     .parallelism(8)
///     .test_timeout(Duration::from_secs(3600))
///     .build();
///
/// let report = runner
///     .run_test("TestAccExample", |t| async move {
///         t.run("basic", |_t| async { Ok(()) }).await;
///         Ok(())
///     })
///     .await;
/// assert!(report.passed());
/// # }
/// ```
#[derive(Clone)]
pub struct Runner {
    shared: Arc<Shared>,
}

impl Runner {
    pub(crate) fn new(config: RunnerConfig) -> Self {
        #[cfg(feature = "metrics")]
        {
            METRICS_INIT.call_once(|| {
                describe_counter!("acctest_tests_total", "Total number of tests finished");
                describe_gauge!("acctest_tests_running", "Tests currently executing");
                describe_histogram!(
                    "acctest_test_duration_seconds",
                    "Test duration including cleanups"
                );
            });
        }

        let slots = config.parallelism.and_then(|max| {
            Semaphore::builder("acctest-parallel")
                .default_capacity(max)
                .build()
                .ok()
        });
        Self {
            shared: Arc::new(Shared { config, slots }),
        }
    }

    /// Creates a new builder for configuring a runner.
    pub fn builder() -> RunnerConfigBuilder {
        RunnerConfigBuilder::new()
    }

    /// A runner configured from `ACCTEST_PARALLEL` and `ACCTEST_RUN`.
    pub fn from_env() -> Self {
        RunnerConfigBuilder::new().from_env().build()
    }

    /// Runs `body` as the top-level test `name` and returns its report.
    ///
    /// If the filter excludes `name` the body does not run and the test is
    /// reported as skipped.
    pub async fn run_test<F, Fut>(&self, name: &str, body: F) -> TestReport
    where
        F: FnOnce(TestContext) -> Fut + Send + 'static,
        Fut: Future<Output = TestResult> + Send + 'static,
    {
        let root = TestContext::root(name, Arc::clone(&self.shared));
        let unit = Unit::Wrapper { parallel: false };
        match &self.shared.config.filter {
            Some(filter) if !filter.matches(root.name()) => {
                let reason = format!("no match for filter {filter}");
                execute(root.clone(), move |t| async move { Err(t.skip(reason)) }, unit).await;
            }
            _ => {
                execute(root.clone(), body, unit).await;
            }
        }
        root.report()
    }
}

impl Default for Runner {
    fn default() -> Self {
        Runner::new(RunnerConfig::default())
    }
}

/// Runs `body` as the top-level test `name` with [`Runner::from_env`].
///
/// ```
/// use acctest_sync_runner::run_test;
///
/// # async fn example() {
/// let report = run_test("TestAccNothing", |t| async move {
///     t.log("nothing to do");
///     Ok(())
/// })
/// .await;
/// assert!(report.passed(), "{report}");
/// # }
/// ```
pub async fn run_test<F, Fut>(name: &str, body: F) -> TestReport
where
    F: FnOnce(TestContext) -> Fut + Send + 'static,
    Fut: Future<Output = TestResult> + Send + 'static,
{
    Runner::from_env().run_test(name, body).await
}

/// Runs one registered test to completion and returns `true` if it passed.
///
/// The body runs on its own task so a panic is contained to this test.
/// Parallel units wait for one of the runner's parallel slots first.
pub(crate) async fn execute<F, Fut>(t: TestContext, body: F, unit: Unit) -> bool
where
    F: FnOnce(TestContext) -> Fut + Send + 'static,
    Fut: Future<Output = TestResult> + Send + 'static,
{
    let shared = Arc::clone(t.shared());
    let _slot = match (&shared.slots, unit.parallel()) {
        (Some(slots), true) => slots.acquire().await.ok(),
        _ => None,
    };

    t.start();
    let running = tokio::spawn(body(t.clone()));
    let mut guard = Running {
        t: t.clone(),
        abort: running.abort_handle(),
        settled: false,
    };
    let limit = match unit {
        Unit::Case { .. } => shared.config.test_timeout,
        Unit::Wrapper { .. } => None,
    };
    let joined = match limit {
        Some(limit) => tokio::time::timeout(limit, running)
            .await
            .map_err(|_| limit),
        None => Ok(running.await),
    };
    guard.settled = true;

    let outcome = match joined {
        Ok(Ok(Ok(()))) => Outcome::Passed,
        Ok(Ok(Err(TestFailure::Failed(message)))) => {
            t.error(message);
            Outcome::Failed
        }
        Ok(Ok(Err(TestFailure::Skipped(reason)))) => {
            t.log(format!("skipped: {reason}"));
            Outcome::Skipped
        }
        Ok(Err(err)) if err.is_panic() => {
            t.error(format!("panicked: {}", panic_message(err.into_panic())));
            Outcome::Panicked
        }
        Ok(Err(_)) => {
            t.error("test task was cancelled");
            Outcome::Failed
        }
        Err(limit) => {
            guard.abort.abort();
            t.error(format!("test timed out after {limit:?}"));
            Outcome::Failed
        }
    };

    t.run_cleanups();
    !t.finish(outcome).is_failure()
}

/// A spawned test body owned by the `execute` call awaiting it.
///
/// If that call is dropped first, e.g. because the enclosing test was
/// cancelled, the body is aborted and the test settles as failed.
struct Running {
    t: TestContext,
    abort: AbortHandle,
    settled: bool,
}

impl Drop for Running {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        self.abort.abort();
        self.t.error("cancelled: enclosing test ended");
        self.t.run_cleanups();
        self.t.finish(Outcome::Failed);
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => message.to_string(),
            Err(_) => "non-string panic payload".to_string(),
        },
    }
}
