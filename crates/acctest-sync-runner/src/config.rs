//! Configuration for test runners.

use crate::events::RunnerEvent;
use crate::report::Outcome;
use crate::runner::Runner;
use acctest_sync_core::events::{EventListeners, FnListener};
use acctest_sync_semaphore::parse_override;
use std::fmt;
use std::time::Duration;

/// Environment variable limiting concurrently executing tests.
pub const PARALLEL_ENV_VAR: &str = "ACCTEST_PARALLEL";

/// Environment variable selecting which subtests run.
pub const RUN_FILTER_ENV_VAR: &str = "ACCTEST_RUN";

/// Configuration shared by every test started from one [`Runner`].
#[derive(Clone, Debug, Default)]
pub struct RunnerConfig {
    /// Maximum number of parallel test units executing at once.
    pub(crate) parallelism: Option<usize>,
    /// Per-test time limit.
    pub(crate) test_timeout: Option<Duration>,
    /// Subtest selection.
    pub(crate) filter: Option<TestFilter>,
    /// Event listeners.
    pub(crate) event_listeners: EventListeners<RunnerEvent>,
}

impl RunnerConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> RunnerConfigBuilder {
        RunnerConfigBuilder::new()
    }
}

/// Builder for runner configuration.
pub struct RunnerConfigBuilder {
    parallelism: Option<usize>,
    test_timeout: Option<Duration>,
    filter: Option<String>,
    event_listeners: EventListeners<RunnerEvent>,
}

impl RunnerConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self {
            parallelism: None,
            test_timeout: None,
            filter: None,
            event_listeners: EventListeners::new(),
        }
    }

    /// Limits how many parallel test units execute at once.
    ///
    /// A unit is a group of the serial runner or a test case of the
    /// limited-concurrency runner. Zero means unlimited.
    /// Default: unlimited
    pub fn parallelism(mut self, max: usize) -> Self {
        self.parallelism = (max > 0).then_some(max);
        self
    }

    /// Fails any test case whose body runs longer than `timeout`.
    ///
    /// Applies to cases of the runners and to [`TestContext::run`]
    /// subtests, not to top-level tests or groups. The body is cancelled, so
    /// permits it holds are released.
    /// Default: None
    ///
    /// [`TestContext::run`]: crate::TestContext::run
    pub fn test_timeout(mut self, timeout: Duration) -> Self {
        self.test_timeout = Some(timeout);
        self
    }

    /// Runs only subtests matching `pattern`.
    ///
    /// The pattern is split on `/`; element `i` must be a substring of level
    /// `i` of the full test name (level 0 is the top-level test). Levels
    /// deeper than the pattern always match.
    /// Default: everything runs
    pub fn filter(mut self, pattern: impl Into<String>) -> Self {
        self.filter = Some(pattern.into());
        self
    }

    /// Applies [`PARALLEL_ENV_VAR`] and [`RUN_FILTER_ENV_VAR`] when set.
    ///
    /// Invalid parallelism values are ignored.
    pub fn from_env(mut self) -> Self {
        if let Ok(raw) = std::env::var(PARALLEL_ENV_VAR) {
            match parse_override(&raw) {
                Some(max) => self.parallelism = Some(max),
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(value = %raw, "ignoring invalid {PARALLEL_ENV_VAR}");
                }
            }
        }
        if let Ok(pattern) = std::env::var(RUN_FILTER_ENV_VAR) {
            if !pattern.is_empty() {
                self.filter = Some(pattern);
            }
        }
        self
    }

    /// Registers a callback when a test starts.
    ///
    /// # Callback Signature
    /// `Fn(&str)` - Called with the full test name.
    pub fn on_test_started<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RunnerEvent::TestStarted { test, .. } = event {
                f(test);
            }
        }));
        self
    }

    /// Registers a callback when a test finishes.
    ///
    /// # Callback Signature
    /// `Fn(&str, Outcome, Duration)` - Called with the full test name, its
    /// outcome and how long it took including cleanups.
    ///
    /// # Example
    /// ```rust
    /// use acctest_sync_runner::{Outcome, RunnerConfig};
    ///
    /// let runner = RunnerConfig::builder()
    ///     .on_test_finished(|name, outcome, duration| {
    ///         if outcome == Outcome::Failed {
    ///             eprintln!("{name} failed after {duration:?}");
    ///         }
    ///     })
    ///     .build();
    /// ```
    pub fn on_test_finished<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, Outcome, Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RunnerEvent::TestFinished {
                test,
                outcome,
                duration,
                ..
            } = event
            {
                f(test, *outcome, *duration);
            }
        }));
        self
    }

    /// Builds the configuration and returns a [`Runner`].
    pub fn build(self) -> Runner {
        Runner::new(RunnerConfig {
            parallelism: self.parallelism,
            test_timeout: self.test_timeout,
            filter: self.filter.map(|pattern| TestFilter::new(&pattern)),
            event_listeners: self.event_listeners,
        })
    }
}

impl Default for RunnerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-level substring filter over slash-separated test names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestFilter {
    levels: Vec<String>,
}

impl TestFilter {
    /// Parses a `/`-separated pattern.
    pub fn new(pattern: &str) -> Self {
        Self {
            levels: pattern.split('/').map(str::to_string).collect(),
        }
    }

    /// Returns `true` if the test named `full_name` should run.
    pub fn matches(&self, full_name: &str) -> bool {
        full_name
            .split('/')
            .zip(&self.levels)
            .all(|(level, wanted)| level.contains(wanted.as_str()))
    }
}

impl fmt::Display for TestFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.levels.join("/"))
    }
}
