//! Test failure type returned by test bodies.

use acctest_sync_semaphore::SemaphoreError;
use std::fmt;

/// Why a test body stopped early.
///
/// Returning `Err` from a test body ends it; the runner records the message
/// on the test's context. Failures recorded with
/// [`TestContext::error`](crate::TestContext::error) do not stop the body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TestFailure {
    /// The test failed.
    #[error("{0}")]
    Failed(String),
    /// The test decided not to run, e.g. because a precondition is missing.
    #[error("skipped: {0}")]
    Skipped(String),
}

impl TestFailure {
    /// A failure carrying the display form of `reason`.
    pub fn failed(reason: impl fmt::Display) -> Self {
        TestFailure::Failed(reason.to_string())
    }

    /// A skip carrying the display form of `reason`.
    pub fn skipped(reason: impl fmt::Display) -> Self {
        TestFailure::Skipped(reason.to_string())
    }

    /// Returns `true` for [`TestFailure::Skipped`].
    pub fn is_skip(&self) -> bool {
        matches!(self, TestFailure::Skipped(_))
    }
}

impl From<SemaphoreError> for TestFailure {
    fn from(err: SemaphoreError) -> Self {
        TestFailure::Failed(err.to_string())
    }
}

impl From<String> for TestFailure {
    fn from(reason: String) -> Self {
        TestFailure::Failed(reason)
    }
}

impl From<&str> for TestFailure {
    fn from(reason: &str) -> Self {
        TestFailure::Failed(reason.to_string())
    }
}

/// Result type of a test body.
pub type TestResult = Result<(), TestFailure>;
