//! Two-level runners for acceptance test groups.
//!
//! Acceptance tests for one service are usually declared as a table of
//! groups, each a table of named cases:
//!
//! ```text
//! TestAccClientVPN_serial
//! ├── AuthorizationRule / basic, disappears, multiple
//! ├── Endpoint          / basic, disappears, tags
//! └── Route             / basic, disappears
//! ```
//!
//! This crate runs such tables as nested subtests with two policies:
//!
//! - [`run_serial_tests_2_levels`]: groups run concurrently, the cases of a
//!   group run one at a time in lexical order with a pause between them.
//! - [`run_limited_concurrency_tests_2_levels`]: everything runs
//!   concurrently and every case receives a shared [`Semaphore`] that it
//!   acquires around the steps touching the scarce resource.
//!
//! # Basic Example
//!
//! ```rust
//! use acctest_sync_runner::{run_limited_concurrency_tests_2_levels, LimitedCases, LimitedGroups, Runner};
//! use acctest_sync_semaphore::Semaphore;
//!
//! # async fn example() -> Result<(), acctest_sync_semaphore::SemaphoreError> {
//! let semaphore = Semaphore::builder("ClientVPN")
//!     .default_capacity(5)
//!     .capacity_env_var("AWS_EC2_CLIENT_VPN_LIMIT")
//!     .build()?;
//!
//! let report = Runner::from_env()
//!     .run_test("TestAccClientVPN_serial", move |t| async move {
//!         let groups = LimitedGroups::new()
//!             .group(
//!                 "Endpoint",
//!                 LimitedCases::new().case("basic", |t, semaphore| async move {
//!                     let _permit = semaphore.acquire().await?;
//!                     t.log("endpoint created and destroyed");
//!                     Ok(())
//!                 }),
//!             );
//!         run_limited_concurrency_tests_2_levels(&t, &semaphore, groups).await;
//!         Ok(())
//!     })
//!     .await;
//!
//! println!("{report}");
//! # Ok(())
//! # }
//! ```
//!
//! # Failures
//!
//! A test body returns [`TestResult`]. `Err` ends the body; a panic is caught
//! and reported as [`Outcome::Panicked`]. Either way the body's cleanups
//! run, its sibling cases and the other groups keep going, and every parent
//! of a failed test is marked failed too.
//!
//! # Feature Flags
//!
//! - `tracing`: log test starts, finishes and test output
//! - `metrics`: emit test counts, running tests and durations

pub mod cases;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod limited;
pub mod report;
pub mod runner;
pub mod serial;
pub mod sync;

pub use acctest_sync_semaphore::Semaphore;
pub use cases::{
    LimitedCases, LimitedGroups, LimitedTestFn, SerialCases, SerialGroups, TestCases, TestFn,
    TestGroups,
};
pub use config::{
    RunnerConfig, RunnerConfigBuilder, TestFilter, PARALLEL_ENV_VAR, RUN_FILTER_ENV_VAR,
};
pub use context::TestContext;
pub use error::{TestFailure, TestResult};
pub use events::RunnerEvent;
pub use limited::{run_limited_concurrency_tests_1_level, run_limited_concurrency_tests_2_levels};
pub use report::{Outcome, Summary, TestReport};
pub use runner::{run_test, Runner};
pub use serial::{run_serial_tests_1_level, run_serial_tests_2_levels};
pub use sync::synchronize;
