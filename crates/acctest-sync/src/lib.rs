//! Admission control for acceptance tests that share scarce cloud resources.
//!
//! `acctest-sync` bundles the pieces needed to run large acceptance suites
//! against accounts with tight quotas:
//!
//! - **Semaphores** (`semaphore` feature): one named counting semaphore per
//!   resource class, shared process-wide, with a capacity that can be raised
//!   or lowered through an environment variable
//! - **Runners** (`runner` feature): two-level serial and semaphore-gated
//!   runners for tables of test groups
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! acctest-sync = { version = "0.3", features = ["full"] }
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "runner")]
//! # {
//! use acctest_sync::runner::{run_limited_concurrency_tests_2_levels, run_test, LimitedCases, LimitedGroups};
//! use acctest_sync::semaphore::get_semaphore;
//!
//! # async fn example() {
//! let report = run_test("TestAccClientVPN_serial", |t| async move {
//!     let semaphore = get_semaphore("ClientVPN", "AWS_EC2_CLIENT_VPN_LIMIT", 5)?;
//!     let groups = LimitedGroups::new().group(
//!         "Endpoint",
//!         LimitedCases::new().case("basic", |_t, semaphore| async move {
//!             let _permit = semaphore.acquire().await?;
//!             Ok(())
//!         }),
//!     );
//!     run_limited_concurrency_tests_2_levels(&t, &semaphore, groups).await;
//!     Ok(())
//! })
//! .await;
//! assert!(report.passed(), "{report}");
//! # }
//! # }
//! ```
//!
//! # Individual Crates
//!
//! - `acctest-sync-semaphore`
//! - `acctest-sync-runner`
//! - `acctest-sync-core` (shared event infrastructure)

// Re-export core (always available)
pub use acctest_sync_core as core;

#[cfg(feature = "semaphore")]
pub use acctest_sync_semaphore as semaphore;

#[cfg(feature = "runner")]
pub use acctest_sync_runner as runner;
