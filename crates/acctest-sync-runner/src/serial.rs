//! Serial test runners.

use crate::cases::{SerialCases, SerialGroups};
use crate::context::TestContext;
use crate::runner::{execute, Unit};
use std::time::Duration;
use tokio::task::JoinSet;

/// Runs `cases` as subtests of `t`, one at a time in lexical order of name.
///
/// `delay` is slept between consecutive cases, never after the last one.
/// A failing case does not stop the ones after it.
pub async fn run_serial_tests_1_level(t: &TestContext, cases: SerialCases, delay: Duration) {
    let mut ran_previous = false;
    for (name, case) in cases.into_sorted() {
        let Some(child) = t.subtest(&name) else {
            continue;
        };
        if ran_previous && !delay.is_zero() {
            #[cfg(feature = "tracing")]
            tracing::trace!(test = %t.name(), ?delay, "waiting before next case");
            tokio::time::sleep(delay).await;
        }
        execute(child, case, Unit::Case { parallel: false }).await;
        ran_previous = true;
    }
}

/// Runs every group of `groups` as a concurrent subtest of `t`; the cases
/// inside a group run with [`run_serial_tests_1_level`].
///
/// Each group occupies one of the runner's parallel slots while it runs.
///
/// # Examples
///
/// ```
/// use acctest_sync_runner::{run_serial_tests_2_levels, run_test, SerialCases, SerialGroups};
/// use std::time::Duration;
///
/// # async fn example() {
/// let report = run_test("TestAccResourceExplorer2_serial", |t| async move {
///     let groups = SerialGroups::new()
///         .group(
///             "Index",
///             SerialCases::new()
///                 .case("basic", |_t| async { Ok(()) })
///                 .case("disappears", |_t| async { Ok(()) }),
///         )
///         .group("View", SerialCases::new().case("basic", |_t| async { Ok(()) }));
///
///     run_serial_tests_2_levels(&t, groups, Duration::ZERO).await;
///     Ok(())
/// })
/// .await;
/// assert!(report.passed(), "{report}");
/// # }
/// ```
pub async fn run_serial_tests_2_levels(t: &TestContext, groups: SerialGroups, delay: Duration) {
    let mut running = JoinSet::new();
    for (name, cases) in groups.into_sorted() {
        let Some(child) = t.subtest(&name) else {
            continue;
        };
        running.spawn(execute(
            child,
            move |t| async move {
                run_serial_tests_1_level(&t, cases, delay).await;
                Ok(())
            },
            Unit::Wrapper { parallel: true },
        ));
    }
    join_all(running).await;
}

/// Waits for every spawned subtest, re-raising a panic from the runner itself.
pub(crate) async fn join_all(mut running: JoinSet<bool>) {
    while let Some(joined) = running.join_next().await {
        if let Err(err) = joined {
            if err.is_panic() {
                std::panic::resume_unwind(err.into_panic());
            }
        }
    }
}
