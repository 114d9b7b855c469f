//! Semaphore-gated test runners.
//!
//! Every case runs concurrently and receives the semaphore. The runner never
//! acquires it on a case's behalf: a case holds a permit only around the
//! steps that touch the scarce resource, so setup and teardown that do not
//! need it overlap freely.

use crate::cases::{LimitedCases, LimitedGroups};
use crate::context::TestContext;
use crate::runner::{execute, Unit};
use crate::serial::join_all;
use acctest_sync_semaphore::Semaphore;
use tokio::task::JoinSet;

/// Runs every case of `cases` as a concurrent subtest of `t`.
///
/// Each case occupies one of the runner's parallel slots while it runs.
pub async fn run_limited_concurrency_tests_1_level(
    t: &TestContext,
    semaphore: &Semaphore,
    cases: LimitedCases,
) {
    let mut running = JoinSet::new();
    for (name, case) in cases.into_sorted() {
        let Some(child) = t.subtest(&name) else {
            continue;
        };
        let semaphore = semaphore.clone();
        running.spawn(execute(
            child,
            move |t| case(t, semaphore),
            Unit::Case { parallel: true },
        ));
    }
    join_all(running).await;
}

/// Runs every group of `groups` as a concurrent subtest of `t`, and every
/// case inside it with [`run_limited_concurrency_tests_1_level`].
///
/// # Examples
///
/// ```
/// use acctest_sync_runner::{
///     run_limited_concurrency_tests_2_levels, run_test, LimitedCases, LimitedGroups,
/// };
/// use acctest_sync_semaphore::get_semaphore;
///
/// # async fn example() {
/// let semaphore = get_semaphore("ClientVPN", "AWS_EC2_CLIENT_VPN_LIMIT", 5);
///
/// let report = run_test("TestAccClientVPNEndpoint_serial", move |t| async move {
///     let groups = LimitedGroups::new().group(
///         "Endpoint",
///         LimitedCases::new().case("basic", |t, semaphore| async move {
///             let _permit = semaphore.acquire().await?;
///             t.log("endpoint created");
///             Ok(())
///         }),
///     );
///
///     run_limited_concurrency_tests_2_levels(&t, &semaphore?, groups).await;
///     Ok(())
/// })
/// .await;
/// assert!(report.passed(), "{report}");
/// # }
/// ```
pub async fn run_limited_concurrency_tests_2_levels(
    t: &TestContext,
    semaphore: &Semaphore,
    groups: LimitedGroups,
) {
    let mut running = JoinSet::new();
    for (name, cases) in groups.into_sorted() {
        let Some(child) = t.subtest(&name) else {
            continue;
        };
        let semaphore = semaphore.clone();
        running.spawn(execute(
            child,
            move |t| async move {
                run_limited_concurrency_tests_1_level(&t, &semaphore, cases).await;
                Ok(())
            },
            Unit::Wrapper { parallel: false },
        ));
    }
    join_all(running).await;
}
