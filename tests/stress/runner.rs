//! Runner stress tests

use acctest_sync_runner::{
    LimitedCases, LimitedGroups, Runner, SerialCases, SerialGroups,
    run_limited_concurrency_tests_2_levels, run_serial_tests_2_levels,
};
use acctest_sync_semaphore::Semaphore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

use super::ConcurrencyTracker;

/// Test: A wide limited suite, 50 groups of 40 cases
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore]
async fn stress_wide_limited_suite() {
    let semaphore = Semaphore::builder("stress-suite")
        .default_capacity(10)
        .build()
        .unwrap();
    let tracker = ConcurrencyTracker::new();

    let mut groups = LimitedGroups::new();
    for g in 0..50 {
        let mut cases = LimitedCases::new();
        for c in 0..40 {
            let tracker = Arc::clone(&tracker);
            cases = cases.case(format!("case_{c:02}"), move |t, semaphore| async move {
                let _permit = semaphore.acquire().await?;
                tracker.enter();
                sleep(Duration::from_micros(100)).await;
                tracker.exit();
                if c % 13 == 0 {
                    return Err(t.fatal("injected"));
                }
                Ok(())
            });
        }
        groups = groups.group(format!("Group{g:02}"), cases);
    }

    let start = Instant::now();
    let report = Runner::builder()
        .parallelism(64)
        .build()
        .run_test("TestAccStress", move |t| async move {
            run_limited_concurrency_tests_2_levels(&t, &semaphore, groups).await;
            Ok(())
        })
        .await;

    println!("2000 cases in {:?}", start.elapsed());
    let summary = report.summary();
    assert_eq!(summary.total(), 2_000);
    // c in {0, 13, 26, 39} fails in every group
    assert_eq!(summary.failed, 200);
    assert!(tracker.peak() <= 10);
}

/// Test: Many serial groups with panicking cases
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore]
async fn stress_serial_groups_with_panics() {
    let tracker = ConcurrencyTracker::new();
    let mut groups = SerialGroups::new();
    for g in 0..200 {
        let mut cases = SerialCases::new();
        for c in 0..10 {
            let tracker = Arc::clone(&tracker);
            cases = cases.case(format!("case_{c}"), move |_t| async move {
                tracker.enter();
                sleep(Duration::from_micros(50)).await;
                tracker.exit();
                if c == 5 {
                    panic!("group {g} case {c}");
                }
                Ok(())
            });
        }
        groups = groups.group(format!("Group{g:03}"), cases);
    }

    let report = Runner::default()
        .run_test("TestAccSerialStress", move |t| async move {
            run_serial_tests_2_levels(&t, groups, Duration::ZERO).await;
            Ok(())
        })
        .await;

    let summary = report.summary();
    assert_eq!(summary.total(), 2_000);
    assert_eq!(summary.failed, 200);
    // Never more than one case per group at a time.
    assert!(tracker.peak() <= 200);
}
