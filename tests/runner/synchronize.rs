use acctest_sync_runner::{
    LimitedCases, LimitedGroups, Outcome, Runner, run_limited_concurrency_tests_2_levels,
    synchronize,
};
use acctest_sync_semaphore::Semaphore;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::sleep;

/// With capacity 2, at most two tests hold the resource at any time,
/// counting their cleanups
#[tokio::test(start_paused = true)]
async fn slot_held_through_cleanup() {
    let semaphore = Semaphore::builder("it-sync-cleanup")
        .default_capacity(2)
        .build()
        .unwrap();
    let current = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut cases = LimitedCases::new();
    for name in ["basic", "disappears", "multiple", "tags", "update"] {
        let (current, peak) = (Arc::clone(&current), Arc::clone(&peak));
        cases = cases.case(name, move |t, semaphore| async move {
            synchronize(&t, &semaphore, "Client VPN").await?;
            let now = current.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            // Destroy runs as a cleanup registered after the slot, so it
            // runs before the slot is released.
            t.cleanup(move || {
                current.fetch_sub(1, Ordering::SeqCst);
            });
            sleep(Duration::from_millis(100)).await;
            Ok(())
        });
    }
    let gate = semaphore.clone();

    let report = Runner::default()
        .run_test("TestAccClientVPNAuthorizationRule_serial", move |t| async move {
            run_limited_concurrency_tests_2_levels(
                &t,
                &gate,
                LimitedGroups::new().group("AuthorizationRule", cases),
            )
            .await;
            Ok(())
        })
        .await;

    assert!(report.passed(), "{report}");
    assert_eq!(peak.load(Ordering::SeqCst), 2);
    assert_eq!(semaphore.available(), 2);
}

#[tokio::test]
async fn closed_semaphore_fails_the_test() {
    let semaphore = Semaphore::builder("it-sync-closed")
        .default_capacity(1)
        .build()
        .unwrap();
    semaphore.close();

    let report = Runner::default()
        .run_test("TestAccClosed", move |t| async move {
            synchronize(&t, &semaphore, "WorkSpaces Directory").await
        })
        .await;

    assert_eq!(report.outcome, Outcome::Failed);
    assert_eq!(
        report.logs,
        vec!["WorkSpaces Directory semaphore: semaphore \"it-sync-closed\" is closed"]
    );
}
