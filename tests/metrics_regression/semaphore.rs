//! Semaphore metrics regression tests

use super::helpers::*;
use acctest_sync_semaphore::Semaphore;
use serial_test::serial;
use std::time::Duration;

#[tokio::test]
#[serial]
async fn semaphore_permit_metrics() {
    init_recorder();

    let semaphore = Semaphore::builder("metrics_permits")
        .default_capacity(2)
        .build()
        .unwrap();
    {
        let _permit = semaphore.acquire().await.unwrap();
    }

    assert_counter_exists("semaphore_permits_acquired_total");
    assert_metric_has_label("semaphore_permits_acquired_total", "semaphore", "metrics_permits");
    assert_gauge_exists("semaphore_permits_in_use");
    assert_metric_has_label("semaphore_permits_in_use", "semaphore", "metrics_permits");
    assert_histogram_exists("semaphore_wait_duration_seconds");
    assert_histogram_exists("semaphore_hold_duration_seconds");
    assert_metric_has_label("semaphore_hold_duration_seconds", "semaphore", "metrics_permits");
}

#[tokio::test]
#[serial]
async fn semaphore_timeout_metrics() {
    init_recorder();

    let semaphore = Semaphore::builder("metrics_timeouts")
        .default_capacity(1)
        .build()
        .unwrap();
    let _held = semaphore.acquire().await.unwrap();
    let _ = semaphore.acquire_timeout(Duration::from_millis(10)).await;

    assert_counter_exists("semaphore_acquire_timeouts_total");
    assert_metric_has_label("semaphore_acquire_timeouts_total", "semaphore", "metrics_timeouts");
}

#[tokio::test]
#[serial]
async fn semaphore_rejection_metrics() {
    init_recorder();

    let semaphore = Semaphore::builder("metrics_rejections")
        .default_capacity(1)
        .build()
        .unwrap();
    let _held = semaphore.try_acquire().unwrap();
    let _ = semaphore.try_acquire();

    assert_counter_exists("semaphore_acquire_rejections_total");
    assert_metric_has_label(
        "semaphore_acquire_rejections_total",
        "semaphore",
        "metrics_rejections",
    );
}
