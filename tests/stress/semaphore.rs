//! Semaphore stress tests

use acctest_sync_semaphore::{Semaphore, SemaphoreRegistry};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tokio::time::sleep;

use super::ConcurrencyTracker;

const UNSET: &str = "ACCTEST_SYNC_STRESS_SURELY_UNSET_LIMIT";

/// Test: Thousands of waiters on a small semaphore
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore]
async fn stress_many_waiters() {
    let semaphore = Semaphore::builder("stress-waiters")
        .default_capacity(5)
        .build()
        .unwrap();
    let tracker = ConcurrencyTracker::new();

    let start = Instant::now();
    let mut handles = vec![];
    for _ in 0..5_000 {
        let semaphore = semaphore.clone();
        let tracker = Arc::clone(&tracker);
        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire().await.unwrap();
            tracker.enter();
            sleep(Duration::from_micros(200)).await;
            tracker.exit();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    println!("5000 waiters drained in {:?}", start.elapsed());
    assert!(tracker.peak() <= 5);
    assert_eq!(tracker.current(), 0);
    assert_eq!(semaphore.available(), 5);
}

/// Test: Rapid acquire/release cycles without waiting
#[tokio::test]
#[ignore]
async fn stress_rapid_cycles() {
    let semaphore = Semaphore::builder("stress-cycles")
        .default_capacity(1)
        .build()
        .unwrap();

    let start = Instant::now();
    for _ in 0..200_000 {
        let permit = semaphore.try_acquire().unwrap();
        drop(permit);
    }

    println!("200000 cycles in {:?}", start.elapsed());
    assert_eq!(semaphore.available(), 1);
}

/// Test: Many threads registering many names at once
#[test]
#[ignore]
fn stress_registry_contention() {
    let registry = Arc::new(SemaphoreRegistry::new());

    let handles: Vec<_> = (0..64)
        .map(|worker| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in 0..1_000 {
                    let name = format!("resource-{}", (worker * 7 + i) % 250);
                    let semaphore = registry.get_or_create(&name, UNSET, 1 + i % 5).unwrap();
                    assert_eq!(semaphore.name(), name);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.len(), 250);
}

/// Test: Panicking holders never leak permits
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn stress_panicking_holders() {
    let semaphore = Semaphore::builder("stress-panics")
        .default_capacity(3)
        .build()
        .unwrap();

    let mut handles = vec![];
    for i in 0..1_000 {
        let semaphore = semaphore.clone();
        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire().await.unwrap();
            if i % 3 == 0 {
                panic!("holder {i} crashed");
            }
        }));
    }
    let panicked = futures::future::join_all(handles)
        .await
        .into_iter()
        .filter(|r| r.is_err())
        .count();

    assert_eq!(panicked, 334);
    assert_eq!(semaphore.available(), 3);
}
