use acctest_sync_semaphore::{Semaphore, SemaphoreError};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::sleep;

fn semaphore(name: &str, capacity: usize) -> Semaphore {
    Semaphore::builder(name)
        .default_capacity(capacity)
        .build()
        .unwrap()
}

/// Holders never exceed capacity and every waiter eventually gets in
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn holders_bounded_by_capacity() {
    let semaphore = semaphore("it-permits-bounded", 3);
    let current = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];
    for _ in 0..20 {
        let semaphore = semaphore.clone();
        let current = Arc::clone(&current);
        let peak = Arc::clone(&peak);
        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire().await.unwrap();
            let now = current.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            sleep(Duration::from_millis(5)).await;
            current.fetch_sub(1, Ordering::SeqCst);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert!(peak.load(Ordering::SeqCst) <= 3);
    assert_eq!(semaphore.available(), 3);
}

/// A panicking holder still returns its slot
#[tokio::test]
async fn permit_released_on_panic() {
    let semaphore = semaphore("it-permits-panic", 1);
    let held = semaphore.clone();

    let result = tokio::spawn(async move {
        let _permit = held.acquire().await.unwrap();
        panic!("terraform apply crashed");
    })
    .await;

    assert!(result.unwrap_err().is_panic());
    assert_eq!(semaphore.available(), 1);
}

/// Cancelling a holder returns its slot
#[tokio::test]
async fn permit_released_on_abort() {
    let semaphore = semaphore("it-permits-abort", 1);
    let held = semaphore.clone();

    let task = tokio::spawn(async move {
        let _permit = held.acquire().await.unwrap();
        sleep(Duration::from_secs(3600)).await;
    });
    while semaphore.available() == 1 {
        tokio::task::yield_now().await;
    }
    task.abort();
    let _ = task.await;

    assert_eq!(semaphore.available(), 1);
}

#[tokio::test]
async fn try_acquire_reports_full() {
    let semaphore = semaphore("it-permits-full", 1);
    let _permit = semaphore.try_acquire().unwrap();

    let err = semaphore.try_acquire().unwrap_err();
    assert_eq!(
        err,
        SemaphoreError::Full {
            name: "it-permits-full".to_string(),
            capacity: 1,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn acquire_timeout_gives_up() {
    let semaphore = semaphore("it-permits-timeout", 1);
    let _permit = semaphore.acquire().await.unwrap();

    let err = semaphore
        .acquire_timeout(Duration::from_secs(10))
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(semaphore.in_use(), 1);
}

#[tokio::test(start_paused = true)]
async fn configured_max_wait_applies_to_acquire() {
    let timeouts = Arc::new(AtomicUsize::new(0));
    let t = Arc::clone(&timeouts);
    let semaphore = Semaphore::builder("it-permits-max-wait")
        .default_capacity(1)
        .max_wait_duration(Some(Duration::from_secs(30)))
        .on_acquire_timed_out(move |_| {
            t.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    let _permit = semaphore.acquire().await.unwrap();
    assert!(semaphore.acquire().await.unwrap_err().is_timeout());
    assert_eq!(timeouts.load(Ordering::SeqCst), 1);
}

/// Closing wakes waiters with an error but leaves held permits alone
#[tokio::test]
async fn close_fails_waiters() {
    let semaphore = semaphore("it-permits-close", 1);
    let permit = semaphore.acquire().await.unwrap();

    let waiter = {
        let semaphore = semaphore.clone();
        tokio::spawn(async move { semaphore.acquire().await.map(|_| ()) })
    };
    tokio::task::yield_now().await;
    semaphore.close();

    assert!(matches!(
        waiter.await.unwrap(),
        Err(SemaphoreError::Closed { .. })
    ));
    assert!(semaphore.is_closed());
    assert_eq!(permit.semaphore().name(), "it-permits-close");
}

#[tokio::test]
async fn release_callback_sees_hold_time() {
    let held = Arc::new(Mutex::new(Vec::new()));
    let h = Arc::clone(&held);
    let semaphore = Semaphore::builder("it-permits-callbacks")
        .default_capacity(2)
        .on_permit_released(move |duration| h.lock().unwrap().push(duration))
        .build()
        .unwrap();

    {
        let _permit = semaphore.acquire().await.unwrap();
        sleep(Duration::from_millis(20)).await;
    }

    let held = held.lock().unwrap();
    assert_eq!(held.len(), 1);
    assert!(held[0] >= Duration::from_millis(20));
}
