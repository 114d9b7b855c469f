//! Gate a single rate-limited API call instead of a whole test.
//! Run with: cargo run --example rate_limited_client

use acctest_sync_semaphore::{Semaphore, SemaphoreError, SemaphoreLayer};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tower::{ServiceBuilder, ServiceExt};

#[derive(Debug)]
enum ApiError {
    Throttled(SemaphoreError),
}

impl From<SemaphoreError> for ApiError {
    fn from(err: SemaphoreError) -> Self {
        ApiError::Throttled(err)
    }
}

#[tokio::main]
async fn main() -> Result<(), SemaphoreError> {
    tracing_subscriber::fmt::init();

    println!("Rate Limited Client Example\n");

    let semaphore = Semaphore::builder("CreateWorkspaces")
        .default_capacity(2)
        .capacity_env_var("AWS_WORKSPACES_CREATE_LIMIT")
        .max_wait_duration(Some(Duration::from_secs(5)))
        .on_permit_acquired(|in_use| println!("  permit acquired ({in_use} in use)"))
        .on_acquire_timed_out(|capacity| println!("  gave up waiting (capacity {capacity})"))
        .build()?;

    let in_flight = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&in_flight);
    let client = ServiceBuilder::new()
        .layer(SemaphoreLayer::new(semaphore.clone()))
        .service_fn(move |bundle_id: String| {
            let counter = Arc::clone(&counter);
            async move {
                let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
                println!("CreateWorkspaces({bundle_id}), {now} in flight");
                tokio::time::sleep(Duration::from_millis(200)).await;
                counter.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, ApiError>(format!("ws-{bundle_id}"))
            }
        });

    let mut handles = vec![];
    for i in 1..=6 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.oneshot(format!("wsb-{i:03}")).await
        }));
    }

    for handle in handles {
        match handle.await {
            Ok(Ok(workspace)) => println!("created {workspace}"),
            Ok(Err(ApiError::Throttled(err))) => println!("throttled: {err}"),
            Err(err) => println!("task failed: {err}"),
        }
    }

    println!("\n{} permits free", semaphore.available());
    Ok(())
}
