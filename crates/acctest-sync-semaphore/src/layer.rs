//! Tower layer that gates a service behind a named semaphore.

use crate::semaphore::Semaphore;
use crate::service::Limited;
use tower::Layer;

/// Layer that applies semaphore admission control to every call.
///
/// Wrapping only the client of the rate-limited API, rather than the whole
/// test body, keeps a slot busy for exactly as long as the external
/// operation runs.
///
/// # Examples
///
/// ```
/// use acctest_sync_semaphore::{Semaphore, SemaphoreError, SemaphoreLayer};
/// use tower::{Layer, ServiceExt};
///
/// # async fn example() -> Result<(), SemaphoreError> {
/// let semaphore = Semaphore::builder("ClientVPN").default_capacity(5).build()?;
/// let create_endpoint = tower::service_fn(|cidr: &'static str| async move {
///     Ok::<_, SemaphoreError>(format!("cvpn-endpoint for {cidr}"))
/// });
///
/// let endpoint = SemaphoreLayer::new(semaphore)
///     .layer(create_endpoint)
///     .oneshot("10.0.0.0/16")
///     .await?;
/// assert!(endpoint.starts_with("cvpn-endpoint"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct SemaphoreLayer {
    semaphore: Semaphore,
}

impl SemaphoreLayer {
    /// Creates a layer that acquires from `semaphore`.
    pub fn new(semaphore: Semaphore) -> Self {
        Self { semaphore }
    }
}

impl<S> Layer<S> for SemaphoreLayer {
    type Service = Limited<S>;

    fn layer(&self, service: S) -> Self::Service {
        Limited::new(service, self.semaphore.clone())
    }
}
