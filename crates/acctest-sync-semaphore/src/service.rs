//! Semaphore-gated service implementation.

use crate::error::SemaphoreError;
use crate::semaphore::Semaphore;
use futures::future::BoxFuture;
use std::task::{Context, Poll};
use tower::Service;

/// Service that holds a semaphore permit for the duration of each call.
#[derive(Clone, Debug)]
pub struct Limited<S> {
    inner: S,
    semaphore: Semaphore,
}

impl<S> Limited<S> {
    /// Creates a new semaphore-gated service.
    pub fn new(inner: S, semaphore: Semaphore) -> Self {
        Self { inner, semaphore }
    }

    /// The semaphore guarding this service.
    pub fn semaphore(&self) -> &Semaphore {
        &self.semaphore
    }

    /// Consumes the wrapper, returning the inner service.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, Request> Service<Request> for Limited<S>
where
    S: Service<Request> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    S::Error: From<SemaphoreError> + Send + 'static,
    Request: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let semaphore = self.semaphore.clone();
        // Take the service that was driven to readiness and leave the clone.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let _permit = semaphore.acquire().await?;
            inner.call(request).await
        })
    }
}
