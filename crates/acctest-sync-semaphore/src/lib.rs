//! Named counting semaphores for acceptance-test admission control.
//!
//! Acceptance tests that create scarce cloud resources (Client VPN endpoints,
//! WorkSpaces directories, ...) quickly run into account quotas when they run
//! in parallel. This crate hands out one counting semaphore per resource
//! class, shared by every test in the process, so that at most `capacity`
//! tests hold that resource at once.
//!
//! # Basic Example
//!
//! ```rust
//! use acctest_sync_semaphore::get_semaphore;
//!
//! # async fn example() -> Result<(), acctest_sync_semaphore::SemaphoreError> {
//! // Five concurrent holders unless AWS_EC2_CLIENT_VPN_LIMIT says otherwise
//! let semaphore = get_semaphore("ClientVPN", "AWS_EC2_CLIENT_VPN_LIMIT", 5)?;
//!
//! {
//!     let _permit = semaphore.acquire().await?;
//!     // create and destroy the endpoint while holding the slot
//! }
//! // the slot is free again here, even if the block above had panicked
//! # Ok(())
//! # }
//! ```
//!
//! # Capacity Overrides
//!
//! The environment variable is read once, when the semaphore for a name is
//! first requested. Only positive integers are accepted; anything else falls
//! back to the default:
//!
//! ```rust
//! use acctest_sync_semaphore::parse_capacity;
//!
//! assert_eq!(parse_capacity(Some("3"), 5), 3);
//! assert_eq!(parse_capacity(Some("not-a-number"), 5), 5);
//! ```
//!
//! # First Caller Wins
//!
//! Later requests for an existing name return the existing semaphore and
//! ignore their own capacity arguments, so call sites that share a name
//! should agree on the default.
//!
//! # Gating Only the Expensive Call
//!
//! [`SemaphoreLayer`] wraps a `tower` service so that each call holds a
//! permit, rather than the whole test:
//!
//! ```rust
//! use acctest_sync_semaphore::{Semaphore, SemaphoreError, SemaphoreLayer};
//! use tower::ServiceBuilder;
//!
//! # fn example() -> Result<(), SemaphoreError> {
//! let semaphore = Semaphore::builder("WorkSpaces").default_capacity(2).build()?;
//! let _client = ServiceBuilder::new()
//!     .layer(SemaphoreLayer::new(semaphore))
//!     .service_fn(|directory_id: String| async move {
//!         Ok::<_, SemaphoreError>(directory_id)
//!     });
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod layer;
pub mod registry;
pub mod semaphore;
pub mod service;

pub use config::{
    parse_capacity, parse_override, resolve_capacity, SemaphoreConfig, SemaphoreConfigBuilder,
    MAX_CAPACITY,
};
pub use error::{Result, SemaphoreError};
pub use events::SemaphoreEvent;
pub use layer::SemaphoreLayer;
pub use registry::{get_semaphore, SemaphoreRegistry};
pub use semaphore::{Semaphore, SemaphorePermit};
pub use service::Limited;
