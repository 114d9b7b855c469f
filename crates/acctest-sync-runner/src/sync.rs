//! Holding a semaphore slot for the rest of a test.

use crate::context::TestContext;
use crate::error::TestResult;
use acctest_sync_semaphore::Semaphore;

/// Waits for a slot of `semaphore` and holds it until `t` finishes.
///
/// The slot is released by a cleanup of `t`, so it is held through the
/// test's own teardown. `resource` names the limited resource in the failure
/// message. A test body calls this before doing anything with the resource:
///
/// ```
/// use acctest_sync_runner::{synchronize, TestContext, TestResult};
/// use acctest_sync_semaphore::Semaphore;
///
/// async fn test_authorization_rule_basic(t: TestContext, semaphore: Semaphore) -> TestResult {
///     synchronize(&t, &semaphore, "Client VPN").await?;
///     t.log("aws_ec2_client_vpn_authorization_rule created");
///     Ok(())
/// }
/// ```
pub async fn synchronize(t: &TestContext, semaphore: &Semaphore, resource: &str) -> TestResult {
    match semaphore.acquire().await {
        Ok(permit) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(test = %t.name(), semaphore = %semaphore.name(), "holding slot until cleanup");

            t.cleanup(move || drop(permit));
            Ok(())
        }
        Err(err) => Err(t.fatal(format!("{resource} semaphore: {err}"))),
    }
}
