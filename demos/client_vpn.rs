//! Semaphore-gated acceptance suite for Client VPN resources.
//! Run with: cargo run --example client_vpn
//! Lower the limit: AWS_EC2_CLIENT_VPN_LIMIT=2 cargo run --example client_vpn

use acctest_sync_runner::{
    LimitedCases, LimitedGroups, TestContext, TestResult, run_limited_concurrency_tests_2_levels,
    run_test, synchronize,
};
use acctest_sync_semaphore::{Semaphore, get_semaphore};
use std::time::Duration;
use tokio::time::sleep;

async fn test_endpoint_basic(t: TestContext, semaphore: Semaphore) -> TestResult {
    synchronize(&t, &semaphore, "Client VPN").await?;
    t.log("creating aws_ec2_client_vpn_endpoint");
    sleep(Duration::from_millis(300)).await;
    t.cleanup(|| println!("  destroyed endpoint"));
    Ok(())
}

async fn test_endpoint_disappears(t: TestContext, semaphore: Semaphore) -> TestResult {
    // Plan-only checks do not need a slot.
    sleep(Duration::from_millis(50)).await;
    let _permit = semaphore.acquire().await?;
    t.log("deleting endpoint out of band");
    sleep(Duration::from_millis(200)).await;
    Ok(())
}

async fn test_route_basic(t: TestContext, semaphore: Semaphore) -> TestResult {
    synchronize(&t, &semaphore, "Client VPN").await?;
    t.log(format!(
        "{} of {} Client VPN slots in use",
        semaphore.in_use(),
        semaphore.capacity()
    ));
    sleep(Duration::from_millis(250)).await;
    Ok(())
}

async fn test_authorization_rule_basic(t: TestContext, semaphore: Semaphore) -> TestResult {
    synchronize(&t, &semaphore, "Client VPN").await?;
    sleep(Duration::from_millis(150)).await;
    Err(t.fatal("InvalidClientVpnEndpointId.NotFound"))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    println!("Client VPN Acceptance Suite\n");

    let report = run_test("TestAccClientVPN_serial", |t| async move {
        let semaphore = get_semaphore("ClientVPN", "AWS_EC2_CLIENT_VPN_LIMIT", 5)?;
        println!("ClientVPN capacity: {}\n", semaphore.capacity());

        let groups = LimitedGroups::new()
            .group(
                "AuthorizationRule",
                LimitedCases::new().case("basic", test_authorization_rule_basic),
            )
            .group(
                "Endpoint",
                LimitedCases::new()
                    .case("basic", test_endpoint_basic)
                    .case("disappears", test_endpoint_disappears),
            )
            .group("Route", LimitedCases::new().case("basic", test_route_basic));

        run_limited_concurrency_tests_2_levels(&t, &semaphore, groups).await;
        Ok(())
    })
    .await;

    println!("\n{report}");
    let summary = report.summary();
    println!(
        "{} passed, {} failed, {} skipped",
        summary.passed, summary.failed, summary.skipped
    );
}
