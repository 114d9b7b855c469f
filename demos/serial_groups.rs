//! Serial acceptance suite: groups in parallel, cases one at a time.
//! Run with: cargo run --example serial_groups
//! Only one group: ACCTEST_RUN=WorkSpaces/Directory cargo run --example serial_groups

use acctest_sync_runner::{
    Outcome, Runner, SerialCases, SerialGroups, TestContext, TestResult, run_serial_tests_2_levels,
};
use std::time::Duration;
use tokio::time::sleep;

async fn create(t: &TestContext, resource: &str) {
    t.log(format!("creating {resource}"));
    sleep(Duration::from_millis(100)).await;
}

async fn test_directory_basic(t: TestContext) -> TestResult {
    create(&t, "aws_workspaces_directory").await;
    Ok(())
}

async fn test_directory_tags(t: TestContext) -> TestResult {
    create(&t, "aws_workspaces_directory").await;
    Ok(())
}

async fn test_ip_group_basic(t: TestContext) -> TestResult {
    create(&t, "aws_workspaces_ip_group").await;
    Ok(())
}

async fn test_ip_group_multiple_directories(t: TestContext) -> TestResult {
    if std::env::var("WORKSPACES_SECOND_DIRECTORY").is_err() {
        return Err(t.skip("WORKSPACES_SECOND_DIRECTORY not set"));
    }
    create(&t, "aws_workspaces_ip_group").await;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    println!("Serial Groups Example\n");

    let runner = Runner::builder()
        .from_env()
        .on_test_finished(|name, outcome, duration| {
            if outcome != Outcome::Passed {
                println!("{name}: {outcome} after {duration:?}");
            }
        })
        .build();

    let report = runner
        .run_test("TestAccWorkSpaces_serial", |t| async move {
            let groups = SerialGroups::new()
                .group(
                    "Directory",
                    SerialCases::new()
                        .case("basic", test_directory_basic)
                        .case("tags", test_directory_tags),
                )
                .group(
                    "IpGroup",
                    SerialCases::new()
                        .case("basic", test_ip_group_basic)
                        .case("multipleDirectories", test_ip_group_multiple_directories),
                );

            // Give eventually consistent deletes time to settle between cases.
            run_serial_tests_2_levels(&t, groups, Duration::from_millis(500)).await;
            Ok(())
        })
        .await;

    println!("\n{report}");
}
