//! Host environment passthrough as seen inside the running container.
//! Skipped when `SKIP_DOCKER_TESTS` is set or Docker is unavailable.

use kinesis_testing::{LocalstackContainer, LocalstackSettings, TestHarness, init_test_logging};

const PASSTHROUGH: &str = "KINESIS_FIXTURE_TOKEN";

fn docker_tests_disabled() -> bool {
    std::env::var("SKIP_DOCKER_TESTS").is_ok()
}

#[tokio::test]
async fn test_shared_container_forwards_github_token_only_when_set() {
    init_test_logging();
    let Some(harness) = TestHarness::provision_or_skip().await else {
        eprintln!("Skipping LocalStack test: Docker not available");
        return;
    };

    let env = harness
        .localstack()
        .running_env()
        .await
        .expect("printenv in container");

    assert_eq!(
        env.get("GITHUB_API_TOKEN"),
        std::env::var("GITHUB_API_TOKEN").ok().as_ref()
    );
    assert_eq!(
        env.get("SERVICES").map(String::as_str),
        Some("kinesis,dynamodb,cloudwatch")
    );
}

#[tokio::test]
async fn test_token_is_present_when_set_and_absent_when_unset() {
    init_test_logging();
    if docker_tests_disabled() {
        eprintln!("Skipping LocalStack test: SKIP_DOCKER_TESTS is set");
        return;
    }

    let settings = LocalstackSettings {
        passthrough_env: vec![PASSTHROUGH.to_string()],
        ..Default::default()
    };

    // The container environment is captured when the handle is created.
    unsafe {
        std::env::set_var(PASSTHROUGH, "abc123");
    }
    let with_token = LocalstackContainer::new(settings.clone());
    unsafe {
        std::env::remove_var(PASSTHROUGH);
    }
    let without_token = LocalstackContainer::new(settings);

    for (handle, expected) in [(&with_token, Some("abc123")), (&without_token, None)] {
        match handle.start().await {
            Ok(_) => {}
            Err(e) if e.is_docker_unavailable() => {
                eprintln!("Skipping LocalStack test: Docker not available: {}", e);
                return;
            }
            Err(e) => panic!("LocalStack fixture failed to start: {}", e)
        }

        let env = handle.running_env().await.expect("printenv in container");
        handle.stop().await.expect("container removed");

        assert_eq!(env.get(PASSTHROUGH).map(String::as_str), expected);
    }
}
