//! Shared test fixtures for the Kinesis binder.
//!
//! Provides a single, shared LocalStack container across all test files of
//! a test process, emulating:
//! - Kinesis (stream consumption and production)
//! - DynamoDB (checkpoint and lock tables)
//! - CloudWatch (metrics)
//!
//! Setup is two-phase: provision the container, then build the application
//! context from the properties it publishes. See [`TestHarness`].
//!
//! ```rust,no_run
//! use kinesis_testing::{TestHarness, kinesis_client};
//!
//! # async fn example() -> Result<(), kinesis_errors::FixtureError> {
//! let harness = TestHarness::provision().await?;
//! let client = kinesis_client();
//! # let _ = (harness, client);
//! # Ok(())
//! # }
//! ```

pub mod clients;
pub mod harness;
pub mod localstack;
pub mod properties;
pub mod settings;

pub use clients::{
    AwsClientBuilder, apply_aws_client_options, cloudwatch_client, cloudwatch_client_for,
    credentials_provider, credentials_provider_for, dynamodb_client, dynamodb_client_for,
    kinesis_client, kinesis_client_for,
};
pub use harness::{ApplicationContext, TestHarness};
pub use localstack::{LocalstackContainer, StartedLocalstack, localstack};
pub use properties::register_properties;
pub use settings::LocalstackSettings;

use std::sync::Once;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);
static LOGGING: Once = Once::new();

pub fn unique_id(prefix: &str) -> String {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}", prefix, id)
}

/// Stream names are shared by every test in the process, since the
/// container is.
pub fn unique_stream_name() -> String {
    unique_id(&format!("test-stream-{}", std::process::id()))
}

pub fn unique_table_name() -> String {
    unique_id(&format!("test-table-{}", std::process::id()))
}

/// Installs a test-friendly `tracing` subscriber once per process.
///
/// Honors `RUST_LOG`, defaulting to `info`.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_test_writer())
            .with(filter)
            .try_init();
    });
}
