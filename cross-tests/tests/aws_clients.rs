//! AWS clients built by the fixture talk to the shared LocalStack
//! container. Skipped when `SKIP_DOCKER_TESTS` is set or Docker is
//! unavailable.

use anyhow::Result;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use kinesis_testing::{
    TestHarness, cloudwatch_client, credentials_provider, dynamodb_client, init_test_logging,
    kinesis_client, unique_stream_name, unique_table_name,
};

async fn harness() -> Option<TestHarness> {
    init_test_logging();
    TestHarness::provision_or_skip().await
}

#[tokio::test]
async fn test_kinesis_client_reaches_emulator() -> Result<()> {
    let Some(_harness) = harness().await else {
        eprintln!("Skipping LocalStack test: Docker not available");
        return Ok(());
    };

    let client = kinesis_client();
    let stream = unique_stream_name();
    client
        .create_stream()
        .stream_name(&stream)
        .shard_count(1)
        .send()
        .await?;

    let streams = client.list_streams().send().await?;
    assert!(streams.stream_names().iter().any(|name| name == &stream));
    Ok(())
}

#[tokio::test]
async fn test_dynamodb_client_reaches_emulator() -> Result<()> {
    let Some(_harness) = harness().await else {
        eprintln!("Skipping LocalStack test: Docker not available");
        return Ok(());
    };

    let client = dynamodb_client();
    let table = unique_table_name();
    client
        .create_table()
        .table_name(&table)
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name("lockKey")
                .attribute_type(ScalarAttributeType::S)
                .build()?
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("lockKey")
                .key_type(KeyType::Hash)
                .build()?
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await?;

    let tables = client.list_tables().send().await?;
    assert!(tables.table_names().iter().any(|name| name == &table));
    Ok(())
}

#[tokio::test]
async fn test_cloudwatch_client_reaches_emulator() -> Result<()> {
    let Some(_harness) = harness().await else {
        eprintln!("Skipping LocalStack test: Docker not available");
        return Ok(());
    };

    cloudwatch_client().list_metrics().send().await?;
    Ok(())
}

#[tokio::test]
async fn test_stream_and_table_clients_share_region() -> Result<()> {
    let Some(harness) = harness().await else {
        eprintln!("Skipping LocalStack test: Docker not available");
        return Ok(());
    };

    let kinesis = kinesis_client();
    let dynamodb = dynamodb_client();
    let region = kinesis.config().region().map(ToString::to_string);

    assert_eq!(region.as_deref(), Some(harness.localstack().region()));
    assert_eq!(dynamodb.config().region().map(ToString::to_string), region);
    Ok(())
}

#[tokio::test]
async fn test_standalone_credentials_match_handle() -> Result<()> {
    let Some(harness) = harness().await else {
        eprintln!("Skipping LocalStack test: Docker not available");
        return Ok(());
    };

    let credentials = credentials_provider().provide_credentials().await?;
    assert_eq!(credentials.access_key_id(), harness.localstack().access_key());
    assert_eq!(
        credentials.secret_access_key(),
        harness.localstack().secret_key()
    );
    Ok(())
}
