//! # AWS Client Factory
//!
//! Builds AWS SDK clients bound to the shared LocalStack container. Every
//! client gets the same policy regardless of service:
//!
//! 1. region = the container's region
//! 2. credentials = a static provider over the container's key pair
//! 3. endpoint override = the container's endpoint
//!
//! The container must have been started first; see
//! [`LocalstackContainer::start`].

use crate::localstack::{LocalstackContainer, localstack};
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_credential_types::provider::SharedCredentialsProvider;

/// Provider name reported by credentials built here.
pub const CREDENTIALS_PROVIDER_NAME: &str = "localstack-static";

/// A service config builder that can be pointed at LocalStack.
pub trait AwsClientBuilder: Sized {
    type Client;

    fn region(self, region: Region) -> Self;

    fn credentials_provider(self, provider: SharedCredentialsProvider) -> Self;

    fn endpoint_override(self, endpoint: &str) -> Self;

    fn build_client(self) -> Self::Client;
}

macro_rules! impl_aws_client_builder {
    ($($sdk:ident),+ $(,)?) => {
        $(
            impl AwsClientBuilder for $sdk::config::Builder {
                type Client = $sdk::Client;

                fn region(self, region: Region) -> Self {
                    $sdk::config::Builder::region(self, region)
                }

                fn credentials_provider(self, provider: SharedCredentialsProvider) -> Self {
                    $sdk::config::Builder::credentials_provider(self, provider)
                }

                fn endpoint_override(self, endpoint: &str) -> Self {
                    $sdk::config::Builder::endpoint_url(self, endpoint)
                }

                fn build_client(self) -> Self::Client {
                    let config = self.behavior_version(BehaviorVersion::latest()).build();
                    $sdk::Client::from_conf(config)
                }
            }
        )+
    };
}

impl_aws_client_builder!(aws_sdk_kinesis, aws_sdk_dynamodb, aws_sdk_cloudwatch);

/// Applies the LocalStack region, credentials and endpoint to `builder` and
/// builds the client.
pub fn apply_aws_client_options<B: AwsClientBuilder>(
    builder: B,
    handle: &LocalstackContainer
) -> B::Client {
    builder
        .region(Region::new(handle.region().to_string()))
        .credentials_provider(credentials_provider_for(handle))
        .endpoint_override(handle.endpoint())
        .build_client()
}

/// Static credentials over the shared container's key pair.
pub fn credentials_provider() -> SharedCredentialsProvider {
    credentials_provider_for(localstack())
}

pub fn credentials_provider_for(handle: &LocalstackContainer) -> SharedCredentialsProvider {
    SharedCredentialsProvider::new(Credentials::new(
        handle.access_key(),
        handle.secret_key(),
        None,
        None,
        CREDENTIALS_PROVIDER_NAME
    ))
}

pub fn kinesis_client() -> aws_sdk_kinesis::Client {
    kinesis_client_for(localstack())
}

pub fn kinesis_client_for(handle: &LocalstackContainer) -> aws_sdk_kinesis::Client {
    apply_aws_client_options(aws_sdk_kinesis::Config::builder(), handle)
}

pub fn dynamodb_client() -> aws_sdk_dynamodb::Client {
    dynamodb_client_for(localstack())
}

pub fn dynamodb_client_for(handle: &LocalstackContainer) -> aws_sdk_dynamodb::Client {
    apply_aws_client_options(aws_sdk_dynamodb::Config::builder(), handle)
}

pub fn cloudwatch_client() -> aws_sdk_cloudwatch::Client {
    cloudwatch_client_for(localstack())
}

pub fn cloudwatch_client_for(handle: &LocalstackContainer) -> aws_sdk_cloudwatch::Client {
    apply_aws_client_options(aws_sdk_cloudwatch::Config::builder(), handle)
}
