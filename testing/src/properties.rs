//! # Dynamic Property Bridge
//!
//! Publishes the running container's coordinates as the `spring.cloud.aws.*`
//! properties the binder resolves when its application context is built.

use crate::localstack::StartedLocalstack;
use kinesis_config::{
    ACCESS_KEY_PROPERTY, DynamicPropertyRegistry, ENDPOINT_PROPERTY, REGION_PROPERTY,
    SECRET_KEY_PROPERTY,
};

/// Registers endpoint, region, access key and secret key suppliers.
///
/// Each supplier reads the handle when the property is resolved. Taking a
/// [`StartedLocalstack`] means this cannot be called before the container
/// has been provisioned.
pub fn register_properties(localstack: StartedLocalstack<'static>, registry: &DynamicPropertyRegistry) {
    let handle = localstack.handle();

    registry.add(ENDPOINT_PROPERTY, move || handle.endpoint().to_string());
    registry.add(REGION_PROPERTY, move || handle.region().to_string());
    registry.add(ACCESS_KEY_PROPERTY, move || handle.access_key().to_string());
    registry.add(SECRET_KEY_PROPERTY, move || handle.secret_key().to_string());

    tracing::debug!(
        endpoint = %handle.endpoint(),
        "Registered LocalStack connection properties"
    );
}
