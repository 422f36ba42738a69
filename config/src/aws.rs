//! # AWS Connection Properties
//!
//! The connection settings the Kinesis binder reads when its application
//! context is constructed. The property names are the contract between the
//! test fixture that publishes them and the binder that consumes them.

use crate::registry::PropertySource;
use kinesis_errors::{ConfigError, ConfigResult};
use validator::Validate;

pub const ENDPOINT_PROPERTY: &str = "spring.cloud.aws.endpoint";
pub const REGION_PROPERTY: &str = "spring.cloud.aws.region.static";
pub const ACCESS_KEY_PROPERTY: &str = "spring.cloud.aws.credentials.access-key";
pub const SECRET_KEY_PROPERTY: &str = "spring.cloud.aws.credentials.secret-key";

/// Resolved AWS connection settings.
///
/// ## Fields
/// - `endpoint`: endpoint override every AWS client is pointed at
/// - `region`: static region identifier
/// - `access_key` / `secret_key`: static credential pair
///
/// ## Validation
/// - `endpoint`: must be a URL
/// - all fields: at least 1 character
#[derive(Debug, Clone, Validate, PartialEq, Eq)]
pub struct AwsProperties {
    #[validate(url)]
    pub endpoint: String,

    #[validate(length(min = 1))]
    pub region: String,

    #[validate(length(min = 1))]
    pub access_key: String,

    #[validate(length(min = 1))]
    pub secret_key: String
}

impl AwsProperties {
    /// Resolves and validates all four properties from `source`.
    ///
    /// A missing property is an error: falling back to the real AWS endpoint
    /// or the default credential chain is never what a test wants.
    pub fn resolve(source: &dyn PropertySource) -> ConfigResult<Self> {
        let properties = Self {
            endpoint: require(source, ENDPOINT_PROPERTY)?,
            region: require(source, REGION_PROPERTY)?,
            access_key: require(source, ACCESS_KEY_PROPERTY)?,
            secret_key: require(source, SECRET_KEY_PROPERTY)?
        };

        properties
            .validate()
            .map_err(|e| ConfigError::ValidationError {
                reason: e.to_string()
            })?;

        tracing::debug!(
            endpoint = %properties.endpoint,
            region = %properties.region,
            source = source.source_name(),
            "Resolved AWS connection properties"
        );

        Ok(properties)
    }
}

fn require(source: &dyn PropertySource, name: &str) -> ConfigResult<String> {
    source
        .property(name)
        .ok_or_else(|| ConfigError::MissingProperty {
            name: name.to_string()
        })
}
