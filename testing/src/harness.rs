//! # Two-Phase Test Setup
//!
//! 1. [`TestHarness::provision`] starts the shared container and registers
//!    its connection properties.
//! 2. [`TestHarness::application_context`] resolves the binder's settings,
//!    with the dynamic properties taking precedence over static ones.
//!
//! A context can only be built from a provisioned harness, so the binder
//! never sees placeholder endpoints.

use crate::localstack::{LocalstackContainer, StartedLocalstack, localstack};
use crate::properties::register_properties;
use kinesis_config::{
    AwsProperties, DynamicPropertyRegistry, LayeredProperties, PropertySource, StaticProperties,
};
use kinesis_errors::FixtureResult;
use std::sync::Arc;

pub struct TestHarness {
    localstack: StartedLocalstack<'static>,
    registry: Arc<DynamicPropertyRegistry>
}

impl TestHarness {
    /// Provisions the process-wide container.
    pub async fn provision() -> FixtureResult<Self> {
        Self::provision_with(localstack()).await
    }

    pub async fn provision_with(handle: &'static LocalstackContainer) -> FixtureResult<Self> {
        let started = handle.start().await?;
        let registry = Arc::new(DynamicPropertyRegistry::new());
        register_properties(started, &registry);

        Ok(Self {
            localstack: started,
            registry
        })
    }

    /// Provisions the process-wide container, or returns `None` when Docker
    /// tests are disabled (`SKIP_DOCKER_TESTS`) or no Docker daemon is
    /// reachable.
    ///
    /// # Panics
    /// On any other provisioning failure, so a broken container fails the
    /// test instead of skipping it.
    pub async fn provision_or_skip() -> Option<Self> {
        if std::env::var("SKIP_DOCKER_TESTS").is_ok() {
            tracing::warn!("Skipping LocalStack test: SKIP_DOCKER_TESTS is set");
            return None;
        }

        match Self::provision().await {
            Ok(harness) => Some(harness),
            Err(e) if e.is_docker_unavailable() => {
                tracing::warn!("Skipping LocalStack test: Docker not available: {}", e);
                None
            }
            Err(e) => panic!("LocalStack fixture failed to start: {}", e)
        }
    }

    pub fn localstack(&self) -> &'static LocalstackContainer {
        self.localstack.handle()
    }

    pub fn registry(&self) -> &DynamicPropertyRegistry {
        &self.registry
    }

    /// Builds the application context over `static_properties`.
    pub fn application_context(
        &self,
        static_properties: StaticProperties
    ) -> FixtureResult<ApplicationContext> {
        let properties = LayeredProperties::new()
            .with_layer(self.registry.clone())
            .with_layer(Arc::new(static_properties));
        let aws = AwsProperties::resolve(&properties)?;

        Ok(ApplicationContext { properties, aws })
    }
}

/// Resolved configuration handed to the binder under test.
pub struct ApplicationContext {
    properties: LayeredProperties,
    aws: AwsProperties
}

impl ApplicationContext {
    pub fn aws(&self) -> &AwsProperties {
        &self.aws
    }

    pub fn property(&self, name: &str) -> Option<String> {
        self.properties.property(name)
    }
}
