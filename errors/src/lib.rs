//! # Fixture Errors
//!
//! Error handling for the LocalStack test fixture and its configuration
//! bridge.
//!
//! - Uses `thiserror` for structured error definitions
//! - Named fields on every variant so messages stay self-describing
//! - No local recovery: every error is meant to propagate to the test runner

use thiserror::Error;

/// Configuration resolution errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required property: {name}")]
    MissingProperty { name: String },

    #[error("Failed to parse {format} properties: {reason}")]
    ParseError { format: String, reason: String },

    #[error("Failed to read properties file {path}: {reason}")]
    FileError { path: String, reason: String },

    #[error("Validation failed: {reason}")]
    ValidationError { reason: String }
}

/// Container lifecycle errors
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to start container {image}: {reason}")]
    ContainerStart { image: String, reason: String },

    #[error("Docker is not reachable, cannot start {image}: {reason}")]
    DockerUnavailable { image: String, reason: String },

    #[error("Failed to resolve mapped port {port} for {image}: {reason}")]
    PortMapping {
        image: String,
        port: u16,
        reason: String
    },

    #[error("Container {image} was stopped and cannot be restarted in this process")]
    Terminated { image: String },

    #[error("Failed to run {command} in container {image}: {reason}")]
    Exec {
        image: String,
        command: String,
        reason: String
    },

    #[error("Failed to stop container {image}: {reason}")]
    Teardown { image: String, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError)
}

impl FixtureError {
    /// Whether the error means no container runtime is reachable.
    ///
    /// Suites use this to skip rather than fail on machines without Docker.
    /// Every other start failure, including errors reported by a reachable
    /// daemon, must fail the test.
    pub fn is_docker_unavailable(&self) -> bool {
        matches!(self, Self::DockerUnavailable { .. })
    }
}

/// Result alias for fixture operations
pub type FixtureResult<T> = Result<T, FixtureError>;

/// Result alias for configuration resolution
pub type ConfigResult<T> = Result<T, ConfigError>;
