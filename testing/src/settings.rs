//! # LocalStack Settings
//!
//! Settings the shared LocalStack container is created with.
//!
//! ## Environment Variables
//! - `LOCALSTACK_REGION`: Region reported to clients (default: "us-east-1")
//! - `LOCALSTACK_SERVICES`: Comma-separated emulated services
//!   (default: "kinesis,dynamodb,cloudwatch")
//! - `LOCALSTACK_PASSTHROUGH_ENV`: Comma-separated host variables copied into
//!   the container when present (default: "GITHUB_API_TOKEN")
//! - `LOCALSTACK_STARTUP_TIMEOUT_SECONDS`: Readiness timeout (default: 120)

use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

pub const LOCALSTACK_IMAGE: &str = "localstack/localstack";
/// Pinned emulator version. Bumping it is a compatibility decision.
pub const LOCALSTACK_TAG: &str = "2.2.0";
/// LocalStack edge port serving every emulated service.
pub const EDGE_PORT: u16 = 4566;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_ACCESS_KEY: &str = "test";
pub const DEFAULT_SECRET_KEY: &str = "test";
pub const DEFAULT_SERVICES: &[&str] = &["kinesis", "dynamodb", "cloudwatch"];
pub const DEFAULT_PASSTHROUGH_ENV: &[&str] = &["GITHUB_API_TOKEN"];
pub const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalstackSettings {
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub services: Vec<String>,
    /// Host variables forwarded verbatim into the container when set.
    pub passthrough_env: Vec<String>,
    pub startup_timeout: Duration
}

impl Default for LocalstackSettings {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            access_key: DEFAULT_ACCESS_KEY.to_string(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            services: DEFAULT_SERVICES.iter().map(|s| s.to_string()).collect(),
            passthrough_env: DEFAULT_PASSTHROUGH_ENV.iter().map(|s| s.to_string()).collect(),
            startup_timeout: Duration::from_secs(DEFAULT_STARTUP_TIMEOUT_SECS)
        }
    }
}

impl LocalstackSettings {
    /// Defaults overridden by `LOCALSTACK_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            region: env::var("LOCALSTACK_REGION").unwrap_or(defaults.region),
            access_key: defaults.access_key,
            secret_key: defaults.secret_key,
            services: env::var("LOCALSTACK_SERVICES")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.services),
            passthrough_env: env::var("LOCALSTACK_PASSTHROUGH_ENV")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.passthrough_env),
            startup_timeout: parse_env("LOCALSTACK_STARTUP_TIMEOUT_SECONDS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.startup_timeout)
        }
    }

    pub fn image(&self) -> String {
        format!("{}:{}", LOCALSTACK_IMAGE, LOCALSTACK_TAG)
    }

    /// Container environment, reading passthrough values from the process
    /// environment.
    pub fn container_env(&self) -> BTreeMap<String, String> {
        self.container_env_with(|name| env::var(name).ok())
    }

    /// Container environment with passthrough values taken from `lookup`.
    ///
    /// A passthrough name `lookup` knows nothing about is left out entirely,
    /// never set to an empty string.
    pub fn container_env_with<F>(&self, lookup: F) -> BTreeMap<String, String>
    where
        F: Fn(&str) -> Option<String>
    {
        let mut env = BTreeMap::new();
        env.insert("SERVICES".to_string(), self.services.join(","));
        env.insert("DEFAULT_REGION".to_string(), self.region.clone());
        env.insert("EAGER_SERVICE_LOADING".to_string(), "1".to_string());

        for name in &self.passthrough_env {
            if let Some(value) = lookup(name) {
                env.insert(name.clone(), value);
            }
        }

        env
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    match env::var(key) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                tracing::warn!(key, value = %value, "Ignoring unparseable setting");
                None
            }
        },
        Err(_) => None
    }
}
