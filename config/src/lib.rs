//! # Configuration Bridge
//!
//! Property resolution for the Kinesis binder under test.
//!
//! This crate provides:
//! - A dynamic property registry whose values are lazy suppliers
//! - Static property files (TOML/YAML) flattened to dotted keys
//! - Layered precedence (dynamic > static)
//! - The `spring.cloud.aws.*` connection settings the binder reads,
//!   validated with the `validator` crate

pub mod aws;
pub mod file_loader;
pub mod precedence;
pub mod registry;

pub use aws::{
    ACCESS_KEY_PROPERTY, AwsProperties, ENDPOINT_PROPERTY, REGION_PROPERTY, SECRET_KEY_PROPERTY,
};
pub use file_loader::{StaticProperties, load_from_file, load_from_toml, load_from_yaml};
pub use precedence::LayeredProperties;
pub use registry::{DynamicPropertyRegistry, PropertySource, PropertySupplier};
pub use validator::Validate;
