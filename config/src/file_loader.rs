//! # Static Property Files
//!
//! Loads the static application properties a test context ships with from
//! TOML or YAML. Nested tables are flattened into dotted keys, so
//!
//! ```yaml
//! spring:
//!   cloud:
//!     aws:
//!       region:
//!         static: eu-west-1
//! ```
//!
//! becomes `spring.cloud.aws.region.static = eu-west-1`.
//!
//! Supports automatic format detection based on file extension.

use crate::registry::PropertySource;
use kinesis_errors::{ConfigError, ConfigResult};
use std::collections::BTreeMap;
use std::path::Path;

/// Flat, immutable key/value properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticProperties {
    values: BTreeMap<String, String>
}

impl StaticProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn from_yaml_str(contents: &str) -> ConfigResult<Self> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(contents).map_err(|e| ConfigError::ParseError {
                format: "yaml".to_string(),
                reason: e.to_string()
            })?;

        let mut values = BTreeMap::new();
        flatten_yaml(None, &value, &mut values);
        Ok(Self { values })
    }

    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let table: toml::Table = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            format: "toml".to_string(),
            reason: e.to_string()
        })?;

        let mut values = BTreeMap::new();
        for (key, value) in &table {
            flatten_toml(key, value, &mut values);
        }
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl PropertySource for StaticProperties {
    fn property(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }

    fn source_name(&self) -> &str {
        "static"
    }
}

fn join_key(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}.{}", prefix, key),
        None => key.to_string()
    }
}

fn flatten_yaml(prefix: Option<&str>, value: &serde_yaml::Value, out: &mut BTreeMap<String, String>) {
    use serde_yaml::Value;

    match value {
        Value::Mapping(mapping) => {
            for (key, nested) in mapping {
                let key = match key {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => continue
                };
                flatten_yaml(Some(&join_key(prefix, &key)), nested, out);
            }
        }
        Value::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                let key = format!("{}[{}]", prefix.unwrap_or_default(), index);
                flatten_yaml(Some(&key), item, out);
            }
        }
        Value::Tagged(tagged) => flatten_yaml(prefix, &tagged.value, out),
        Value::Null => {}
        Value::String(s) => insert_leaf(prefix, s.clone(), out),
        Value::Number(n) => insert_leaf(prefix, n.to_string(), out),
        Value::Bool(b) => insert_leaf(prefix, b.to_string(), out)
    }
}

fn flatten_toml(key: &str, value: &toml::Value, out: &mut BTreeMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (nested_key, nested) in table {
                flatten_toml(&join_key(Some(key), nested_key), nested, out);
            }
        }
        toml::Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_toml(&format!("{}[{}]", key, index), item, out);
            }
        }
        toml::Value::String(s) => {
            out.insert(key.to_string(), s.clone());
        }
        other => {
            out.insert(key.to_string(), other.to_string());
        }
    }
}

fn insert_leaf(prefix: Option<&str>, value: String, out: &mut BTreeMap<String, String>) {
    if let Some(key) = prefix {
        out.insert(key.to_string(), value);
    }
}

fn read_file(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::FileError {
        path: path.display().to_string(),
        reason: e.to_string()
    })
}

/// Load static properties from a TOML file.
pub fn load_from_toml(path: &Path) -> ConfigResult<StaticProperties> {
    StaticProperties::from_toml_str(&read_file(path)?)
}

/// Load static properties from a YAML file.
pub fn load_from_yaml(path: &Path) -> ConfigResult<StaticProperties> {
    StaticProperties::from_yaml_str(&read_file(path)?)
}

/// Load static properties, detecting the format from the file extension.
///
/// ## Supported Formats
/// - `.toml`: TOML format
/// - `.yaml` / `.yml`: YAML format
pub fn load_from_file(path: &Path) -> ConfigResult<StaticProperties> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| ConfigError::FileError {
            path: path.display().to_string(),
            reason: "file has no extension".to_string()
        })?;

    match extension.to_lowercase().as_str() {
        "toml" => load_from_toml(path),
        "yaml" | "yml" => load_from_yaml(path),
        other => Err(ConfigError::ParseError {
            format: other.to_string(),
            reason: "unsupported properties format".to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_yaml_nested_keys_are_flattened() {
        let yaml = r#"
spring:
  cloud:
    aws:
      endpoint: http://placeholder:4566
      region:
        static: eu-west-1
      credentials:
        access-key: placeholder
    stream:
      bindings:
        - input
        - output
"#;
        let props = StaticProperties::from_yaml_str(yaml).unwrap();
        assert_eq!(
            props.property("spring.cloud.aws.endpoint").as_deref(),
            Some("http://placeholder:4566")
        );
        assert_eq!(
            props.property("spring.cloud.aws.region.static").as_deref(),
            Some("eu-west-1")
        );
        assert_eq!(
            props.property("spring.cloud.aws.credentials.access-key").as_deref(),
            Some("placeholder")
        );
        assert_eq!(
            props.property("spring.cloud.stream.bindings[1]").as_deref(),
            Some("output")
        );
    }

    #[test]
    fn test_toml_nested_keys_are_flattened() {
        let toml = r#"
[spring.cloud.aws]
endpoint = "http://placeholder:4566"

[spring.cloud.aws.region]
static = "eu-west-1"

[spring.cloud.stream]
checkpoint-interval = 100
"#;
        let props = StaticProperties::from_toml_str(toml).unwrap();
        assert_eq!(
            props.property("spring.cloud.aws.region.static").as_deref(),
            Some("eu-west-1")
        );
        assert_eq!(
            props.property("spring.cloud.stream.checkpoint-interval").as_deref(),
            Some("100")
        );
    }

    #[test]
    fn test_invalid_yaml_is_a_parse_error() {
        let err = StaticProperties::from_yaml_str("spring: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { ref format, .. } if format == "yaml"));
    }

    #[test]
    fn test_load_from_file_detects_format() {
        let mut file = Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "spring:\n  cloud:\n    aws:\n      region:\n        static: us-west-2")
            .unwrap();

        let props = load_from_file(file.path()).unwrap();
        assert_eq!(
            props.property("spring.cloud.aws.region.static").as_deref(),
            Some("us-west-2")
        );
    }

    #[test]
    fn test_load_from_file_rejects_unknown_extension() {
        let file = Builder::new().suffix(".ini").tempfile().unwrap();
        let err = load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { ref format, .. } if format == "ini"));
    }

    #[test]
    fn test_missing_file_is_a_file_error() {
        let err = load_from_toml(Path::new("/nonexistent/application.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileError { .. }));
    }
}
