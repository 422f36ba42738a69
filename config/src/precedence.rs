//! # Property Precedence
//!
//! Resolves properties across several sources, first match wins.
//!
//! # Precedence Order
//! 1. Dynamic properties (highest priority)
//! 2. Static property files
//! 3. Anything pushed after those (lowest priority)

use crate::registry::PropertySource;
use std::sync::Arc;

/// Ordered stack of property sources.
#[derive(Clone, Default)]
pub struct LayeredProperties {
    layers: Vec<Arc<dyn PropertySource>>
}

impl LayeredProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source below every source already present.
    pub fn with_layer(mut self, source: Arc<dyn PropertySource>) -> Self {
        self.layers.push(source);
        self
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.source_name()).collect()
    }
}

impl PropertySource for LayeredProperties {
    fn property(&self, name: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| {
            let value = layer.property(name)?;
            tracing::debug!(
                property = name,
                source = layer.source_name(),
                "Resolved property"
            );
            Some(value)
        })
    }

    fn source_name(&self) -> &str {
        "layered"
    }
}
