//! # Dynamic Property Registry
//!
//! Named properties whose values are produced by zero-argument suppliers.
//! Suppliers run on every lookup, so a value always reflects the state of
//! whatever it reads at resolution time rather than at registration time.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Lazily evaluated property value.
pub type PropertySupplier = Arc<dyn Fn() -> String + Send + Sync>;

/// Anything that can answer a property lookup by name.
pub trait PropertySource: Send + Sync {
    /// Resolves `name`, or `None` when this source does not define it.
    fn property(&self, name: &str) -> Option<String>;

    /// Human-readable name used in log output.
    fn source_name(&self) -> &str;
}

/// Registry of dynamic properties.
///
/// Registering the same name twice replaces the earlier supplier.
///
/// ## Usage
/// ```rust
/// use kinesis_config::{DynamicPropertyRegistry, PropertySource};
///
/// let registry = DynamicPropertyRegistry::new();
/// registry.add("spring.cloud.aws.region.static", || "us-east-1".to_string());
/// assert_eq!(
///     registry.property("spring.cloud.aws.region.static").as_deref(),
///     Some("us-east-1")
/// );
/// ```
#[derive(Default)]
pub struct DynamicPropertyRegistry {
    suppliers: RwLock<BTreeMap<String, PropertySupplier>>
}

impl DynamicPropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&self, name: impl Into<String>, supplier: F)
    where
        F: Fn() -> String + Send + Sync + 'static
    {
        let name = name.into();
        tracing::debug!(property = %name, "Registered dynamic property");
        self.suppliers.write().insert(name, Arc::new(supplier));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.suppliers.read().contains_key(name)
    }

    /// Registered property names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.suppliers.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.suppliers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppliers.read().is_empty()
    }
}

impl PropertySource for DynamicPropertyRegistry {
    fn property(&self, name: &str) -> Option<String> {
        // Clone the supplier out so it runs without holding the lock.
        let supplier = self.suppliers.read().get(name).cloned()?;
        Some(supplier())
    }

    fn source_name(&self) -> &str {
        "dynamic"
    }
}

impl fmt::Debug for DynamicPropertyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicPropertyRegistry")
            .field("names", &self.names())
            .finish()
    }
}
