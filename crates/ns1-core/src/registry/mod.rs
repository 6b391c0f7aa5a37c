//! Resource and data source registry
//!
//! The registry maps type names to implementations, so the provider can
//! dispatch an operation without a hardcoded match over every resource.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ns1_core::ResourceRegistry;
//!
//! let mut registry = ResourceRegistry::new();
//! registry.register_resource(Arc::new(ZoneResource::new(client.clone())));
//!
//! let zone = registry.resource("ns1_zone")?;
//! ```
//!
//! ## Registration
//!
//! Implementation crates expose a single function that registers everything
//! they provide:
//!
//! ```rust,ignore
//! // In ns1-provider crate
//! pub fn register(registry: &mut ResourceRegistry, client: Arc<Ns1Client>) {
//!     registry.register_resource(Arc::new(ZoneResource::new(client.clone())));
//!     // ...
//! }
//! ```

use crate::error::{Error, Result};
use crate::traits::{DataSource, Resource};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registry of resource and data source implementations
///
/// Built once at startup and read-only afterwards; lookups hand out shared
/// handles so callbacks for distinct instances can run concurrently.
#[derive(Default)]
pub struct ResourceRegistry {
    /// Registered resources by type name
    resources: BTreeMap<String, Arc<dyn Resource>>,

    /// Registered data sources by type name
    data_sources: BTreeMap<String, Arc<dyn DataSource>>,
}

impl ResourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource under its type name
    ///
    /// A later registration with the same name replaces the earlier one.
    pub fn register_resource(&mut self, resource: Arc<dyn Resource>) {
        let name = resource.type_name().to_string();
        if self.resources.insert(name.clone(), resource).is_some() {
            tracing::warn!("Resource {} registered twice, keeping the last", name);
        }
    }

    /// Register a data source under its type name
    pub fn register_data_source(&mut self, data_source: Arc<dyn DataSource>) {
        let name = data_source.type_name().to_string();
        if self.data_sources.insert(name.clone(), data_source).is_some() {
            tracing::warn!("Data source {} registered twice, keeping the last", name);
        }
    }

    /// Look up a resource implementation
    pub fn resource(&self, name: &str) -> Result<Arc<dyn Resource>> {
        self.resources
            .get(name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown resource type: {}", name)))
    }

    /// Look up a data source implementation
    pub fn data_source(&self, name: &str) -> Result<Arc<dyn DataSource>> {
        self.data_sources
            .get(name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown data source type: {}", name)))
    }

    /// List all registered resource types, sorted
    pub fn list_resources(&self) -> Vec<String> {
        self.resources.keys().cloned().collect()
    }

    /// List all registered data source types, sorted
    pub fn list_data_sources(&self) -> Vec<String> {
        self.data_sources.keys().cloned().collect()
    }

    /// Check if a resource type is registered
    pub fn has_resource(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    /// Check if a data source type is registered
    pub fn has_data_source(&self, name: &str) -> bool {
        self.data_sources.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ResourceData;
    use async_trait::async_trait;

    struct MockResource;

    #[async_trait]
    impl Resource for MockResource {
        fn type_name(&self) -> &'static str {
            "ns1_mock"
        }

        async fn create(&self, _data: &mut ResourceData) -> Result<()> {
            Ok(())
        }

        async fn read(&self, _data: &mut ResourceData) -> Result<()> {
            Ok(())
        }

        async fn update(&self, _data: &mut ResourceData) -> Result<()> {
            Ok(())
        }

        async fn delete(&self, _data: &mut ResourceData) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_registry_registration() {
        let mut registry = ResourceRegistry::new();

        // Initially empty
        assert!(!registry.has_resource("ns1_mock"));
        assert!(registry.resource("ns1_mock").is_err());

        registry.register_resource(Arc::new(MockResource));

        assert!(registry.has_resource("ns1_mock"));
        assert_eq!(registry.list_resources(), vec!["ns1_mock".to_string()]);
        assert!(registry.resource("ns1_mock").is_ok());
        assert!(!registry.has_data_source("ns1_mock"));
    }
}
