use std::collections::BTreeMap;

use super::container::ComponentType;

/// Maps the type descriptors written in app configuration
/// (`component.<name>=<descriptor>`) to constructible component types.
///
/// Applications fill the catalog at startup with every type they are willing
/// to have wired from configuration.
#[derive(Debug, Clone, Default)]
pub struct ComponentCatalog {
    types: BTreeMap<String, ComponentType>,
}

impl ComponentCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `component` under `descriptor`, replacing any earlier entry.
    pub fn register(&mut self, descriptor: impl Into<String>, component: ComponentType) -> &mut Self {
        self.types.insert(descriptor.into(), component);
        self
    }

    /// Builder-style [`ComponentCatalog::register`].
    #[must_use]
    pub fn with(mut self, descriptor: impl Into<String>, component: ComponentType) -> Self {
        self.register(descriptor, component);
        self
    }

    #[must_use]
    pub fn resolve(&self, descriptor: &str) -> Option<&ComponentType> {
        self.types.get(descriptor.trim())
    }

    /// Known descriptors in sorted order.
    pub fn descriptors(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
