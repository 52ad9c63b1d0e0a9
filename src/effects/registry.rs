//! Effect registry for managing available effect families
//!
//! The registry holds all registered factories in registration order and
//! answers the host's lookups: by name, by file extension, and by what the
//! current device supports.

use std::sync::Arc;

use super::traits::EffectFactory;
use crate::gpu::ShaderDevice;

/// Registry of effect factories
pub struct EffectRegistry {
    factories: Vec<Arc<dyn EffectFactory>>,
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { factories: Vec::new() }
    }

    /// Registry with every built-in effect family
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(super::glsl::GlslEffectFactory);
        registry
    }

    /// Register a factory
    ///
    /// The first factory registered for an extension keeps it; later ones
    /// stay listed but are never returned by [`find_by_extension`](Self::find_by_extension).
    pub fn register(&mut self, factory: impl EffectFactory + 'static) {
        if let Some(existing) = self.find_by_extension(factory.extension()) {
            log::warn!(
                "Effect factory '{}' reuses extension '{}' already claimed by '{}'",
                factory.name(),
                factory.extension(),
                existing.name()
            );
        }
        self.factories.push(Arc::new(factory));
    }

    /// All factories in registration order
    pub fn all(&self) -> &[Arc<dyn EffectFactory>] {
        &self.factories
    }

    pub fn find_by_name(&self, name: &str) -> Option<Arc<dyn EffectFactory>> {
        self.factories.iter().find(|f| f.name() == name).cloned()
    }

    /// Factory for a file extension (case-sensitive, leading dot optional)
    pub fn find_by_extension(&self, extension: &str) -> Option<Arc<dyn EffectFactory>> {
        let extension = extension.trim_start_matches('.');
        self.factories
            .iter()
            .find(|f| f.extension() == extension)
            .cloned()
    }

    /// Factories the device can run
    pub fn supported(&self, device: &dyn ShaderDevice) -> Vec<Arc<dyn EffectFactory>> {
        self.factories
            .iter()
            .filter(|f| f.is_supported(device))
            .cloned()
            .collect()
    }

    /// Factory used for new documents
    pub fn first_supported(&self, device: &dyn ShaderDevice) -> Option<Arc<dyn EffectFactory>> {
        self.factories.iter().find(|f| f.is_supported(device)).cloned()
    }

    /// File dialog filters for every registered family
    pub fn file_filters(&self) -> Vec<String> {
        self.factories.iter().map(|f| f.file_filter()).collect()
    }

    /// Get the number of registered factories
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
