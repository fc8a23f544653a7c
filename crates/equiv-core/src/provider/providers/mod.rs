pub mod groovy;
pub mod java;

use crate::provider::registry::ProviderRegistry;

pub fn create_default_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    registry.register(Box::new(groovy::GroovyEquivalenceDescriptorProvider));
    registry.register(Box::new(java::JavaEquivalenceDescriptorProvider));

    registry
}
