use std::collections::HashMap;

use tracing::debug;

use super::plugin::EquivalenceDescriptorProvider;
use crate::model::tree::Node;

pub struct ProviderRegistry {
    providers: Vec<Box<dyn EquivalenceDescriptorProvider>>,
    language_map: HashMap<&'static str, usize>, // language id → index into providers
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            language_map: HashMap::new(),
        }
    }

    /// Later registrations for the same language win.
    pub fn register(&mut self, provider: Box<dyn EquivalenceDescriptorProvider>) {
        let idx = self.providers.len();
        let language = provider.language();
        debug!(provider = provider.id(), language = language.id, "registering provider");
        self.language_map.insert(language.id, idx);
        self.providers.push(provider);
    }

    /// Pick exactly one provider for `node`: its own language first, then the
    /// languages it is a dialect of, then any provider claiming the context.
    pub fn get_provider(&self, node: Node<'_>) -> Option<&dyn EquivalenceDescriptorProvider> {
        for language in node.language().lineage() {
            if let Some(&idx) = self.language_map.get(language.id) {
                return Some(self.providers[idx].as_ref());
            }
        }
        let found = self
            .providers
            .iter()
            .find(|p| p.is_my_context(node))
            .map(|p| p.as_ref());
        if found.is_none() {
            debug!(language = node.language().id, "no provider, using generic comparison");
        }
        found
    }

    pub fn get_provider_by_id(&self, id: &str) -> Option<&dyn EquivalenceDescriptorProvider> {
        self.providers.iter().find(|p| p.id() == id).map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
