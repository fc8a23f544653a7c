//! Canonical child sequences.
//!
//! Before two sequences are compared position by position, noise is removed
//! and declaration lists are flattened, so `int a, b;` and `int a; int b;`
//! both become the sequence `[a, b]`.

use crate::model::tree::Node;
use crate::provider::plugin::EquivalenceDescriptorProvider;

/// Drop ignored tokens and variable delimiters, splice declaration lists.
pub fn canonical_sequence<'t>(
    nodes: impl IntoIterator<Item = Node<'t>>,
    provider: Option<&dyn EquivalenceDescriptorProvider>,
) -> Vec<Node<'t>> {
    let Some(provider) = provider else {
        return nodes.into_iter().collect();
    };

    let mut out = Vec::new();
    for node in nodes {
        if is_noise(node, provider) {
            continue;
        }
        match provider.build_descriptor(node) {
            Some(descriptor) if descriptor.is_declaration_list() => {
                out.extend(descriptor.nodes());
            }
            _ => out.push(node),
        }
    }
    out
}

pub fn canonical_children<'t>(
    node: Node<'t>,
    provider: Option<&dyn EquivalenceDescriptorProvider>,
) -> Vec<Node<'t>> {
    canonical_sequence(node.children(), provider)
}

pub fn is_ignored(node: Node<'_>, provider: &dyn EquivalenceDescriptorProvider) -> bool {
    provider.ignored_tokens().contains(node.kind())
}

fn is_noise(node: Node<'_>, provider: &dyn EquivalenceDescriptorProvider) -> bool {
    is_ignored(node, provider)
        || node.is_leaf() && provider.variable_delimiters().contains(&node.kind())
}
