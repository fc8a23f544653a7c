use crate::engine::literal::LiteralValue;
use crate::model::descriptor::Descriptor;
use crate::model::language::Language;
use crate::model::token_set::TokenSet;
use crate::model::tree::Node;

/// Per-language knowledge the equivalence engine dispatches to.
pub trait EquivalenceDescriptorProvider: Send + Sync {
    fn id(&self) -> &str;

    fn language(&self) -> &'static Language;

    fn is_my_context(&self, node: Node<'_>) -> bool {
        node.language().is_kind_of(self.language())
    }

    /// `None` means no opinion: the engine compares raw children instead.
    fn build_descriptor<'t>(&self, node: Node<'t>) -> Option<Descriptor<'t>>;

    /// Token kinds separating sibling variable declarations.
    fn variable_delimiters(&self) -> &[&'static str];

    fn literals(&self) -> &TokenSet;

    /// Value of a node whose kind is in `literals()`.
    fn literal_value(&self, node: Node<'_>) -> LiteralValue {
        LiteralValue::parse(node.text())
    }

    fn node_cost(&self, node: Node<'_>) -> u32;

    fn ignored_tokens(&self) -> &TokenSet;
}
