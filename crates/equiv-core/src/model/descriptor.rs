//! Equivalence descriptors.
//!
//! A descriptor lists the children of one node that take part in an
//! equivalence comparison. Entries are grouped into slots, one slot per
//! builder call, so descriptors of the same node kind line up slot by slot
//! even when an optional child is missing on one side.

use serde::{Deserialize, Serialize};

use super::tree::Node;

/// Semantic position of a child inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildRole {
    VariableName,
    FunctionName,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Optionality {
    Mandatory,
    /// May be missing on either side.
    Optional,
    /// May be missing on the pattern side of a pattern match only.
    OptionalInPattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Single,
    Sequence,
    /// Statement sequence; a pattern may match a contiguous run of it.
    CodeBlock,
}

#[derive(Debug, Clone, Copy)]
pub struct DescriptorEntry<'t> {
    pub node: Node<'t>,
    pub role: ChildRole,
    pub optionality: Optionality,
    pub slot: usize,
    pub kind: SlotKind,
}

#[derive(Debug, Clone)]
pub struct Descriptor<'t> {
    entries: Vec<DescriptorEntry<'t>>,
    slots: Vec<(SlotKind, Optionality)>,
    declaration_list: bool,
}

impl<'t> Descriptor<'t> {
    pub fn entries(&self) -> &[DescriptorEntry<'t>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Kind and optionality the builder declared for `slot`, whether or not it holds entries.
    pub fn slot_shape(&self, slot: usize) -> Option<(SlotKind, Optionality)> {
        self.slots.get(slot).copied()
    }

    pub fn slot_entries(&self, slot: usize) -> impl Iterator<Item = &DescriptorEntry<'t>> + '_ {
        self.entries.iter().filter(move |e| e.slot == slot)
    }

    pub fn nodes(&self) -> impl Iterator<Item = Node<'t>> + '_ {
        self.entries.iter().map(|e| e.node)
    }

    /// Built from declared variables; spliced into enclosing sequences.
    pub fn is_declaration_list(&self) -> bool {
        self.declaration_list
    }
}

/// Chained builder used by providers.
///
/// Every call consumes one slot, including calls whose node is absent: the
/// entry is simply not recorded.
pub struct DescriptorBuilder<'t> {
    entries: Vec<DescriptorEntry<'t>>,
    slots: Vec<(SlotKind, Optionality)>,
    declaration_list: bool,
}

impl<'t> DescriptorBuilder<'t> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            slots: Vec::new(),
            declaration_list: false,
        }
    }

    pub fn element(self, node: Option<Node<'t>>) -> Self {
        self.single(node, Optionality::Mandatory)
    }

    pub fn optionally(self, node: Option<Node<'t>>) -> Self {
        self.single(node, Optionality::Optional)
    }

    pub fn optionally_in_pattern(self, node: Option<Node<'t>>) -> Self {
        self.single(node, Optionality::OptionalInPattern)
    }

    pub fn elements(self, nodes: impl IntoIterator<Item = Node<'t>>) -> Self {
        self.many(nodes, SlotKind::Sequence)
    }

    pub fn code_block(self, statements: impl IntoIterator<Item = Node<'t>>) -> Self {
        self.many(statements, SlotKind::CodeBlock)
    }

    /// Like `elements`, and marks the descriptor as a declaration list.
    pub fn declared_variables(mut self, variables: impl IntoIterator<Item = Node<'t>>) -> Self {
        self.declaration_list = true;
        self.many(variables, SlotKind::Sequence)
    }

    /// Tag an already added node with a role. Absent nodes are ignored.
    pub fn role(mut self, node: Option<Node<'t>>, role: ChildRole) -> Self {
        if let Some(node) = node {
            for entry in self.entries.iter_mut().filter(|e| e.node == node) {
                entry.role = role;
            }
        }
        self
    }

    pub fn build(self) -> Descriptor<'t> {
        Descriptor {
            entries: self.entries,
            slots: self.slots,
            declaration_list: self.declaration_list,
        }
    }

    fn single(mut self, node: Option<Node<'t>>, optionality: Optionality) -> Self {
        let slot = self.next_slot(SlotKind::Single, optionality);
        if let Some(node) = node {
            self.entries.push(DescriptorEntry {
                node,
                role: ChildRole::None,
                optionality,
                slot,
                kind: SlotKind::Single,
            });
        }
        self
    }

    fn many(mut self, nodes: impl IntoIterator<Item = Node<'t>>, kind: SlotKind) -> Self {
        let slot = self.next_slot(kind, Optionality::Mandatory);
        self.entries.extend(nodes.into_iter().map(|node| DescriptorEntry {
            node,
            role: ChildRole::None,
            optionality: Optionality::Mandatory,
            slot,
            kind,
        }));
        self
    }

    fn next_slot(&mut self, kind: SlotKind, optionality: Optionality) -> usize {
        self.slots.push((kind, optionality));
        self.slots.len() - 1
    }
}

impl Default for DescriptorBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::language::GROOVY;
    use crate::model::tree::TreeBuilder;

    #[test]
    fn test_absent_nodes_consume_slots() {
        let mut b = TreeBuilder::new(&GROOVY);
        b.start_node("PARAMETER")
            .field_token("name", "IDENTIFIER", "x")
            .field_token("type", "IDENTIFIER", "int")
            .finish_node();
        let tree = b.finish().unwrap();
        let root = tree.root();
        let name = root.child_by_field("name");

        let descriptor = DescriptorBuilder::new()
            .element(name)
            .optionally(root.child_by_field("type"))
            .optionally_in_pattern(root.child_by_field("default"))
            .role(name, ChildRole::VariableName)
            .build();

        assert_eq!(descriptor.len(), 2);
        assert_eq!(descriptor.slot_count(), 3);
        assert_eq!(descriptor.slot_entries(2).count(), 0);
        assert_eq!(
            descriptor.slot_shape(2),
            Some((SlotKind::Single, Optionality::OptionalInPattern))
        );
        assert_eq!(descriptor.entries()[0].role, ChildRole::VariableName);
        assert_eq!(descriptor.entries()[1].role, ChildRole::None);
        assert_eq!(descriptor.entries()[1].optionality, Optionality::Optional);
    }

    #[test]
    fn test_declared_variables_marks_declaration_list() {
        let mut b = TreeBuilder::new(&GROOVY);
        b.start_node("VARIABLE_DEFINITION")
            .field_token("name", "IDENTIFIER", "a")
            .field_token("name", "IDENTIFIER", "b")
            .finish_node();
        let tree = b.finish().unwrap();

        let descriptor = DescriptorBuilder::new()
            .declared_variables(tree.root().children())
            .build();
        assert!(descriptor.is_declaration_list());
        assert_eq!(descriptor.slot_count(), 1);
        assert_eq!(descriptor.slot_entries(0).count(), 2);
        assert!(descriptor
            .entries()
            .iter()
            .all(|e| e.optionality == Optionality::Mandatory && e.role == ChildRole::None));
    }
}
