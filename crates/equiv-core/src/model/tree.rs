//! Immutable syntax trees.
//!
//! A `SyntaxTree` owns its source text and a flat arena of nodes; `Node` is a
//! cheap `Copy` handle into that arena. Handles compare by identity: two
//! structurally identical subtrees are still different nodes.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;

use crate::error::EquivError;
use super::language::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct NodeData {
    kind: &'static str,
    field: Option<&'static str>,
    range: Range<usize>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    named: bool,
}

#[derive(Debug)]
pub struct SyntaxTree {
    language: &'static Language,
    source: String,
    nodes: Vec<NodeData>,
}

impl SyntaxTree {
    pub fn root(&self) -> Node<'_> {
        Node {
            tree: self,
            id: NodeId(0),
        }
    }

    pub fn language(&self) -> &'static Language {
        self.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        (id.index() < self.nodes.len()).then_some(Node { tree: self, id })
    }

    /// Copy a tree-sitter tree into an arena tree. Anonymous tokens are kept so
    /// that delimiters and keywords stay visible to the engine.
    pub fn from_tree_sitter(
        tree: &tree_sitter::Tree,
        source: &str,
        language: &'static Language,
    ) -> Self {
        let mut nodes = Vec::new();
        let mut cursor = tree.walk();
        copy_ts_node(&mut cursor, None, &mut nodes);
        Self {
            language,
            source: source.to_string(),
            nodes,
        }
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

fn copy_ts_node(
    cursor: &mut tree_sitter::TreeCursor,
    parent: Option<NodeId>,
    nodes: &mut Vec<NodeData>,
) -> NodeId {
    let node = cursor.node();
    let id = NodeId(nodes.len() as u32);
    nodes.push(NodeData {
        kind: node.kind(),
        field: cursor.field_name(),
        range: node.start_byte()..node.end_byte(),
        parent,
        children: Vec::new(),
        named: node.is_named(),
    });

    if cursor.goto_first_child() {
        loop {
            let child = copy_ts_node(cursor, Some(id), nodes);
            nodes[id.index()].children.push(child);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }
    id
}

/// Handle to one element of a `SyntaxTree`.
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> Node<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> &'static str {
        self.tree.data(self.id).kind
    }

    /// Name of the position this node occupies in its parent, if any.
    pub fn field_name(&self) -> Option<&'static str> {
        self.tree.data(self.id).field
    }

    pub fn language(&self) -> &'static Language {
        self.tree.language
    }

    pub fn text(&self) -> &'t str {
        let range = self.tree.data(self.id).range.clone();
        &self.tree.source[range]
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.tree.data(self.id).range.clone()
    }

    pub fn start_line(&self) -> usize {
        let start = self.tree.data(self.id).range.start;
        self.tree.source[..start].matches('\n').count() + 1
    }

    pub fn end_line(&self) -> usize {
        let end = self.tree.data(self.id).range.end;
        self.tree.source[..end].matches('\n').count() + 1
    }

    pub fn is_named(&self) -> bool {
        self.tree.data(self.id).named
    }

    pub fn is_leaf(&self) -> bool {
        self.tree.data(self.id).children.is_empty()
    }

    pub fn parent(&self) -> Option<Node<'t>> {
        self.tree.data(self.id).parent.map(|id| Node { tree: self.tree, id })
    }

    pub fn child_count(&self) -> usize {
        self.tree.data(self.id).children.len()
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'t>> + 't {
        let tree = self.tree;
        tree.data(self.id)
            .children
            .iter()
            .map(move |&id| Node { tree, id })
    }

    pub fn named_children(&self) -> impl Iterator<Item = Node<'t>> + 't {
        self.children().filter(|c| c.is_named())
    }

    pub fn child_by_field(&self, field: &str) -> Option<Node<'t>> {
        self.children().find(|c| c.field_name() == Some(field))
    }

    pub fn children_by_field<'f>(&self, field: &'f str) -> impl Iterator<Item = Node<'t>> + 'f
    where
        't: 'f,
    {
        self.children().filter(move |c| c.field_name() == Some(field))
    }

    pub fn children_of_kind<'f>(&self, kind: &'f str) -> impl Iterator<Item = Node<'t>> + 'f
    where
        't: 'f,
    {
        self.children().filter(move |c| c.kind() == kind)
    }

    /// Pre-order walk of this node and everything below it.
    pub fn descendants(&self) -> Descendants<'t> {
        Descendants {
            tree: self.tree,
            stack: vec![self.id],
        }
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl Hash for Node<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.tree, state);
        self.id.hash(state);
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind(), self.id.0)?;
        if self.is_leaf() {
            write!(f, "({:?})", self.text())?;
        }
        Ok(())
    }
}

pub struct Descendants<'t> {
    tree: &'t SyntaxTree,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.data(id).children.iter().rev().copied());
        Some(Node {
            tree: self.tree,
            id,
        })
    }
}

const UNSET: usize = usize::MAX;

/// Builds a `SyntaxTree` bottom-up from nested `start_node`/`finish_node`
/// calls. Token texts are joined with single spaces to form the tree source.
///
/// Misuse (closing more nodes than were opened, a second root) is recorded and
/// reported by `finish`, so calls can be chained freely.
pub struct TreeBuilder {
    language: &'static Language,
    source: String,
    nodes: Vec<NodeData>,
    stack: Vec<NodeId>,
    error: Option<&'static str>,
}

impl TreeBuilder {
    pub fn new(language: &'static Language) -> Self {
        Self {
            language,
            source: String::new(),
            nodes: Vec::new(),
            stack: Vec::new(),
            error: None,
        }
    }

    pub fn start_node(&mut self, kind: &'static str) -> &mut Self {
        self.open(None, kind)
    }

    pub fn start_field(&mut self, field: &'static str, kind: &'static str) -> &mut Self {
        self.open(Some(field), kind)
    }

    pub fn token(&mut self, kind: &'static str, text: &str) -> &mut Self {
        self.leaf(None, kind, text)
    }

    pub fn field_token(&mut self, field: &'static str, kind: &'static str, text: &str) -> &mut Self {
        self.leaf(Some(field), kind, text)
    }

    pub fn finish_node(&mut self) -> &mut Self {
        match self.stack.pop() {
            Some(id) => {
                let end = self.source.len();
                let range = &mut self.nodes[id.index()].range;
                range.end = end;
                if range.start == UNSET {
                    range.start = end;
                }
            }
            None => self.fail("finish_node without a matching start_node"),
        }
        self
    }

    pub fn finish(self) -> Result<SyntaxTree, EquivError> {
        if let Some(message) = self.error {
            return Err(EquivError::UnbalancedTree(message));
        }
        if !self.stack.is_empty() {
            return Err(EquivError::UnbalancedTree("unclosed node"));
        }
        if self.nodes.is_empty() {
            return Err(EquivError::UnbalancedTree("empty tree"));
        }
        Ok(SyntaxTree {
            language: self.language,
            source: self.source,
            nodes: self.nodes,
        })
    }

    fn open(&mut self, field: Option<&'static str>, kind: &'static str) -> &mut Self {
        let Some(parent) = self.attach_point() else {
            return self;
        };
        let id = self.push(field, kind, parent, UNSET..UNSET);
        self.stack.push(id);
        self
    }

    fn leaf(&mut self, field: Option<&'static str>, kind: &'static str, text: &str) -> &mut Self {
        let Some(parent) = self.attach_point() else {
            return self;
        };
        if !self.source.is_empty() {
            self.source.push(' ');
        }
        let start = self.source.len();
        self.source.push_str(text);
        self.push(field, kind, parent, start..self.source.len());

        // Open nodes start at their first token.
        for &open in &self.stack {
            let range = &mut self.nodes[open.index()].range;
            if range.start == UNSET {
                range.start = start;
            }
        }
        self
    }

    /// Parent for the next node: `Some(None)` for the root, `None` on misuse.
    fn attach_point(&mut self) -> Option<Option<NodeId>> {
        match self.stack.last() {
            Some(&top) => Some(Some(top)),
            None if self.nodes.is_empty() => Some(None),
            None => {
                self.fail("tree already has a root");
                None
            }
        }
    }

    fn push(
        &mut self,
        field: Option<&'static str>,
        kind: &'static str,
        parent: Option<NodeId>,
        range: Range<usize>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            field,
            range,
            parent,
            children: Vec::new(),
            named: true,
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }

    fn fail(&mut self, message: &'static str) {
        if self.error.is_none() {
            self.error = Some(message);
        }
    }
}
