//! Lock-step comparison of two syntax trees.
//!
//! Nodes are compared through their providers' descriptors when both sides
//! have one, and through canonical raw children otherwise. In pattern mode
//! the left tree is a search template: leaves spelled `$name$` match any
//! node and capture it, and children the template leaves out are allowed
//! wherever the descriptor says they are optional in patterns.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::normalize::{canonical_children, canonical_sequence, is_ignored};
use crate::config::EngineConfig;
use crate::model::descriptor::{ChildRole, Descriptor, DescriptorEntry, Optionality, SlotKind};
use crate::model::tree::Node;
use crate::provider::plugin::EquivalenceDescriptorProvider;
use crate::provider::registry::ProviderRegistry;

static PATTERN_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$([A-Za-z_][A-Za-z0-9_]*)\$$").expect("pattern variable regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Two pieces of real code.
    Code,
    /// Left side is a search template, right side is code.
    Pattern,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding<'t> {
    pub name: String,
    pub node: Node<'t>,
    pub role: ChildRole,
}

/// Pattern variables captured by a successful match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings<'t> {
    entries: Vec<Binding<'t>>,
}

impl<'t> Bindings<'t> {
    pub fn get(&self, name: &str) -> Option<Node<'t>> {
        self.entries.iter().find(|b| b.name == name).map(|b| b.node)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding<'t>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict<'t> {
    Match(Bindings<'t>),
    Mismatch,
    /// The comparison was abandoned after exceeding `max_cost`.
    CostExceeded,
}

impl<'t> Verdict<'t> {
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match(_))
    }

    pub fn into_bindings(self) -> Option<Bindings<'t>> {
        match self {
            Verdict::Match(bindings) => Some(bindings),
            _ => None,
        }
    }
}

/// Per-comparison scratch state.
pub(crate) struct MatchState<'c> {
    mode: MatchMode,
    bindings: Vec<Binding<'c>>,
    cost: u32,
    max_cost: Option<u32>,
    exceeded: bool,
}

impl<'c> MatchState<'c> {
    pub(crate) fn new(mode: MatchMode, max_cost: Option<u32>) -> Self {
        Self {
            mode,
            bindings: Vec::new(),
            cost: 0,
            max_cost,
            exceeded: false,
        }
    }

    fn charge(&mut self, cost: u32) -> bool {
        self.cost = self.cost.saturating_add(cost);
        if let Some(max) = self.max_cost {
            if self.cost > max && !self.exceeded {
                debug!(cost = self.cost, max, "comparison exceeded cost budget");
                self.exceeded = true;
            }
        }
        !self.exceeded
    }

    pub(crate) fn checkpoint(&self) -> usize {
        self.bindings.len()
    }

    pub(crate) fn rollback(&mut self, checkpoint: usize) {
        self.bindings.truncate(checkpoint);
    }

    pub(crate) fn into_verdict(self, matched: bool) -> Verdict<'c> {
        if self.exceeded {
            Verdict::CostExceeded
        } else if matched {
            Verdict::Match(Bindings {
                entries: self.bindings,
            })
        } else {
            Verdict::Mismatch
        }
    }
}

pub struct EquivalenceEngine<'r> {
    registry: &'r ProviderRegistry,
    config: EngineConfig,
}

impl<'r> EquivalenceEngine<'r> {
    pub fn new(registry: &'r ProviderRegistry) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    pub fn with_config(registry: &'r ProviderRegistry, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn compare<'p, 'c>(&self, a: Node<'p>, b: Node<'c>, mode: MatchMode) -> Verdict<'c> {
        let mut state = MatchState::new(mode, self.config.max_cost);
        let matched = self.match_nodes(a, b, ChildRole::None, &mut state);
        state.into_verdict(matched)
    }

    /// Code-vs-code equivalence.
    pub fn equivalent(&self, a: Node<'_>, b: Node<'_>) -> bool {
        self.compare(a, b, MatchMode::Code).is_match()
    }

    pub fn match_pattern<'p, 'c>(&self, pattern: Node<'p>, code: Node<'c>) -> Option<Bindings<'c>> {
        self.compare(pattern, code, MatchMode::Pattern).into_bindings()
    }

    pub fn canonical_children<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        canonical_children(node, self.registry.get_provider(node))
    }

    /// Normalize a sequence using the provider of its first node.
    pub fn canonical_sequence<'t>(&self, nodes: &[Node<'t>]) -> Vec<Node<'t>> {
        let provider = nodes.first().and_then(|n| self.registry.get_provider(*n));
        canonical_sequence(nodes.iter().copied(), provider)
    }

    pub fn node_cost(&self, node: Node<'_>) -> u32 {
        match self.registry.get_provider(node) {
            Some(p) if !is_ignored(node, p) => p.node_cost(node),
            _ => 0,
        }
    }

    /// Cost of a node and everything below it; ignored subtrees cost nothing.
    pub fn subtree_cost(&self, node: Node<'_>) -> u32 {
        let provider = self.registry.get_provider(node);
        subtree_cost_with(node, provider)
    }

    pub(crate) fn registry(&self) -> &'r ProviderRegistry {
        self.registry
    }

    pub(crate) fn match_nodes<'p, 'c>(
        &self,
        a: Node<'p>,
        b: Node<'c>,
        role: ChildRole,
        state: &mut MatchState<'c>,
    ) -> bool {
        let provider = self.shared_provider(a, b);
        let cost = match provider {
            Some(p) => p.node_cost(b),
            None => 0,
        };
        if !state.charge(cost) {
            return false;
        }
        trace!(pattern = a.kind(), code = b.kind(), ?role, "compare");

        if state.mode == MatchMode::Pattern {
            if let Some(name) = pattern_variable(a) {
                return self.bind(name, b, role, state);
            }
        }

        if self.is_anonymized(role) {
            return true;
        }

        if let Some(p) = provider {
            let literals = p.literals();
            if literals.contains(a.kind()) && literals.contains(b.kind()) {
                if !self.config.distinguish_literals {
                    return true;
                }
                return p.literal_value(a).same_value(&p.literal_value(b));
            }

            match (p.build_descriptor(a), p.build_descriptor(b)) {
                (Some(da), Some(db)) => {
                    return a.kind() == b.kind() && self.match_descriptors(&da, &db, p, state);
                }
                (None, None) => {}
                _ => return false,
            }
        }

        self.match_generic(a, b, provider, state)
    }

    fn match_generic<'p, 'c>(
        &self,
        a: Node<'p>,
        b: Node<'c>,
        provider: Option<&dyn EquivalenceDescriptorProvider>,
        state: &mut MatchState<'c>,
    ) -> bool {
        if a.kind() != b.kind() {
            return false;
        }
        if a.is_leaf() && b.is_leaf() {
            return a.text() == b.text();
        }
        let ca = canonical_children(a, provider);
        let cb = canonical_children(b, provider);
        self.match_positional(&ca, &cb, &[], state)
    }

    fn match_descriptors<'p, 'c>(
        &self,
        da: &Descriptor<'p>,
        db: &Descriptor<'c>,
        provider: &dyn EquivalenceDescriptorProvider,
        state: &mut MatchState<'c>,
    ) -> bool {
        let slots = da.slot_count().max(db.slot_count());
        for slot in 0..slots {
            let Some((kind, optionality)) = da.slot_shape(slot).or_else(|| db.slot_shape(slot)) else {
                continue;
            };
            let ea: Vec<&DescriptorEntry<'p>> = da.slot_entries(slot).collect();
            let eb: Vec<&DescriptorEntry<'c>> = db.slot_entries(slot).collect();

            let ok = match (ea.is_empty(), eb.is_empty()) {
                (true, true) => true,
                (false, false) => self.match_slot(kind, &ea, &eb, provider, state),
                (pattern_missing, _) => match optionality {
                    Optionality::Optional => true,
                    Optionality::OptionalInPattern => {
                        state.mode == MatchMode::Pattern && pattern_missing
                    }
                    Optionality::Mandatory => false,
                },
            };
            if !ok {
                return false;
            }
        }
        true
    }

    fn match_slot<'p, 'c>(
        &self,
        kind: SlotKind,
        ea: &[&DescriptorEntry<'p>],
        eb: &[&DescriptorEntry<'c>],
        provider: &dyn EquivalenceDescriptorProvider,
        state: &mut MatchState<'c>,
    ) -> bool {
        if kind == SlotKind::Single {
            return self.match_nodes(ea[0].node, eb[0].node, ea[0].role, state);
        }

        let roles: Vec<ChildRole> = ea.iter().map(|e| e.role).collect();
        let sa = canonical_sequence(ea.iter().map(|e| e.node), Some(provider));
        let sb = canonical_sequence(eb.iter().map(|e| e.node), Some(provider));
        // Splicing changes positions, so roles only carry over when it did not.
        let roles: &[ChildRole] = if sa.len() == roles.len() { &roles } else { &[] };

        if kind == SlotKind::CodeBlock && state.mode == MatchMode::Pattern {
            return self.match_contiguous(&sa, &sb, state).is_some();
        }
        self.match_positional(&sa, &sb, roles, state)
    }

    fn match_positional<'p, 'c>(
        &self,
        sa: &[Node<'p>],
        sb: &[Node<'c>],
        roles: &[ChildRole],
        state: &mut MatchState<'c>,
    ) -> bool {
        sa.len() == sb.len()
            && sa.iter().zip(sb).enumerate().all(|(i, (a, b))| {
                let role = roles.get(i).copied().unwrap_or(ChildRole::None);
                self.match_nodes(*a, *b, role, state)
            })
    }

    /// Find the first run of `code` matched element-wise by `pattern`.
    /// Returns the start index of the run.
    pub(crate) fn match_contiguous<'p, 'c>(
        &self,
        pattern: &[Node<'p>],
        code: &[Node<'c>],
        state: &mut MatchState<'c>,
    ) -> Option<usize> {
        if pattern.len() > code.len() {
            return None;
        }
        for start in 0..=code.len() - pattern.len() {
            let checkpoint = state.checkpoint();
            let window = &code[start..start + pattern.len()];
            if self.match_positional(pattern, window, &[], state) {
                return Some(start);
            }
            state.rollback(checkpoint);
            if state.exceeded {
                return None;
            }
        }
        None
    }

    fn bind<'c>(&self, name: &str, node: Node<'c>, role: ChildRole, state: &mut MatchState<'c>) -> bool {
        let previous = state.bindings.iter().find(|b| b.name == name).map(|b| b.node);
        match previous {
            Some(bound) => {
                let mut check = MatchState::new(MatchMode::Code, None);
                self.match_nodes(bound, node, role, &mut check)
            }
            None => {
                state.bindings.push(Binding {
                    name: name.to_string(),
                    node,
                    role,
                });
                true
            }
        }
    }

    fn is_anonymized(&self, role: ChildRole) -> bool {
        match role {
            ChildRole::VariableName => !self.config.distinguish_variables,
            ChildRole::FunctionName => !self.config.distinguish_functions,
            ChildRole::None => false,
        }
    }

    /// Provider for a pair of nodes; sides in unrelated languages get none.
    fn shared_provider(&self, a: Node<'_>, b: Node<'_>) -> Option<&'r dyn EquivalenceDescriptorProvider> {
        let pa = self.registry.get_provider(a)?;
        let pb = self.registry.get_provider(b)?;
        (pa.id() == pb.id()).then_some(pa)
    }
}

pub(crate) fn subtree_cost_with(
    node: Node<'_>,
    provider: Option<&dyn EquivalenceDescriptorProvider>,
) -> u32 {
    let Some(p) = provider else {
        return 0;
    };
    if is_ignored(node, p) {
        return 0;
    }
    p.node_cost(node)
        + node
            .children()
            .map(|c| subtree_cost_with(c, provider))
            .sum::<u32>()
}

fn pattern_variable<'a>(node: Node<'a>) -> Option<&'a str> {
    if !node.is_leaf() {
        return None;
    }
    PATTERN_VARIABLE
        .captures(node.text())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::language::{GROOVY, PLAIN_TEXT};
    use crate::model::tree::{SyntaxTree, TreeBuilder};
    use crate::provider::providers::create_default_registry;
    use crate::provider::providers::groovy::*;

    /// `def <name> = <value>` as a single-variable definition.
    fn definition(name: &str, value: Option<(&'static str, &str)>) -> SyntaxTree {
        let mut b = TreeBuilder::new(&GROOVY);
        b.start_node(VARIABLE_DEFINITION)
            .token("KW_DEF", "def")
            .start_node(VARIABLE)
            .field_token("name", "IDENTIFIER", name);
        if let Some((kind, text)) = value {
            b.token("ASSIGN", "=").field_token("initializer", kind, text);
        }
        b.finish_node().finish_node();
        b.finish().unwrap()
    }

    fn block(statements: &[(&str, &str)]) -> SyntaxTree {
        let mut b = TreeBuilder::new(&GROOVY);
        b.start_node(OPEN_BLOCK).token(LBRACE, "{");
        for (callee, arg) in statements {
            b.start_node("RETURN_STATEMENT")
                .token("KW_RETURN", "return")
                .start_node("METHOD_CALL")
                .token("IDENTIFIER", callee)
                .token("IDENTIFIER", arg)
                .finish_node()
                .finish_node()
                .token(NLS, "\n");
        }
        b.token(RBRACE, "}").finish_node();
        b.finish().unwrap()
    }

    #[test]
    fn test_identical_definitions_are_equivalent() {
        let registry = create_default_registry();
        let engine = EquivalenceEngine::new(&registry);
        let a = definition("x", Some(("NUM_INT", "1")));
        let b = definition("x", Some(("NUM_INT", "1")));
        assert!(engine.equivalent(a.root(), b.root()));
        assert!(a.root() != b.root());
    }

    #[test]
    fn test_literal_values_compare_by_value() {
        let registry = create_default_registry();
        let engine = EquivalenceEngine::new(&registry);
        let hex = definition("x", Some(("NUM_INT", "0x10")));
        let dec = definition("x", Some(("NUM_INT", "16")));
        let other = definition("x", Some(("NUM_INT", "17")));
        assert!(engine.equivalent(hex.root(), dec.root()));
        assert!(!engine.equivalent(hex.root(), other.root()));

        let engine = EquivalenceEngine::with_config(
            &registry,
            EngineConfig {
                distinguish_literals: false,
                ..EngineConfig::default()
            },
        );
        assert!(engine.equivalent(hex.root(), other.root()));
    }

    #[test]
    fn test_initializer_is_optional_only_in_patterns() {
        let registry = create_default_registry();
        let engine = EquivalenceEngine::new(&registry);
        let bare = definition("x", None);
        let initialized = definition("x", Some(("NUM_INT", "1")));

        assert!(!engine.equivalent(bare.root(), initialized.root()));
        assert!(engine.match_pattern(bare.root(), initialized.root()).is_some());
        // The pattern may not demand what the code lacks.
        assert!(engine.match_pattern(initialized.root(), bare.root()).is_none());
    }

    #[test]
    fn test_optional_type_may_be_missing_on_either_side() {
        let registry = create_default_registry();
        let engine = EquivalenceEngine::new(&registry);
        let typed = {
            let mut b = TreeBuilder::new(&GROOVY);
            b.start_node(PARAMETER)
                .field_token("type", "IDENTIFIER", "int")
                .field_token("name", "IDENTIFIER", "n")
                .finish_node();
            b.finish().unwrap()
        };
        let untyped = {
            let mut b = TreeBuilder::new(&GROOVY);
            b.start_node(PARAMETER)
                .field_token("name", "IDENTIFIER", "n")
                .finish_node();
            b.finish().unwrap()
        };
        assert!(engine.equivalent(typed.root(), untyped.root()));
        assert!(engine.equivalent(untyped.root(), typed.root()));
    }

    #[test]
    fn test_variable_names_and_anonymization() {
        let registry = create_default_registry();
        let a = definition("x", Some(("NUM_INT", "1")));
        let b = definition("y", Some(("NUM_INT", "1")));

        let strict = EquivalenceEngine::new(&registry);
        assert!(!strict.equivalent(a.root(), b.root()));

        let anonymized = EquivalenceEngine::with_config(&registry, EngineConfig::anonymized());
        assert!(anonymized.equivalent(a.root(), b.root()));
    }

    #[test]
    fn test_pattern_variables_bind() {
        let registry = create_default_registry();
        let engine = EquivalenceEngine::new(&registry);
        let pattern = definition("$name$", Some(("IDENTIFIER", "$value$")));
        let code = definition("total", Some(("NUM_INT", "42")));

        let bindings = engine.match_pattern(pattern.root(), code.root()).unwrap();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings.get("name").unwrap().text(), "total");
        assert_eq!(bindings.get("value").unwrap().text(), "42");
        assert_eq!(
            bindings.iter().find(|b| b.name == "name").unwrap().role,
            ChildRole::VariableName
        );

        // Code mode never treats `$name$` as a wildcard.
        assert!(!engine.equivalent(pattern.root(), code.root()));
    }

    #[test]
    fn test_repeated_pattern_variable_must_agree() {
        let registry = create_default_registry();
        let engine = EquivalenceEngine::new(&registry);
        let pattern = block(&[("$f$", "$x$"), ("$f$", "$y$")]);
        let same = block(&[("load", "a"), ("load", "b")]);
        let different = block(&[("load", "a"), ("save", "b")]);
        assert!(engine.match_pattern(pattern.root(), same.root()).is_some());
        assert!(engine.match_pattern(pattern.root(), different.root()).is_none());
    }

    #[test]
    fn test_code_block_pattern_matches_contiguous_run() {
        let registry = create_default_registry();
        let engine = EquivalenceEngine::new(&registry);
        let code = block(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let run = block(&[("b", "2"), ("c", "3")]);
        let gap = block(&[("a", "1"), ("c", "3")]);

        assert!(engine.match_pattern(run.root(), code.root()).is_some());
        assert!(engine.match_pattern(gap.root(), code.root()).is_none());
        assert!(!engine.equivalent(run.root(), code.root()));
        assert!(engine.equivalent(code.root(), block(&[("a", "1"), ("b", "2"), ("c", "3")]).root()));
    }

    #[test]
    fn test_cost_budget() {
        let registry = create_default_registry();
        let code = block(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let copy = block(&[("a", "1"), ("b", "2"), ("c", "3")]);

        let engine = EquivalenceEngine::new(&registry);
        assert_eq!(engine.subtree_cost(code.root()), 6);
        assert_eq!(engine.node_cost(code.root()), 0);

        let tight = EquivalenceEngine::with_config(
            &registry,
            EngineConfig {
                max_cost: Some(3),
                ..EngineConfig::default()
            },
        );
        assert_eq!(
            tight.compare(code.root(), copy.root(), MatchMode::Code),
            Verdict::CostExceeded
        );
    }

    #[test]
    fn test_generic_fallback_without_provider() {
        let registry = create_default_registry();
        let engine = EquivalenceEngine::new(&registry);
        let text = |words: &[&str]| {
            let mut b = TreeBuilder::new(&PLAIN_TEXT);
            b.start_node("LINE");
            for w in words {
                b.token("WORD", w);
            }
            b.finish_node();
            b.finish().unwrap()
        };
        let a = text(&["hello", "world"]);
        let b = text(&["hello", "world"]);
        let c = text(&["hello", "there"]);
        assert!(engine.equivalent(a.root(), b.root()));
        assert!(!engine.equivalent(a.root(), c.root()));
        assert_eq!(engine.subtree_cost(a.root()), 0);
    }

    #[test]
    fn test_comments_are_ignored() {
        let registry = create_default_registry();
        let engine = EquivalenceEngine::new(&registry);
        let plain = {
            let mut b = TreeBuilder::new(&GROOVY);
            b.start_node("METHOD_CALL")
                .token("IDENTIFIER", "run")
                .token("IDENTIFIER", "it")
                .finish_node();
            b.finish().unwrap()
        };
        let commented = {
            let mut b = TreeBuilder::new(&GROOVY);
            b.start_node("METHOD_CALL")
                .token("IDENTIFIER", "run")
                .token("ML_COMMENT", "/* go */")
                .token("IDENTIFIER", "it")
                .finish_node();
            b.finish().unwrap()
        };
        assert!(engine.equivalent(plain.root(), commented.root()));
    }
}
