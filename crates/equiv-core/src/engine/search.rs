//! Structural search: find every place in a code tree matched by a template.

use serde::Serialize;

use super::matcher::{Bindings, EquivalenceEngine, MatchMode, MatchState, subtree_cost_with};
use super::normalize::{canonical_sequence, is_ignored};
use crate::model::descriptor::SlotKind;
use crate::model::tree::Node;

#[derive(Debug, Clone)]
pub struct SearchMatch<'c> {
    /// First matched node; for statement runs, the first statement.
    pub start: Node<'c>,
    /// Last matched node; equal to `start` for single-node matches.
    pub end: Node<'c>,
    pub bindings: Bindings<'c>,
    pub cost: u32,
}

impl SearchMatch<'_> {
    pub fn start_line(&self) -> usize {
        self.start.start_line()
    }

    pub fn end_line(&self) -> usize {
        self.end.end_line()
    }

    /// Source text from the start of the first node to the end of the last.
    pub fn text(&self) -> &str {
        let source = self.start.tree().source();
        &source[self.start.byte_range().start..self.end.byte_range().end]
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            start_line: self.start_line(),
            end_line: self.end_line(),
            cost: self.cost,
            text: self.text().to_string(),
            bindings: self
                .bindings
                .iter()
                .map(|b| (b.name.clone(), b.node.text().to_string()))
                .collect(),
        }
    }
}

/// Owned, serializable view of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub start_line: usize,
    pub end_line: usize,
    pub cost: u32,
    pub text: String,
    pub bindings: Vec<(String, String)>,
}

impl<'r> EquivalenceEngine<'r> {
    /// Search `root` for occurrences of `pattern`.
    ///
    /// A pattern whose root is a code block holding one statement is searched
    /// as that statement; with several statements it matches contiguous
    /// statement runs inside any code block. Any other pattern is matched
    /// against every node. Matches cheaper than `min_match_cost` are dropped.
    pub fn search<'p, 'c>(&self, pattern: Node<'p>, root: Node<'c>) -> Vec<SearchMatch<'c>> {
        let statements = self.pattern_statements(pattern);
        let mut matches = match statements.as_slice() {
            [] => Vec::new(),
            [single] => self.search_node(*single, root),
            many => self.search_runs(many, root),
        };
        matches.retain(|m| m.cost >= self.config().min_match_cost);
        matches
    }

    /// Statements of a code-block pattern. A single statement is kept whole
    /// so that matches land on the statement itself; several statements are
    /// normalized the way code blocks are.
    fn pattern_statements<'p>(&self, pattern: Node<'p>) -> Vec<Node<'p>> {
        let Some(provider) = self.registry().get_provider(pattern) else {
            return vec![pattern];
        };
        match provider.build_descriptor(pattern) {
            Some(d) if d.entries().iter().all(|e| e.kind == SlotKind::CodeBlock) && !d.is_empty() => {
                let raw: Vec<Node<'p>> = d.nodes().filter(|n| !is_ignored(*n, provider)).collect();
                if raw.len() == 1 {
                    raw
                } else {
                    canonical_sequence(raw, Some(provider))
                }
            }
            _ => vec![pattern],
        }
    }

    fn search_node<'p, 'c>(&self, pattern: Node<'p>, root: Node<'c>) -> Vec<SearchMatch<'c>> {
        root.descendants()
            .filter_map(|candidate| {
                let bindings = self.compare(pattern, candidate, MatchMode::Pattern).into_bindings()?;
                Some(SearchMatch {
                    start: candidate,
                    end: candidate,
                    bindings,
                    cost: self.subtree_cost(candidate),
                })
            })
            .collect()
    }

    fn search_runs<'p, 'c>(&self, pattern: &[Node<'p>], root: Node<'c>) -> Vec<SearchMatch<'c>> {
        let mut matches = Vec::new();
        for block in root.descendants() {
            let Some(provider) = self.registry().get_provider(block) else {
                continue;
            };
            let Some(descriptor) = provider.build_descriptor(block) else {
                continue;
            };
            let code_block: Vec<Node<'c>> = descriptor
                .entries()
                .iter()
                .filter(|e| e.kind == SlotKind::CodeBlock)
                .map(|e| e.node)
                .collect();
            if code_block.is_empty() {
                continue;
            }
            // Normalized statements, each paired with the block statement it came from.
            let (statements, origins): (Vec<Node<'c>>, Vec<Node<'c>>) = code_block
                .into_iter()
                .flat_map(|raw| {
                    canonical_sequence(std::iter::once(raw), Some(provider))
                        .into_iter()
                        .map(move |n| (n, raw))
                })
                .unzip();

            let mut offset = 0;
            while offset + pattern.len() <= statements.len() {
                let mut state = MatchState::new(MatchMode::Pattern, self.config().max_cost);
                let Some(start) = self.match_contiguous(pattern, &statements[offset..], &mut state) else {
                    break;
                };
                let Some(bindings) = state.into_verdict(true).into_bindings() else {
                    break;
                };
                let mut owners = origins[offset + start..offset + start + pattern.len()].to_vec();
                owners.dedup();
                matches.push(SearchMatch {
                    start: owners[0],
                    end: owners[owners.len() - 1],
                    bindings,
                    cost: owners.iter().map(|s| subtree_cost_with(*s, Some(provider))).sum(),
                });
                offset += start + pattern.len();
            }
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::engine::matcher::EquivalenceEngine;
    use crate::model::language::GROOVY;
    use crate::model::tree::{SyntaxTree, TreeBuilder};
    use crate::provider::providers::create_default_registry;
    use crate::provider::providers::groovy::*;

    fn call_block(calls: &[&str]) -> SyntaxTree {
        let mut b = TreeBuilder::new(&GROOVY);
        b.start_node(OPEN_BLOCK).token(LBRACE, "{");
        for callee in calls {
            b.start_node("RETURN_STATEMENT")
                .token("KW_RETURN", "return")
                .token("IDENTIFIER", callee)
                .finish_node();
        }
        b.token(RBRACE, "}").finish_node();
        b.finish().unwrap()
    }

    #[test]
    fn test_single_statement_pattern_finds_every_occurrence() {
        let registry = create_default_registry();
        let engine = EquivalenceEngine::new(&registry);
        let pattern = call_block(&["$x$"]);
        let code = call_block(&["a", "b", "c"]);

        let matches = engine.search(pattern.root(), code.root());
        let bound: Vec<&str> = matches
            .iter()
            .map(|m| m.bindings.get("x").unwrap().text())
            .collect();
        assert_eq!(bound, vec!["a", "b", "c"]);
        assert!(matches.iter().all(|m| m.cost == 2));
        assert_eq!(matches[1].text(), "return b");
    }

    #[test]
    fn test_statement_runs_do_not_overlap() {
        let registry = create_default_registry();
        let engine = EquivalenceEngine::new(&registry);
        let pattern = call_block(&["$x$", "$y$"]);
        let code = call_block(&["a", "b", "c", "d", "e"]);

        let matches = engine.search(pattern.root(), code.root());
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].text(), "return a return b");
        assert_eq!(matches[1].summary().bindings[0], ("x".to_string(), "c".to_string()));
        assert_eq!(matches[1].cost, 4);
    }

    #[test]
    fn test_min_match_cost_filters_small_matches() {
        let registry = create_default_registry();
        let engine = EquivalenceEngine::with_config(
            &registry,
            EngineConfig {
                min_match_cost: 4,
                ..EngineConfig::default()
            },
        );
        let code = call_block(&["a", "b"]);
        assert!(engine.search(call_block(&["$x$"]).root(), code.root()).is_empty());
        assert_eq!(engine.search(call_block(&["$x$", "$y$"]).root(), code.root()).len(), 1);
    }
}
