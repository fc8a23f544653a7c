//! Java equivalence descriptors over the tree-sitter-java grammar.

use std::sync::LazyLock;

use crate::engine::literal::LiteralValue;
use crate::model::descriptor::{ChildRole, Descriptor, DescriptorBuilder};
use crate::model::language::{Language, JAVA};
use crate::model::token_set::TokenSet;
use crate::model::tree::Node;
use crate::provider::plugin::EquivalenceDescriptorProvider;

static VARIABLE_DELIMITERS: [&str; 2] = [",", ";"];

static COMMENTS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::new(&["line_comment", "block_comment"]));

static LITERALS: LazyLock<TokenSet> = LazyLock::new(|| {
    TokenSet::new(&[
        "decimal_integer_literal",
        "hex_integer_literal",
        "octal_integer_literal",
        "binary_integer_literal",
        "decimal_floating_point_literal",
        "hex_floating_point_literal",
        "string_literal",
        "character_literal",
        "true",
        "false",
        "null_literal",
    ])
});

static STATEMENTS: LazyLock<TokenSet> = LazyLock::new(|| {
    TokenSet::new(&[
        "expression_statement",
        "local_variable_declaration",
        "if_statement",
        "for_statement",
        "enhanced_for_statement",
        "while_statement",
        "do_statement",
        "return_statement",
        "throw_statement",
        "try_statement",
        "try_with_resources_statement",
        "break_statement",
        "continue_statement",
        "yield_statement",
        "synchronized_statement",
        "labeled_statement",
        "assert_statement",
        "explicit_constructor_invocation",
    ])
});

pub struct JavaEquivalenceDescriptorProvider;

impl EquivalenceDescriptorProvider for JavaEquivalenceDescriptorProvider {
    fn id(&self) -> &str {
        "java"
    }

    fn language(&self) -> &'static Language {
        &JAVA
    }

    fn build_descriptor<'t>(&self, node: Node<'t>) -> Option<Descriptor<'t>> {
        let builder = DescriptorBuilder::new();

        match node.kind() {
            "local_variable_declaration" | "field_declaration" => Some(
                builder
                    .declared_variables(node.children_by_field("declarator"))
                    .build(),
            ),
            "formal_parameter" => {
                let name = node.child_by_field("name");
                Some(
                    builder
                        .element(name)
                        .optionally(node.child_by_field("type"))
                        .role(name, ChildRole::VariableName)
                        .build(),
                )
            }
            "variable_declarator" => {
                let name = node.child_by_field("name");
                Some(
                    builder
                        .element(name)
                        .optionally(declarator_type(node))
                        .optionally_in_pattern(node.child_by_field("value"))
                        .role(name, ChildRole::VariableName)
                        .build(),
                )
            }
            "method_declaration" | "constructor_declaration" => {
                let name = node.child_by_field("name");
                let parameters = node
                    .child_by_field("parameters")
                    .into_iter()
                    .flat_map(|list| list.named_children())
                    .filter(|p| matches!(p.kind(), "formal_parameter" | "spread_parameter"));
                Some(
                    builder
                        .element(name)
                        .elements(parameters)
                        .optionally(node.child_by_field("type"))
                        .optionally_in_pattern(node.child_by_field("body"))
                        .role(name, ChildRole::FunctionName)
                        .build(),
                )
            }
            "enhanced_for_statement" => {
                let variable = node.child_by_field("name");
                Some(
                    builder
                        .element(variable)
                        .element(node.child_by_field("value"))
                        .optionally(node.child_by_field("type"))
                        .element(node.child_by_field("body"))
                        .role(variable, ChildRole::VariableName)
                        .build(),
                )
            }
            "block" | "constructor_body" | "program" => {
                Some(builder.code_block(statements(node)).build())
            }
            _ => None,
        }
    }

    fn variable_delimiters(&self) -> &[&'static str] {
        &VARIABLE_DELIMITERS
    }

    fn literals(&self) -> &TokenSet {
        &LITERALS
    }

    fn literal_value(&self, node: Node<'_>) -> LiteralValue {
        match node.kind() {
            "character_literal" => LiteralValue::parse_char(node.text()),
            _ => LiteralValue::parse(node.text()),
        }
    }

    fn node_cost(&self, node: Node<'_>) -> u32 {
        if STATEMENTS.contains(node.kind()) {
            2
        } else {
            0
        }
    }

    fn ignored_tokens(&self) -> &TokenSet {
        &COMMENTS
    }
}

fn statements(block: Node<'_>) -> Vec<Node<'_>> {
    block
        .named_children()
        .filter(|c| !COMMENTS.contains(c.kind()))
        .collect()
}

/// `int a, b;` puts the type on the declaration, not on each declarator.
fn declarator_type(declarator: Node<'_>) -> Option<Node<'_>> {
    declarator.parent().and_then(|p| p.child_by_field("type"))
}
