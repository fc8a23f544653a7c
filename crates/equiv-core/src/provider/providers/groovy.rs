//! Groovy equivalence descriptors.
//!
//! Groovy trees are assembled with `TreeBuilder` using the element kinds
//! below. Positions inside a parent are marked with field names:
//!
//! - `VARIABLE_DEFINITION`: `type`, then `VARIABLE` children separated by `COMMA`
//! - `VARIABLE`: `name`, `type`, `initializer`
//! - `PARAMETER`: `name`, `type`, `default`
//! - `METHOD`: `name`, `type` (return type), `parameters` (`PARAMETER_LIST`), `body`
//! - `FOR_IN_CLAUSE`: `variable`, `iterated`
//! - `OPEN_BLOCK` / `CLOSABLE_BLOCK`: braces, statements and separators
//!
//! Method calls are not normalized: `obj method()` and `obj.method()` stay
//! different trees.

use std::sync::LazyLock;

use crate::model::descriptor::{ChildRole, Descriptor, DescriptorBuilder};
use crate::model::language::{Language, GROOVY};
use crate::model::token_set::TokenSet;
use crate::model::tree::Node;
use crate::provider::plugin::EquivalenceDescriptorProvider;

pub const VARIABLE_DEFINITION: &str = "VARIABLE_DEFINITION";
pub const VARIABLE: &str = "VARIABLE";
pub const PARAMETER: &str = "PARAMETER";
pub const PARAMETER_LIST: &str = "PARAMETER_LIST";
pub const METHOD: &str = "METHOD";
pub const FOR_IN_CLAUSE: &str = "FOR_IN_CLAUSE";
pub const OPEN_BLOCK: &str = "OPEN_BLOCK";
pub const CLOSABLE_BLOCK: &str = "CLOSABLE_BLOCK";

pub const COMMA: &str = "COMMA";
pub const SEMI: &str = "SEMI";
pub const NLS: &str = "NLS";
pub const LBRACE: &str = "LBRACE";
pub const RBRACE: &str = "RBRACE";
pub const ARROW: &str = "ARROW";

static VARIABLE_DELIMITERS: [&str; 2] = [COMMA, SEMI];

static WHITE_SPACES_OR_COMMENTS: LazyLock<TokenSet> = LazyLock::new(|| {
    TokenSet::new(&[
        "WHITE_SPACE",
        NLS,
        "SL_COMMENT",
        "ML_COMMENT",
        "SH_COMMENT",
        "GROOVY_DOC_COMMENT",
    ])
});

static CONSTANTS: LazyLock<TokenSet> = LazyLock::new(|| {
    TokenSet::new(&[
        "NUM_INT",
        "NUM_LONG",
        "NUM_BIG_INT",
        "NUM_FLOAT",
        "NUM_DOUBLE",
        "NUM_BIG_DECIMAL",
        "STRING_LITERAL",
        "GSTRING_LITERAL",
        "KW_TRUE",
        "KW_FALSE",
        "KW_NULL",
    ])
});

static STATEMENTS: LazyLock<TokenSet> = LazyLock::new(|| {
    TokenSet::new(&[
        VARIABLE_DEFINITION,
        "IF_STATEMENT",
        "FOR_STATEMENT",
        "WHILE_STATEMENT",
        "DO_WHILE_STATEMENT",
        "SWITCH_STATEMENT",
        "TRY_STATEMENT",
        "RETURN_STATEMENT",
        "THROW_STATEMENT",
        "BREAK_STATEMENT",
        "CONTINUE_STATEMENT",
        "ASSERT_STATEMENT",
        "LABELED_STATEMENT",
        "SYNCHRONIZED_STATEMENT",
    ])
});

// Block children that are never statements.
static BLOCK_PUNCTUATION: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::new(&[LBRACE, RBRACE, ARROW, SEMI, PARAMETER_LIST]));

pub struct GroovyEquivalenceDescriptorProvider;

impl EquivalenceDescriptorProvider for GroovyEquivalenceDescriptorProvider {
    fn id(&self) -> &str {
        "groovy"
    }

    fn language(&self) -> &'static Language {
        &GROOVY
    }

    fn build_descriptor<'t>(&self, node: Node<'t>) -> Option<Descriptor<'t>> {
        let builder = DescriptorBuilder::new();

        match node.kind() {
            VARIABLE_DEFINITION => Some(
                builder
                    .declared_variables(node.children_of_kind(VARIABLE))
                    .build(),
            ),
            PARAMETER => {
                let name = node.child_by_field("name");
                Some(
                    builder
                        .element(name)
                        .optionally(node.child_by_field("type"))
                        .optionally_in_pattern(node.child_by_field("default"))
                        .role(name, ChildRole::VariableName)
                        .build(),
                )
            }
            VARIABLE => {
                let name = node.child_by_field("name");
                Some(
                    builder
                        .element(name)
                        .optionally(variable_type(node))
                        .optionally_in_pattern(node.child_by_field("initializer"))
                        .role(name, ChildRole::VariableName)
                        .build(),
                )
            }
            METHOD => {
                let name = node.child_by_field("name");
                let parameters = node
                    .child_by_field("parameters")
                    .into_iter()
                    .flat_map(|list| list.children_of_kind(PARAMETER));
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
            FOR_IN_CLAUSE => Some(
                builder
                    .element(node.child_by_field("variable"))
                    .element(node.child_by_field("iterated"))
                    .build(),
            ),
            OPEN_BLOCK | CLOSABLE_BLOCK => {
                Some(builder.code_block(self.statements(node)).build())
            }
            // TODO: unify `obj method()` with `obj.method()` once call matching semantics are settled.
            _ => None,
        }
    }

    fn variable_delimiters(&self) -> &[&'static str] {
        &VARIABLE_DELIMITERS
    }

    fn literals(&self) -> &TokenSet {
        &CONSTANTS
    }

    fn node_cost(&self, node: Node<'_>) -> u32 {
        if STATEMENTS.contains(node.kind()) {
            2
        } else {
            0
        }
    }

    fn ignored_tokens(&self) -> &TokenSet {
        &WHITE_SPACES_OR_COMMENTS
    }
}

impl GroovyEquivalenceDescriptorProvider {
    fn statements<'t>(&self, block: Node<'t>) -> Vec<Node<'t>> {
        block
            .children()
            .filter(|c| {
                !BLOCK_PUNCTUATION.contains(c.kind()) && !WHITE_SPACES_OR_COMMENTS.contains(c.kind())
            })
            .collect()
    }
}

/// A variable declared in a list shares the list's type.
fn variable_type(variable: Node<'_>) -> Option<Node<'_>> {
    variable.child_by_field("type").or_else(|| {
        variable
            .parent()
            .filter(|p| p.kind() == VARIABLE_DEFINITION)
            .and_then(|p| p.child_by_field("type"))
    })
}
