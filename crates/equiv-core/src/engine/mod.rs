//! Equivalence checking, pattern matching and structural search.

pub mod literal;
pub mod matcher;
pub mod normalize;
pub mod search;
