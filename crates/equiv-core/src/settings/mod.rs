//! Path macro substitution over settings documents.

pub mod element;
pub mod filter;
pub mod macros;

pub use element::Element;
pub use filter::{PathMacroFilter, VcsPathMacroFilter};
pub use macros::PathMacros;
