pub mod descriptor;
pub mod language;
pub mod token_set;
pub mod tree;
