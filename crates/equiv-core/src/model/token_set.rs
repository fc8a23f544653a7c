use std::collections::BTreeSet;
use std::fmt;

/// Immutable set of token (node) kinds.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct TokenSet {
    kinds: BTreeSet<&'static str>,
}

impl TokenSet {
    pub fn new(kinds: &[&'static str]) -> Self {
        Self {
            kinds: kinds.iter().copied().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains(kind)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dedups() {
        let set = TokenSet::new(&["WHITE_SPACE", "SL_COMMENT", "WHITE_SPACE"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("SL_COMMENT"));
        assert!(!set.contains("COMMA"));
    }

    #[test]
    fn test_empty() {
        assert!(TokenSet::empty().is_empty());
        assert!(!TokenSet::empty().contains(""));
    }
}
