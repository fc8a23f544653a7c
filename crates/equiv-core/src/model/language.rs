use std::fmt;

/// A source language. Dialects point at the language they extend through `base`.
#[derive(Debug)]
pub struct Language {
    pub id: &'static str,
    pub display_name: &'static str,
    pub base: Option<&'static Language>,
}

impl Language {
    /// True if `self` is `other` or a dialect of it, at any depth.
    pub fn is_kind_of(&self, other: &Language) -> bool {
        let mut current = Some(self);
        while let Some(lang) = current {
            if lang.id == other.id {
                return true;
            }
            current = lang.base;
        }
        false
    }

    /// This language followed by its base chain.
    pub fn lineage(&'static self) -> impl Iterator<Item = &'static Language> {
        std::iter::successors(Some(self), |lang| lang.base)
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Language {}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name)
    }
}

pub static PLAIN_TEXT: Language = Language {
    id: "text",
    display_name: "Plain text",
    base: None,
};

pub static GROOVY: Language = Language {
    id: "groovy",
    display_name: "Groovy",
    base: None,
};

/// Groovy DSL descriptors (`.gdsl`) are Groovy scripts with extra context.
pub static GDSL: Language = Language {
    id: "gdsl",
    display_name: "Groovy DSL",
    base: Some(&GROOVY),
};

pub static JAVA: Language = Language {
    id: "java",
    display_name: "Java",
    base: None,
};

static ALL_LANGUAGES: &[&Language] = &[&PLAIN_TEXT, &GROOVY, &GDSL, &JAVA];

pub fn find_language(id: &str) -> Option<&'static Language> {
    let id = id.to_lowercase();
    ALL_LANGUAGES.iter().find(|l| l.id == id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_is_kind_of_base() {
        assert!(GDSL.is_kind_of(&GROOVY));
        assert!(GROOVY.is_kind_of(&GROOVY));
        assert!(!GROOVY.is_kind_of(&GDSL));
        assert!(!PLAIN_TEXT.is_kind_of(&GROOVY));
        assert!(!JAVA.is_kind_of(&GROOVY));
    }

    #[test]
    fn test_lineage() {
        let ids: Vec<&str> = GDSL.lineage().map(|l| l.id).collect();
        assert_eq!(ids, vec!["gdsl", "groovy"]);
    }

    #[test]
    fn test_find_language() {
        assert_eq!(find_language("Java"), Some(&JAVA));
        assert!(find_language("cobol").is_none());
    }
}
