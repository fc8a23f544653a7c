//! Attributes that must never be rewritten by path macro substitution.

use super::element::Element;

pub trait PathMacroFilter: Send + Sync {
    /// True when `attribute` of `parent` must keep its literal value.
    fn should_exclude(&self, attribute: &str, parent: &Element) -> bool;
}

/// Keeps VCS commit messages and comments verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct VcsPathMacroFilter;

impl PathMacroFilter for VcsPathMacroFilter {
    fn should_exclude(&self, attribute: &str, parent: &Element) -> bool {
        if parent.name == "MESSAGE" && attribute == "value" {
            return true;
        }
        if parent.name == "option" && parent.attribute("name") == Some("LAST_COMMIT_MESSAGE") {
            return true;
        }
        attribute == "comment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exclude(attribute: &str, parent: &Element) -> bool {
        VcsPathMacroFilter.should_exclude(attribute, parent)
    }

    #[test]
    fn test_message_value() {
        let message = Element::new("MESSAGE").with_attribute("value", "fix /home/u/x");
        assert!(exclude("value", &message));
        assert!(!exclude("author", &message));
    }

    #[test]
    fn test_last_commit_message_option() {
        let last = Element::new("option")
            .with_attribute("name", "LAST_COMMIT_MESSAGE")
            .with_attribute("value", "msg");
        assert!(exclude("value", &last));
        assert!(exclude("name", &last));

        let other = Element::new("option").with_attribute("name", "OUTPUT_DIR");
        assert!(!exclude("value", &other));
        assert!(exclude("comment", &other));

        let unnamed = Element::new("option");
        assert!(!exclude("value", &unnamed));
    }

    #[test]
    fn test_comment_under_any_parent() {
        assert!(exclude("comment", &Element::new("change")));
        assert!(!exclude("Comment", &Element::new("change")));
        assert!(!exclude("path", &Element::new("change")));
    }

    #[test]
    fn test_value_outside_message_is_included() {
        assert!(!exclude("value", &Element::new("MESSAGES")));
        assert!(!exclude("value", &Element::new("message")));
    }
}
