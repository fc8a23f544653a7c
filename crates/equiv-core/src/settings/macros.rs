//! Replace absolute paths with `$NAME$` macros before saving, and back after
//! loading, so that stored settings survive a project move.

use tracing::debug;

use super::element::Element;
use super::filter::PathMacroFilter;

#[derive(Debug, Clone, Default)]
pub struct PathMacros {
    /// `(name, path)`, longest path first.
    macros: Vec<(String, String)>,
}

impl PathMacros {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a macro. Trailing separators are dropped and empty paths ignored.
    pub fn insert(&mut self, name: impl Into<String>, path: &str) {
        let path = path.trim_end_matches(['/', '\\']);
        if path.is_empty() {
            return;
        }
        let name = name.into();
        self.macros.retain(|(n, _)| *n != name);
        self.macros.push((name, path.to_string()));
        self.macros.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(&b.0)));
    }

    pub fn with(mut self, name: impl Into<String>, path: &str) -> Self {
        self.insert(name, path);
        self
    }

    pub fn path_of(&self, name: &str) -> Option<&str> {
        self.macros
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.as_str())
    }

    /// Rewrite paths into macros. Returns the number of attributes changed.
    pub fn collapse(&self, root: &mut Element, filters: &[&dyn PathMacroFilter]) -> usize {
        let count = self.rewrite(root, filters, &|value: &str| self.collapse_value(value));
        debug!(count, "collapsed path macros");
        count
    }

    /// Rewrite macros back into paths. Returns the number of attributes changed.
    pub fn expand(&self, root: &mut Element, filters: &[&dyn PathMacroFilter]) -> usize {
        let count = self.rewrite(root, filters, &|value: &str| self.expand_value(value));
        debug!(count, "expanded path macros");
        count
    }

    pub fn collapse_value(&self, value: &str) -> String {
        let mut out = value.to_string();
        for (name, path) in &self.macros {
            out = replace_at_boundaries(&out, path, &format!("${name}$"));
        }
        out
    }

    pub fn expand_value(&self, value: &str) -> String {
        let mut out = value.to_string();
        for (name, path) in &self.macros {
            out = out.replace(&format!("${name}$"), path);
        }
        out
    }

    fn rewrite(
        &self,
        element: &mut Element,
        filters: &[&dyn PathMacroFilter],
        apply: &dyn Fn(&str) -> String,
    ) -> usize {
        let excluded: Vec<bool> = element
            .attributes
            .iter()
            .map(|(name, _)| filters.iter().any(|f| f.should_exclude(name, element)))
            .collect();

        let mut count = 0;
        for ((_, value), skip) in element.attributes.iter_mut().zip(excluded) {
            if skip {
                continue;
            }
            let rewritten = apply(value);
            if rewritten != *value {
                *value = rewritten;
                count += 1;
            }
        }
        for child in &mut element.children {
            count += self.rewrite(child, filters, apply);
        }
        count
    }
}

/// Replace `path` where it is not part of a longer path component.
fn replace_at_boundaries(value: &str, path: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    let mut prev: Option<char> = None;
    while let Some(pos) = rest.find(path) {
        let before = rest[..pos].chars().next_back().or(prev);
        let after = rest[pos + path.len()..].chars().next();
        let starts_clean = before.is_none_or(|c| !is_path_char(c));
        let ends_clean = after.is_none_or(|c| c == '/' || c == '\\' || !is_path_char(c));

        if starts_clean && ends_clean {
            out.push_str(&rest[..pos]);
            out.push_str(replacement);
            prev = path.chars().next_back();
            rest = &rest[pos + path.len()..];
        } else {
            let step = pos + rest[pos..].chars().next().map_or(1, char::len_utf8);
            out.push_str(&rest[..step]);
            prev = rest[..step].chars().next_back();
            rest = &rest[step..];
        }
    }
    out.push_str(rest);
    out
}

fn is_path_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}
