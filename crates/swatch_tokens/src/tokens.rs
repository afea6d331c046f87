//! Design token trees
//!
//! A theme's colors form a tree: every key maps either to a literal CSS value
//! or to a nested group of tokens (a color family with shade keys, a
//! `DEFAULT`/`foreground` pair, ...). Groups keep declaration order, which is
//! the order tokens are later emitted in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key that collapses onto its parent's path when a tree is flattened
pub const DEFAULT_KEY: &str = "DEFAULT";

/// A single entry in a [`TokenTree`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    /// A literal CSS value, emitted as-is
    Literal(String),
    /// A nested group of tokens
    Group(TokenTree),
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        TokenValue::Literal(value.to_string())
    }
}

impl From<String> for TokenValue {
    fn from(value: String) -> Self {
        TokenValue::Literal(value)
    }
}

impl From<TokenTree> for TokenValue {
    fn from(tree: TokenTree) -> Self {
        TokenValue::Group(tree)
    }
}

/// Insertion-ordered tree of design tokens
///
/// # Example
///
/// ```rust
/// use swatch_tokens::TokenTree;
///
/// let colors = TokenTree::new()
///     .token("background", "#ffffff")
///     .group(
///         "primary",
///         TokenTree::new()
///             .token("DEFAULT", "#3b82f6")
///             .token("500", "#3b82f6"),
///     );
///
/// assert_eq!(colors.get_path("primary.500"), Some("#3b82f6"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenTree {
    entries: IndexMap<String, TokenValue>,
}

impl TokenTree {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Adds a literal token, returning the tree for chaining.
    pub fn token(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, TokenValue::Literal(value.into()));
        self
    }

    /// Adds a nested group, returning the tree for chaining.
    pub fn group(mut self, key: impl Into<String>, tree: TokenTree) -> Self {
        self.insert(key, TokenValue::Group(tree));
        self
    }

    /// Inserts an entry. Re-inserting an existing key replaces its value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TokenValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&TokenValue> {
        self.entries.get(key)
    }

    /// Looks up a literal by dotted path, e.g. `primary.500`.
    pub fn get_path(&self, path: &str) -> Option<&str> {
        let mut tree = self;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            match (tree.entries.get(segment)?, segments.peek()) {
                (TokenValue::Literal(value), None) => return Some(value.as_str()),
                (TokenValue::Group(group), Some(_)) => tree = group,
                _ => return None,
            }
        }
        None
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, TokenValue> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of literal values in the whole tree.
    pub fn leaf_count(&self) -> usize {
        self.entries
            .values()
            .map(|value| match value {
                TokenValue::Literal(_) => 1,
                TokenValue::Group(group) => group.leaf_count(),
            })
            .sum()
    }

    /// Finds the first entry that cannot be turned into a CSS custom property.
    ///
    /// Returns the offending dotted path and what is wrong with it.
    pub(crate) fn find_invalid(&self) -> Option<(String, InvalidToken)> {
        let mut path: Vec<&str> = Vec::new();
        let mut stack = vec![self.entries.iter()];

        while let Some(iter) = stack.last_mut() {
            match iter.next() {
                Some((key, value)) => {
                    if !is_valid_token_key(key) {
                        path.push(key);
                        return Some((path.join("."), InvalidToken::Key));
                    }
                    match value {
                        TokenValue::Literal(literal) => {
                            if !is_valid_token_value(literal) {
                                path.push(key);
                                return Some((path.join("."), InvalidToken::Value));
                            }
                        }
                        TokenValue::Group(group) => {
                            path.push(key);
                            stack.push(group.entries.iter());
                        }
                    }
                }
                None => {
                    stack.pop();
                    path.pop();
                }
            }
        }
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InvalidToken {
    Key,
    Value,
}

/// Keys end up inside custom property names, so only `[A-Za-z0-9_-]` is allowed.
pub fn is_valid_token_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Values are otherwise emitted verbatim (`;` included, as in
/// `url("data:image/png;base64,...")`), but must not be able to close the
/// rule they are written into.
pub fn is_valid_token_value(value: &str) -> bool {
    !value
        .chars()
        .any(|c| matches!(c, '{' | '}') || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_declaration_order() {
        let tree = TokenTree::new()
            .token("zeta", "#000")
            .token("alpha", "#111")
            .group("mid", TokenTree::new().token("900", "#222"));

        let keys: Vec<&str> = tree.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_get_path() {
        let tree = TokenTree::new().group(
            "primary",
            TokenTree::new()
                .token("DEFAULT", "#3b82f6")
                .token("foreground", "#ffffff"),
        );

        assert_eq!(tree.get_path("primary.DEFAULT"), Some("#3b82f6"));
        assert_eq!(tree.get_path("primary.foreground"), Some("#ffffff"));
        assert_eq!(tree.get_path("primary"), None);
        assert_eq!(tree.get_path("primary.DEFAULT.extra"), None);
        assert_eq!(tree.get_path("missing"), None);
    }

    #[test]
    fn test_leaf_count() {
        let tree = TokenTree::new()
            .token("background", "#fff")
            .group(
                "surface",
                TokenTree::new().token("50", "#f8fafc").token("100", "#f1f5f9"),
            );
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn test_key_validation() {
        assert!(is_valid_token_key("primary"));
        assert!(is_valid_token_key("500"));
        assert!(is_valid_token_key("DEFAULT"));
        assert!(is_valid_token_key("text_muted-2"));
        assert!(!is_valid_token_key(""));
        assert!(!is_valid_token_key("has space"));
        assert!(!is_valid_token_key("dot.ted"));
        assert!(!is_valid_token_key("colon:"));
    }

    #[test]
    fn test_value_validation() {
        assert!(is_valid_token_value("#ffffff"));
        assert!(is_valid_token_value("rgb(0 0 0 / 50%)"));
        assert!(is_valid_token_value("url(\"data:image/png;base64,AAAA\")"));
        assert!(is_valid_token_value(""));
        assert!(!is_valid_token_value("red } body {"));
        assert!(!is_valid_token_value("red\n"));
    }

    #[test]
    fn test_find_invalid_reports_nested_path() {
        let tree = TokenTree::new()
            .token("background", "#fff")
            .group("primary", TokenTree::new().token("bad key", "#000"));

        assert_eq!(
            tree.find_invalid(),
            Some(("primary.bad key".to_string(), InvalidToken::Key))
        );

        let tree = TokenTree::new().group(
            "accent",
            TokenTree::new().group("soft", TokenTree::new().token("DEFAULT", "x}y")),
        );
        assert_eq!(
            tree.find_invalid(),
            Some(("accent.soft.DEFAULT".to_string(), InvalidToken::Value))
        );
    }

    #[test]
    fn test_deserialize_nested_json() {
        let tree: TokenTree = serde_json::from_str(
            r##"{"background": "#fff", "primary": {"DEFAULT": "#00f", "50": "#eef"}}"##,
        )
        .unwrap();

        assert_eq!(tree.get_path("background"), Some("#fff"));
        assert_eq!(tree.get_path("primary.50"), Some("#eef"));
        let keys: Vec<&str> = tree.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["background", "primary"]);
    }
}
