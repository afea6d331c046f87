//! CSS custom property generation
//!
//! Flattens a theme's token tree into `--<namespace>-<path>` declarations
//! inside a single rule block:
//!
//! ```css
//! :root {
//!   --color-background: #ffffff;
//!   --color-primary: #3b82f6;
//!   --color-primary-500: #3b82f6;
//! }
//! ```
//!
//! Path segments are joined with `-`. A `DEFAULT` key collapses onto its
//! parent's path, so `primary.DEFAULT` becomes `--color-primary`. Values are
//! written exactly as declared. Output follows declaration order, so
//! serializing an unchanged theme always produces the same bytes.

use std::fmt::Write;

use crate::theme::Theme;
use crate::tokens::{TokenTree, TokenValue, DEFAULT_KEY};

/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "color";

/// Serializes themes into CSS custom property rules
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CssVariableSerializer {
    namespace: String,
}

impl Default for CssVariableSerializer {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl CssVariableSerializer {
    /// Create a serializer with a property namespace (`color` → `--color-*`).
    ///
    /// An empty namespace emits bare `--<path>` properties.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Flatten a theme into ordered `(property, value)` pairs.
    pub fn variables<'a>(&self, theme: &'a Theme) -> Vec<(String, &'a str)> {
        self.flatten(theme.colors())
    }

    /// Flatten a token tree into ordered `(property, value)` pairs.
    ///
    /// `DEFAULT` collapses onto its parent path whether it holds a literal or
    /// a group. With an empty namespace a top-level `DEFAULT` literal would be
    /// the bare `--`, which is not a property name; it is skipped.
    pub fn flatten<'a>(&self, tree: &'a TokenTree) -> Vec<(String, &'a str)> {
        let mut vars = Vec::with_capacity(tree.leaf_count());
        let mut path: Vec<&str> = Vec::new();
        // Each level remembers whether it pushed a path segment.
        let mut stack = vec![(tree.iter(), false)];

        while let Some((iter, _)) = stack.last_mut() {
            match iter.next() {
                Some((key, TokenValue::Literal(value))) => {
                    let collapse = key == DEFAULT_KEY;
                    if !collapse {
                        path.push(key);
                    }
                    let name = self.property_name(&path);
                    if !collapse {
                        path.pop();
                    }
                    if name.len() > 2 {
                        vars.push((name, value.as_str()));
                    }
                }
                Some((key, TokenValue::Group(group))) => {
                    let segment = key != DEFAULT_KEY;
                    if segment {
                        path.push(key);
                    }
                    stack.push((group.iter(), segment));
                }
                None => {
                    if let Some((_, true)) = stack.pop() {
                        path.pop();
                    }
                }
            }
        }

        vars
    }

    /// Render the theme as a single rule scoped to `selector`.
    pub fn serialize(&self, theme: &Theme, selector: &str) -> String {
        let vars = self.variables(theme);
        let mut css = String::with_capacity(selector.len() + 4 + vars.len() * 32);
        let _ = writeln!(css, "{} {{", selector.trim());
        for (name, value) in &vars {
            let _ = writeln!(css, "  {name}: {value};");
        }
        css.push_str("}\n");
        css
    }

    /// Custom property name for a path of token keys.
    pub fn property_name(&self, path: &[&str]) -> String {
        let mut name = String::from("--");
        name.push_str(&self.namespace);
        for segment in path {
            if name.len() > 2 {
                name.push('-');
            }
            name.push_str(segment);
        }
        name
    }
}

/// Serialize with the default `color` namespace.
pub fn serialize(theme: &Theme, selector: &str) -> String {
    CssVariableSerializer::default().serialize(theme, selector)
}
