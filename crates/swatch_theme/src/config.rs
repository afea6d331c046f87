//! Controller configuration
//!
//! Loadable from TOML; every field has a default, so an empty document is a
//! valid configuration:
//!
//! ```toml
//! default_theme = "dark"
//! enable_storage = true
//! enable_system = true
//! selector = ":root"
//! style_id = "swatch-theme-styles"
//! storage_key = "swatch-theme"
//! namespace = "color"
//! ```

use serde::{Deserialize, Serialize};
use swatch_tokens::{is_valid_token_key, DEFAULT_NAMESPACE};

use crate::error::ThemeError;

/// Configuration for one [`ThemeProvider`](crate::ThemeProvider) instance
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeConfig {
    /// Theme selected when nothing persisted or system-derived applies
    #[serde(default)]
    pub default_theme: Option<String>,
    /// Persist the selected theme and follow writes from other contexts
    #[serde(default)]
    pub enable_storage: bool,
    /// Honor the OS light/dark preference and accept the `system` theme
    #[serde(default)]
    pub enable_system: bool,
    /// CSS selector the custom properties are scoped to
    #[serde(default = "default_selector")]
    pub selector: String,
    /// Id of the style node owned by this instance
    #[serde(default = "default_style_id")]
    pub style_id: String,
    /// Storage key the theme name is persisted under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// First segment of every custom property name (`--color-...`)
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_selector() -> String {
    ":root".to_string()
}

fn default_style_id() -> String {
    "swatch-theme-styles".to_string()
}

fn default_storage_key() -> String {
    "swatch-theme".to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default_theme: None,
            enable_storage: false,
            enable_system: false,
            selector: default_selector(),
            style_id: default_style_id(),
            storage_key: default_storage_key(),
            namespace: default_namespace(),
        }
    }
}

impl ThemeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_theme(mut self, name: impl Into<String>) -> Self {
        self.default_theme = Some(name.into());
        self
    }

    pub fn with_storage(mut self, enabled: bool) -> Self {
        self.enable_storage = enabled;
        self
    }

    pub fn with_system(mut self, enabled: bool) -> Self {
        self.enable_system = enabled;
        self
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    pub fn with_style_id(mut self, style_id: impl Into<String>) -> Self {
        self.style_id = style_id.into();
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Parse and validate a TOML configuration document.
    pub fn from_toml_str(src: &str) -> Result<Self, ThemeError> {
        let config: Self =
            toml::from_str(src).map_err(|e| ThemeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot produce a well-formed style node.
    pub fn validate(&self) -> Result<(), ThemeError> {
        if self.selector.trim().is_empty() {
            return Err(ThemeError::InvalidConfig("selector is empty".to_string()));
        }
        if self.selector.contains(['{', '}']) {
            return Err(ThemeError::InvalidConfig(format!(
                "selector `{}` contains a brace",
                self.selector
            )));
        }
        if self.style_id.trim().is_empty() {
            return Err(ThemeError::InvalidConfig("style_id is empty".to_string()));
        }
        if self.storage_key.is_empty() {
            return Err(ThemeError::InvalidConfig("storage_key is empty".to_string()));
        }
        if !self.namespace.is_empty() && !is_valid_token_key(&self.namespace) {
            return Err(ThemeError::InvalidConfig(format!(
                "namespace `{}` is not a valid custom property segment",
                self.namespace
            )));
        }
        Ok(())
    }
}
