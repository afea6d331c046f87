//! Registry error types

use thiserror::Error;

/// Errors raised while building or querying a [`ThemeRegistry`](crate::ThemeRegistry)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No themes were supplied
    #[error("theme registry is empty")]
    Empty,

    /// A theme's declared name differs from the key it is registered under
    #[error("theme registered as `{key}` declares name `{name}`")]
    NameMismatch { key: String, name: String },

    /// The same theme name was supplied twice
    #[error("theme `{0}` is defined more than once")]
    DuplicateName(String),

    /// The name is reserved for the system sentinel
    #[error("theme name `{0}` is reserved")]
    ReservedName(String),

    /// A token key cannot be used in a CSS custom property name
    #[error("theme `{theme}` has an invalid token key at `{path}`")]
    InvalidTokenKey { theme: String, path: String },

    /// A token value would break out of its rule block
    #[error("theme `{theme}` has an invalid token value at `{path}`")]
    InvalidTokenValue { theme: String, path: String },

    /// A theme document could not be parsed
    #[error("failed to parse themes: {0}")]
    Parse(String),

    /// Lookup of an unregistered name
    #[error("theme `{0}` not found")]
    ThemeNotFound(String),
}
