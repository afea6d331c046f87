//! Theme definitions

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::tokens::TokenTree;

/// Light or dark classification of a theme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    /// Get the opposite color scheme
    pub fn toggle(self) -> Self {
        match self {
            ColorScheme::Light => ColorScheme::Dark,
            ColorScheme::Dark => ColorScheme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ColorScheme::Dark
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }
}

impl Display for ColorScheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ColorScheme::Light),
            "dark" => Ok(ColorScheme::Dark),
            other => Err(format!("unknown color scheme `{other}`")),
        }
    }
}

/// A named theme: its light/dark classification and its color token tree
///
/// Serialized with the field names front-end theme files use:
///
/// ```toml
/// name = "ocean"
/// type = "dark"
///
/// [colors]
/// background = "#042f2e"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    name: String,
    #[serde(rename = "type")]
    scheme: ColorScheme,
    colors: TokenTree,
}

impl Theme {
    pub fn new(name: impl Into<String>, scheme: ColorScheme, colors: TokenTree) -> Self {
        Self {
            name: name.into(),
            scheme,
            colors,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.scheme
    }

    pub fn colors(&self) -> &TokenTree {
        &self.colors
    }
}
