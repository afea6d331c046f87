//! Swatch design tokens
//!
//! The data side of the Swatch theming engine:
//!
//! - [`TokenTree`]: insertion-ordered tree of design tokens
//! - [`Theme`]: a named token tree classified as [`ColorScheme::Light`] or [`ColorScheme::Dark`]
//! - [`ThemeRegistry`]: validated, ordered mapping from theme name to theme
//! - [`CssVariableSerializer`]: flattens a theme into CSS custom properties
//! - [`presets`]: the built-in `light`, `dark` and `ocean` themes
//!
//! # Quick Start
//!
//! ```rust
//! use swatch_tokens::{presets, CssVariableSerializer};
//!
//! let registry = presets::default_registry();
//! let ocean = registry.lookup("ocean").unwrap();
//!
//! let css = CssVariableSerializer::default().serialize(ocean, ":root");
//! assert!(css.contains("--color-background: #042f2e;"));
//! ```

mod css;
mod error;
pub mod presets;
mod registry;
mod theme;
mod tokens;

pub use css::{serialize, CssVariableSerializer, DEFAULT_NAMESPACE};
pub use error::RegistryError;
pub use presets::{default_registry, ThemePreset};
pub use registry::{ThemeRegistry, SYSTEM_THEME};
pub use theme::{ColorScheme, Theme};
pub use tokens::{is_valid_token_key, is_valid_token_value, TokenTree, TokenValue, DEFAULT_KEY};
