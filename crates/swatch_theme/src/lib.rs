//! Swatch Theme
//!
//! Runtime theme switching on top of [`swatch_tokens`] and
//! [`swatch_platform`]:
//!
//! - [`ThemeProvider`]: one mounted instance, owning a style node scoped to a
//!   CSS selector
//! - [`ThemeHandle`]: what consumers hold to read and change the theme
//! - [`ThemeConfig`]: per-instance options, loadable from TOML
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use swatch_platform::{HeadlessDocument, PlatformServices};
//! use swatch_theme::{ThemeConfig, ThemeProvider};
//!
//! let document = Rc::new(HeadlessDocument::new());
//! let provider = ThemeProvider::mount_default(
//!     ThemeConfig::new(),
//!     PlatformServices::new(document.clone()),
//! )
//! .unwrap();
//!
//! let theme = provider.handle();
//! theme.set_theme("ocean");
//! assert!(document
//!     .style("swatch-theme-styles")
//!     .unwrap()
//!     .contains("--color-background: #042f2e;"));
//! ```

mod config;
mod controller;
mod error;
mod provider;

pub use config::ThemeConfig;
pub use controller::{resolve_initial_theme, PendingWrite, ThemeController};
pub use error::ThemeError;
pub use provider::{ThemeHandle, ThemeProvider, ThemeSnapshot};

pub use swatch_tokens::{ColorScheme, Theme, ThemeRegistry, SYSTEM_THEME};
