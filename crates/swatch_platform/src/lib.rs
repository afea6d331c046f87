//! Swatch Platform Abstraction
//!
//! The three host services a theme controller depends on, as traits, plus
//! the wrappers the controller actually talks to:
//!
//! | service | backend trait | controller-side wrapper |
//! |---|---|---|
//! | style nodes in the document | [`StyleHost`] | [`StyleInjector`] |
//! | OS light/dark preference | [`ColorSchemeSource`] | [`SystemThemeWatcher`] |
//! | durable storage | [`ThemeStorage`] | [`PersistenceAdapter`] |
//!
//! Backends live in the platform extensions (`swatch_platform_web`,
//! `swatch_platform_desktop`); [`headless`] provides in-memory ones.
//!
//! Everything here is single-threaded: handles are `Rc`, callbacks run
//! synchronously on the calling thread.

mod error;
pub mod headless;
mod listeners;
mod scheme;
mod storage;
mod style;

use std::rc::Rc;

pub use error::{PlatformError, Result};
pub use headless::{HeadlessDocument, ManualColorScheme, SharedStorage, StorageContext};
pub use listeners::{ListenerId, Listeners, Subscription};
pub use scheme::{ColorSchemeSource, SystemThemeWatcher};
pub use storage::{PersistenceAdapter, ThemeStorage};
pub use style::{is_root_selector, StyleHost, StyleInjector, DARK_CLASS};

/// The host services handed to a theme controller at mount time
///
/// `color_scheme` and `storage` are optional: a host without a color-scheme
/// query or without durable storage simply leaves them out, and the
/// corresponding controller features stay disabled.
#[derive(Clone)]
pub struct PlatformServices {
    pub styles: Rc<dyn StyleHost>,
    pub color_scheme: Option<Rc<dyn ColorSchemeSource>>,
    pub storage: Option<Rc<dyn ThemeStorage>>,
}

impl PlatformServices {
    pub fn new(styles: Rc<dyn StyleHost>) -> Self {
        Self {
            styles,
            color_scheme: None,
            storage: None,
        }
    }

    pub fn with_color_scheme(mut self, source: Rc<dyn ColorSchemeSource>) -> Self {
        self.color_scheme = Some(source);
        self
    }

    pub fn with_storage(mut self, storage: Rc<dyn ThemeStorage>) -> Self {
        self.storage = Some(storage);
        self
    }
}

impl std::fmt::Debug for PlatformServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformServices")
            .field("color_scheme", &self.color_scheme.is_some())
            .field("storage", &self.storage.is_some())
            .finish_non_exhaustive()
    }
}
