//! Swatch Desktop Platform
//!
//! Host services for native apps (typically embedding a webview):
//! - [`PollingColorScheme`]: OS light/dark preference through `dark-light`
//! - [`FileStorage`]: the chosen theme persisted to a JSON file
//!
//! Styles go to an in-memory [`HeadlessDocument`]; the host forwards its
//! contents to whatever renders them.

mod color_scheme;
mod file_storage;

use std::rc::Rc;

use swatch_platform::{HeadlessDocument, PlatformServices};

pub use color_scheme::{detect_os_color_scheme, PollingColorScheme, SchemeDetector};
pub use file_storage::FileStorage;

/// Desktop host services, kept together so the event loop can poll them
#[derive(Debug, Clone)]
pub struct DesktopPlatform {
    pub document: Rc<HeadlessDocument>,
    pub color_scheme: Rc<PollingColorScheme>,
    pub storage: Option<Rc<FileStorage>>,
}

impl DesktopPlatform {
    /// OS detection plus storage under the user config directory for `app`.
    /// Storage is left out when no config directory exists.
    pub fn new(app: &str) -> Self {
        let storage = match FileStorage::in_config_dir(app) {
            Ok(storage) => Some(Rc::new(storage)),
            Err(err) => {
                tracing::warn!("DesktopPlatform - theme storage disabled: {}", err);
                None
            }
        };
        Self {
            document: Rc::new(HeadlessDocument::new()),
            color_scheme: Rc::new(PollingColorScheme::new()),
            storage,
        }
    }

    pub fn with_storage(mut self, storage: FileStorage) -> Self {
        self.storage = Some(Rc::new(storage));
        self
    }

    pub fn with_color_scheme(mut self, color_scheme: PollingColorScheme) -> Self {
        self.color_scheme = Rc::new(color_scheme);
        self
    }

    pub fn services(&self) -> PlatformServices {
        let services = PlatformServices::new(self.document.clone())
            .with_color_scheme(self.color_scheme.clone());
        match &self.storage {
            Some(storage) => services.with_storage(storage.clone()),
            None => services,
        }
    }

    /// Pick up OS preference changes and writes from other processes.
    /// Returns whether anything was reported.
    pub fn poll(&self) -> bool {
        let scheme_changed = self.color_scheme.poll();
        let stored = self.storage.as_ref().map_or(0, |storage| storage.poll());
        scheme_changed || stored > 0
    }
}
