//! OS appearance via `dark-light`
//!
//! Desktop platforms have no change notification we can hook portably, so
//! the host polls: call [`PollingColorScheme::poll`] from the event loop
//! (on focus, on a timer) and subscribers hear about actual changes.

use std::cell::Cell;

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use swatch_platform::{ColorSchemeSource, Listeners, Subscription};
use swatch_tokens::ColorScheme;
use tracing::{debug, trace};

/// Function reporting the current OS preference
pub type SchemeDetector = fn() -> ColorScheme;

/// Ask the OS for its light/dark preference.
pub fn detect_os_color_scheme() -> ColorScheme {
    if matches!(detect_os_theme(), OsThemeMode::Dark) {
        ColorScheme::Dark
    } else {
        ColorScheme::Light
    }
}

/// [`ColorSchemeSource`] refreshed by polling a detector
pub struct PollingColorScheme {
    detector: SchemeDetector,
    scheme: Cell<ColorScheme>,
    listeners: Listeners<ColorScheme>,
}

impl PollingColorScheme {
    /// Poll the OS through `dark-light`.
    pub fn new() -> Self {
        Self::with_detector(detect_os_color_scheme)
    }

    /// Poll a custom detector instead of the OS (useful for tests or to
    /// force a mode).
    pub fn with_detector(detector: SchemeDetector) -> Self {
        let scheme = detector();
        debug!("PollingColorScheme - initial OS preference {}", scheme);
        Self {
            detector,
            scheme: Cell::new(scheme),
            listeners: Listeners::new(),
        }
    }

    /// Re-run the detector. Returns whether the preference changed;
    /// subscribers are notified only then.
    pub fn poll(&self) -> bool {
        let scheme = (self.detector)();
        if self.scheme.replace(scheme) == scheme {
            trace!("PollingColorScheme::poll - unchanged ({})", scheme);
            return false;
        }
        debug!("PollingColorScheme::poll - OS preference is now {}", scheme);
        self.listeners.emit(&scheme);
        true
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for PollingColorScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSchemeSource for PollingColorScheme {
    fn current(&self) -> ColorScheme {
        self.scheme.get()
    }

    fn subscribe(&self, callback: Box<dyn Fn(ColorScheme)>) -> Subscription {
        self.listeners.subscribe(move |scheme| callback(*scheme))
    }
}

impl std::fmt::Debug for PollingColorScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingColorScheme")
            .field("scheme", &self.scheme.get())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
