//! `prefers-color-scheme` through `matchMedia`

use swatch_platform::{ColorSchemeSource, PlatformError, Result, Subscription};
use swatch_tokens::ColorScheme;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{MediaQueryList, MediaQueryListEvent, Window};

use crate::js_message;

/// Media query matching a dark OS preference
pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

fn scheme_for(dark: bool) -> ColorScheme {
    if dark {
        ColorScheme::Dark
    } else {
        ColorScheme::Light
    }
}

/// [`ColorSchemeSource`] backed by a `MediaQueryList`
#[derive(Debug, Clone)]
pub struct MediaQueryColorScheme {
    query: MediaQueryList,
}

impl MediaQueryColorScheme {
    pub fn new(window: &Window) -> Result<Self> {
        let query = window
            .match_media(DARK_SCHEME_QUERY)
            .map_err(|err| PlatformError::MediaQueryUnavailable(js_message(&err)))?
            .ok_or_else(|| {
                PlatformError::MediaQueryUnavailable("matchMedia returned null".to_string())
            })?;
        Ok(Self { query })
    }
}

impl ColorSchemeSource for MediaQueryColorScheme {
    fn current(&self) -> ColorScheme {
        scheme_for(self.query.matches())
    }

    fn subscribe(&self, callback: Box<dyn Fn(ColorScheme)>) -> Subscription {
        let on_change = Closure::wrap(Box::new(move |event: MediaQueryListEvent| {
            callback(scheme_for(event.matches()));
        }) as Box<dyn FnMut(MediaQueryListEvent)>);

        if let Err(err) = self
            .query
            .add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())
        {
            warn!("MediaQueryColorScheme - cannot listen for changes: {}", js_message(&err));
            return Subscription::empty();
        }

        let query = self.query.clone();
        Subscription::new(move || {
            let _ = query
                .remove_event_listener_with_callback("change", on_change.as_ref().unchecked_ref());
        })
    }
}
