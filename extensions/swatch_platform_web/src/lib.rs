//! Swatch Web Platform
//!
//! Browser backends for the Swatch platform traits, built on `web-sys`:
//! - [`WebDocument`]: `<style>` elements in `document.head`, `dark` class on `<html>`
//! - [`MediaQueryColorScheme`]: `matchMedia("(prefers-color-scheme: dark)")`
//! - [`LocalStorage`]: `window.localStorage` plus cross-tab `storage` events
//!
//! The backends compile only for `wasm32`; on other targets the crate
//! exports nothing.

#[cfg(target_arch = "wasm32")]
mod document;
mod events;
#[cfg(target_arch = "wasm32")]
mod media;
#[cfg(target_arch = "wasm32")]
mod storage;

#[cfg(target_arch = "wasm32")]
pub use document::WebDocument;
#[cfg(target_arch = "wasm32")]
pub use media::{MediaQueryColorScheme, DARK_SCHEME_QUERY};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

/// Best-effort text of a thrown JS value.
#[cfg(target_arch = "wasm32")]
pub(crate) fn js_message(value: &wasm_bindgen::JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &wasm_bindgen::JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

/// Services for the current browser page.
///
/// A document is required. The color scheme query and `localStorage` are
/// attached when available; otherwise the matching features stay off.
#[cfg(target_arch = "wasm32")]
pub fn web_platform() -> swatch_platform::Result<swatch_platform::PlatformServices> {
    use std::rc::Rc;
    use swatch_platform::{PlatformError, PlatformServices};

    let window = web_sys::window()
        .ok_or_else(|| PlatformError::DocumentUnavailable("no global window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| PlatformError::DocumentUnavailable("window has no document".to_string()))?;

    let mut services = PlatformServices::new(Rc::new(WebDocument::new(document)));
    match MediaQueryColorScheme::new(&window) {
        Ok(source) => services = services.with_color_scheme(Rc::new(source)),
        Err(err) => tracing::warn!("web_platform - {}", err),
    }
    match LocalStorage::new(&window) {
        Ok(storage) => services = services.with_storage(Rc::new(storage)),
        Err(err) => tracing::warn!("web_platform - {}", err),
    }
    Ok(services)
}
