//! Scoped style injection
//!
//! The document's `<style>` nodes are the one resource every mounted theme
//! controller shares. [`StyleHost`] exposes that resource as a table keyed
//! by style element id; each controller only ever writes the slot it was
//! configured with, and every write replaces the slot's whole text.
//!
//! Two controllers configured with the same id overwrite each other (last
//! writer wins). Keeping ids unique is up to the caller.

use std::rc::Rc;

use swatch_tokens::ColorScheme;
use tracing::trace;

use crate::error::Result;

/// Class toggled on the root element while a root-scoped theme is dark
pub const DARK_CLASS: &str = "dark";

/// Backend owning the document's style nodes and root element classes
pub trait StyleHost {
    /// Ensure exactly one style node with `id` exists and set its text to `css`.
    fn upsert_style(&self, id: &str, css: &str) -> Result<()>;

    /// Remove the style node with `id`, if present.
    fn remove_style(&self, id: &str) -> Result<()>;

    /// Add (`enabled`) or remove a class on the document root element.
    fn set_root_class(&self, class: &str, enabled: bool) -> Result<()>;
}

/// Whether a selector addresses the document root rather than a subtree
pub fn is_root_selector(selector: &str) -> bool {
    let selector = selector.trim();
    selector == ":root" || selector.eq_ignore_ascii_case("html")
}

/// Writes theme CSS into a [`StyleHost`]
#[derive(Clone)]
pub struct StyleInjector {
    host: Rc<dyn StyleHost>,
}

impl StyleInjector {
    pub fn new(host: Rc<dyn StyleHost>) -> Self {
        Self { host }
    }

    /// Replace the contents of the style node `style_id` (creating it if needed).
    pub fn upsert(&self, style_id: &str, css: &str) -> Result<()> {
        trace!("StyleInjector::upsert #{} ({} bytes)", style_id, css.len());
        self.host.upsert_style(style_id, css)
    }

    /// Remove the style node `style_id`, if present.
    pub fn remove(&self, style_id: &str) -> Result<()> {
        trace!("StyleInjector::remove #{}", style_id);
        self.host.remove_style(style_id)
    }

    /// Reflect `scheme` in the root element's [`DARK_CLASS`] marker.
    ///
    /// Only root-scoped instances own the marker; for any other selector this
    /// does nothing and returns `Ok(false)`.
    pub fn mark_scheme(&self, selector: &str, scheme: ColorScheme) -> Result<bool> {
        if !is_root_selector(selector) {
            return Ok(false);
        }
        self.host.set_root_class(DARK_CLASS, scheme.is_dark())?;
        Ok(true)
    }

    /// Drop the root marker on teardown of a root-scoped instance.
    pub fn clear_scheme_marker(&self, selector: &str) -> Result<bool> {
        if !is_root_selector(selector) {
            return Ok(false);
        }
        self.host.set_root_class(DARK_CLASS, false)?;
        Ok(true)
    }
}

impl std::fmt::Debug for StyleInjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleInjector").finish_non_exhaustive()
    }
}
