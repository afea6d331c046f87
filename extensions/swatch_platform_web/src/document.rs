//! Style nodes in the live DOM

use swatch_platform::{PlatformError, Result, StyleHost};
use tracing::trace;
use web_sys::{Document, Element};

use crate::js_message;

/// [`StyleHost`] writing `<style>` elements into a browser document
#[derive(Debug, Clone)]
pub struct WebDocument {
    document: Document,
}

impl WebDocument {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// The document of the global `window`.
    pub fn from_window() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| PlatformError::DocumentUnavailable("no global document".to_string()))?;
        Ok(Self::new(document))
    }

    fn create_style(&self, id: &str) -> Result<Element> {
        let head = self
            .document
            .head()
            .ok_or_else(|| PlatformError::DocumentUnavailable("document has no <head>".to_string()))?;
        let style = self
            .document
            .create_element("style")
            .map_err(|err| PlatformError::DocumentUnavailable(js_message(&err)))?;
        style.set_id(id);
        head.append_child(&style)
            .map_err(|err| PlatformError::DocumentUnavailable(js_message(&err)))?;
        trace!("WebDocument - created <style id=\"{}\">", id);
        Ok(style)
    }
}

impl StyleHost for WebDocument {
    fn upsert_style(&self, id: &str, css: &str) -> Result<()> {
        let style = match self.document.get_element_by_id(id) {
            Some(style) => style,
            None => self.create_style(id)?,
        };
        style.set_text_content(Some(css));
        Ok(())
    }

    fn remove_style(&self, id: &str) -> Result<()> {
        if let Some(style) = self.document.get_element_by_id(id) {
            style.remove();
        }
        Ok(())
    }

    fn set_root_class(&self, class: &str, enabled: bool) -> Result<()> {
        let root = self.document.document_element().ok_or_else(|| {
            PlatformError::DocumentUnavailable("document has no root element".to_string())
        })?;
        let classes = root.class_list();
        let result = if enabled {
            classes.add_1(class)
        } else {
            classes.remove_1(class)
        };
        result.map_err(|err| PlatformError::Other(js_message(&err)))
    }
}
