//! `localStorage` persistence and cross-tab `storage` events

use swatch_platform::{PlatformError, Result, Subscription, ThemeStorage};
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Storage, StorageEvent, Window};

use crate::events::storage_event_value;
use crate::js_message;

/// [`ThemeStorage`] backed by `window.localStorage`
///
/// The browser fires `storage` events only in *other* tabs of the origin,
/// which is exactly the external-change contract. Events for
/// `sessionStorage` arrive on the same window and are dropped.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    window: Window,
    storage: Storage,
}

impl LocalStorage {
    pub fn new(window: &Window) -> Result<Self> {
        // Throws in some privacy modes; returns null when disabled.
        let storage = window
            .local_storage()
            .map_err(|err| PlatformError::StorageUnavailable(js_message(&err)))?
            .ok_or_else(|| PlatformError::StorageUnavailable("localStorage is null".to_string()))?;
        Ok(Self {
            window: window.clone(),
            storage,
        })
    }
}

fn is_quota_error(err: &JsValue) -> bool {
    js_sys::Reflect::get(err, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string())
        .is_some_and(|name| name == "QuotaExceededError" || name == "NS_ERROR_DOM_QUOTA_REACHED")
}

impl ThemeStorage for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|err| PlatformError::StorageUnavailable(js_message(&err)))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(|err| {
            if is_quota_error(&err) {
                PlatformError::QuotaExceeded(key.to_string())
            } else {
                PlatformError::StorageUnavailable(js_message(&err))
            }
        })
    }

    fn subscribe_external(&self, key: &str, callback: Box<dyn Fn(Option<&str>)>) -> Subscription {
        let key = key.to_string();
        let area = self.storage.clone();
        let on_storage = Closure::wrap(Box::new(move |event: StorageEvent| {
            let same_area = event.storage_area().is_some_and(|changed| changed == area);
            let changed_key = event.key();
            let new_value = event.new_value();
            if let Some(value) =
                storage_event_value(same_area, changed_key.as_deref(), &key, new_value.as_deref())
            {
                callback(value);
            }
        }) as Box<dyn FnMut(StorageEvent)>);

        if let Err(err) = self
            .window
            .add_event_listener_with_callback("storage", on_storage.as_ref().unchecked_ref())
        {
            warn!("LocalStorage - cannot listen for storage events: {}", js_message(&err));
            return Subscription::empty();
        }

        let window = self.window.clone();
        Subscription::new(move || {
            let _ = window
                .remove_event_listener_with_callback("storage", on_storage.as_ref().unchecked_ref());
        })
    }
}
