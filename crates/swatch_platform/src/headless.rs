//! In-memory platform backends
//!
//! Used for tests, headless rendering, and any host without a real DOM:
//!
//! - [`HeadlessDocument`]: style nodes and root classes held in memory
//! - [`ManualColorScheme`]: a color scheme preference set by hand
//! - [`SharedStorage`]: one storage area shared by several [`StorageContext`]s,
//!   the way tabs of the same origin share `localStorage`

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use swatch_tokens::ColorScheme;
use tracing::trace;

use crate::error::{PlatformError, Result};
use crate::listeners::{ListenerId, Listeners, Subscription};
use crate::scheme::ColorSchemeSource;
use crate::storage::ThemeStorage;
use crate::style::StyleHost;

/// In-memory document: style nodes keyed by id, plus root element classes
#[derive(Debug, Default)]
pub struct HeadlessDocument {
    styles: RefCell<IndexMap<String, String>>,
    root_classes: RefCell<IndexSet<String>>,
    mutations: Cell<usize>,
}

impl HeadlessDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the style node `id`.
    pub fn style(&self, id: &str) -> Option<String> {
        self.styles.borrow().get(id).cloned()
    }

    /// Ids of all style nodes, in insertion order.
    pub fn style_ids(&self) -> Vec<String> {
        self.styles.borrow().keys().cloned().collect()
    }

    pub fn style_count(&self) -> usize {
        self.styles.borrow().len()
    }

    pub fn has_root_class(&self, class: &str) -> bool {
        self.root_classes.borrow().contains(class)
    }

    pub fn root_classes(&self) -> Vec<String> {
        self.root_classes.borrow().iter().cloned().collect()
    }

    /// Number of writes that reached the document so far.
    pub fn mutation_count(&self) -> usize {
        self.mutations.get()
    }

    fn record_mutation(&self) {
        self.mutations.set(self.mutations.get() + 1);
    }
}

impl StyleHost for HeadlessDocument {
    fn upsert_style(&self, id: &str, css: &str) -> Result<()> {
        self.styles
            .borrow_mut()
            .insert(id.to_string(), css.to_string());
        self.record_mutation();
        Ok(())
    }

    fn remove_style(&self, id: &str) -> Result<()> {
        if self.styles.borrow_mut().shift_remove(id).is_some() {
            self.record_mutation();
        }
        Ok(())
    }

    fn set_root_class(&self, class: &str, enabled: bool) -> Result<()> {
        let changed = {
            let mut classes = self.root_classes.borrow_mut();
            if enabled {
                classes.insert(class.to_string())
            } else {
                classes.shift_remove(class)
            }
        };
        if changed {
            self.record_mutation();
        }
        Ok(())
    }
}

/// Color scheme preference controlled by the caller
#[derive(Debug)]
pub struct ManualColorScheme {
    scheme: Cell<ColorScheme>,
    listeners: Listeners<ColorScheme>,
}

impl ManualColorScheme {
    pub fn new(initial: ColorScheme) -> Self {
        Self {
            scheme: Cell::new(initial),
            listeners: Listeners::new(),
        }
    }

    /// Change the preference, notifying subscribers if it actually changed.
    pub fn set(&self, scheme: ColorScheme) {
        if self.scheme.replace(scheme) != scheme {
            trace!("ManualColorScheme::set {}", scheme);
            self.listeners.emit(&scheme);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl ColorSchemeSource for ManualColorScheme {
    fn current(&self) -> ColorScheme {
        self.scheme.get()
    }

    fn subscribe(&self, callback: Box<dyn Fn(ColorScheme)>) -> Subscription {
        self.listeners.subscribe(move |scheme| callback(*scheme))
    }
}

type StorageCallback = Rc<dyn Fn(Option<&str>)>;

struct ExternalListener {
    context: u64,
    key: String,
    callback: StorageCallback,
}

#[derive(Default)]
struct StorageArea {
    values: RefCell<FxHashMap<String, String>>,
    listeners: RefCell<SlotMap<ListenerId, ExternalListener>>,
    next_context: Cell<u64>,
    quota_exceeded: Cell<bool>,
    unavailable: Cell<bool>,
}

impl StorageArea {
    /// Notify every listener on `key` that does not belong to `origin`.
    fn notify(&self, origin: Option<u64>, key: &str, value: Option<&str>) {
        let callbacks: Vec<StorageCallback> = self
            .listeners
            .borrow()
            .values()
            .filter(|l| l.key == key && Some(l.context) != origin)
            .map(|l| l.callback.clone())
            .collect();
        for callback in callbacks {
            callback(value);
        }
    }
}

/// A storage area shared between execution contexts
///
/// Each [`StorageContext`] behaves like one browser tab: its own writes are
/// visible everywhere, and listeners in every *other* context are notified.
#[derive(Clone, Default)]
pub struct SharedStorage {
    area: Rc<StorageArea>,
}

impl SharedStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new execution context onto this storage area.
    pub fn context(&self) -> StorageContext {
        let id = self.area.next_context.get();
        self.area.next_context.set(id + 1);
        StorageContext {
            area: self.area.clone(),
            id,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.area.values.borrow().get(key).cloned()
    }

    /// Seed a value without notifying anyone (e.g. left over from an earlier session).
    pub fn insert(&self, key: &str, value: &str) {
        self.area
            .values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    /// Delete a value from outside every context, notifying all of them.
    pub fn remove(&self, key: &str) {
        let removed = self.area.values.borrow_mut().remove(key).is_some();
        if removed {
            self.area.notify(None, key, None);
        }
    }

    /// Make every subsequent write fail with [`PlatformError::QuotaExceeded`].
    pub fn set_quota_exceeded(&self, exceeded: bool) {
        self.area.quota_exceeded.set(exceeded);
    }

    /// Make every read and write fail with [`PlatformError::StorageUnavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.area.unavailable.set(unavailable);
    }

    pub fn listener_count(&self) -> usize {
        self.area.listeners.borrow().len()
    }
}

impl std::fmt::Debug for SharedStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStorage")
            .field("values", &self.area.values.borrow())
            .field("listeners", &self.area.listeners.borrow().len())
            .finish()
    }
}

/// One execution context's handle onto a [`SharedStorage`]
pub struct StorageContext {
    area: Rc<StorageArea>,
    id: u64,
}

impl ThemeStorage for StorageContext {
    fn read(&self, key: &str) -> Result<Option<String>> {
        if self.area.unavailable.get() {
            return Err(PlatformError::StorageUnavailable(
                "storage disabled".to_string(),
            ));
        }
        Ok(self.area.values.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        if self.area.unavailable.get() {
            return Err(PlatformError::StorageUnavailable(
                "storage disabled".to_string(),
            ));
        }
        if self.area.quota_exceeded.get() {
            return Err(PlatformError::QuotaExceeded(key.to_string()));
        }
        self.area
            .values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.area.notify(Some(self.id), key, Some(value));
        Ok(())
    }

    fn subscribe_external(&self, key: &str, callback: Box<dyn Fn(Option<&str>)>) -> Subscription {
        let id = self.area.listeners.borrow_mut().insert(ExternalListener {
            context: self.id,
            key: key.to_string(),
            callback: Rc::from(callback),
        });
        let area: Weak<StorageArea> = Rc::downgrade(&self.area);
        Subscription::new(move || {
            if let Some(area) = area.upgrade() {
                area.listeners.borrow_mut().remove(id);
            }
        })
    }
}

impl std::fmt::Debug for StorageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageContext")
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_counts_mutations() {
        let doc = HeadlessDocument::new();
        doc.upsert_style("a", "x").unwrap();
        doc.upsert_style("b", "y").unwrap();
        doc.set_root_class("dark", true).unwrap();
        doc.set_root_class("dark", true).unwrap();
        doc.remove_style("missing").unwrap();
        assert_eq!(doc.mutation_count(), 3);
        assert_eq!(doc.style_ids(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(doc.root_classes(), vec!["dark".to_string()]);
    }

    #[test]
    fn test_manual_scheme_emits_on_change_only() {
        let scheme = ManualColorScheme::new(ColorScheme::Light);
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let sub = scheme.subscribe(Box::new(move |_| c.set(c.get() + 1)));

        scheme.set(ColorScheme::Light);
        scheme.set(ColorScheme::Dark);
        scheme.set(ColorScheme::Dark);
        assert_eq!(count.get(), 1);
        assert_eq!(scheme.current(), ColorScheme::Dark);

        drop(sub);
        assert_eq!(scheme.listener_count(), 0);
    }

    #[test]
    fn test_writes_notify_other_contexts_only() {
        let storage = SharedStorage::new();
        let tab_a = storage.context();
        let tab_b = storage.context();
        let seen_a = Rc::new(RefCell::new(Vec::new()));
        let seen_b = Rc::new(RefCell::new(Vec::new()));

        let a = seen_a.clone();
        let _sub_a = tab_a.subscribe_external(
            "theme",
            Box::new(move |v| a.borrow_mut().push(v.map(str::to_string))),
        );
        let b = seen_b.clone();
        let _sub_b = tab_b.subscribe_external(
            "theme",
            Box::new(move |v| b.borrow_mut().push(v.map(str::to_string))),
        );

        tab_a.write("theme", "dark").unwrap();
        tab_a.write("other", "x").unwrap();

        assert!(seen_a.borrow().is_empty());
        assert_eq!(*seen_b.borrow(), vec![Some("dark".to_string())]);
        assert_eq!(tab_b.read("theme").unwrap().as_deref(), Some("dark"));

        storage.remove("theme");
        assert_eq!(*seen_a.borrow(), vec![None]);
    }

    #[test]
    fn test_unsubscribe_releases_listener() {
        let storage = SharedStorage::new();
        let tab = storage.context();
        let sub = tab.subscribe_external("theme", Box::new(|_| {}));
        assert_eq!(storage.listener_count(), 1);
        drop(sub);
        assert_eq!(storage.listener_count(), 0);
    }
}
