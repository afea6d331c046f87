//! Theme persistence
//!
//! The persisted record is a single plain string (the theme name) under a
//! caller-chosen key. Persistence is best effort: failures are logged and
//! reported as "nothing stored", never surfaced to the caller.

use std::rc::Rc;

use tracing::warn;

use crate::error::Result;
use crate::listeners::Subscription;

/// Backend key/value store (`localStorage` in a browser)
pub trait ThemeStorage {
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Register for writes to `key` made by another execution context
    /// (another tab, another process). Writes made through this handle are
    /// not reported back to it.
    fn subscribe_external(&self, key: &str, callback: Box<dyn Fn(Option<&str>)>) -> Subscription;
}

/// Best-effort persistence of the chosen theme name under one key
#[derive(Clone)]
pub struct PersistenceAdapter {
    storage: Rc<dyn ThemeStorage>,
    key: String,
}

impl PersistenceAdapter {
    pub fn new(storage: Rc<dyn ThemeStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The persisted value, or `None` when absent or unreadable.
    pub fn read(&self) -> Option<String> {
        match self.storage.read(&self.key) {
            Ok(value) => value,
            Err(err) => {
                warn!("PersistenceAdapter::read `{}` failed: {}", self.key, err);
                None
            }
        }
    }

    /// Persist `value`. Failures are logged and otherwise ignored.
    pub fn write(&self, value: &str) {
        if let Err(err) = self.storage.write(&self.key, value) {
            warn!("PersistenceAdapter::write `{}` failed: {}", self.key, err);
        }
    }

    pub fn subscribe_external(&self, callback: impl Fn(Option<&str>) + 'static) -> Subscription {
        self.storage.subscribe_external(&self.key, Box::new(callback))
    }
}

impl std::fmt::Debug for PersistenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceAdapter")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::SharedStorage;

    #[test]
    fn test_round_trip() {
        let storage = SharedStorage::new();
        let adapter = PersistenceAdapter::new(Rc::new(storage.context()), "theme");

        assert_eq!(adapter.read(), None);
        adapter.write("dark");
        assert_eq!(adapter.read().as_deref(), Some("dark"));
        assert_eq!(storage.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_failures_are_swallowed() {
        let storage = SharedStorage::new();
        storage.insert("theme", "ocean");
        let adapter = PersistenceAdapter::new(Rc::new(storage.context()), "theme");

        storage.set_quota_exceeded(true);
        adapter.write("dark");
        assert_eq!(adapter.read().as_deref(), Some("ocean"));

        storage.set_unavailable(true);
        assert_eq!(adapter.read(), None);
        adapter.write("light");
    }
}
