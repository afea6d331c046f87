//! File-backed theme storage
//!
//! Values live in one JSON object on disk, e.g. `{"swatch-theme": "dark"}`.
//! Several processes may share the file; each sees the others' writes the
//! next time it calls [`FileStorage::poll`].

use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use swatch_platform::{Listeners, PlatformError, Result, Subscription, ThemeStorage};
use tracing::{debug, trace, warn};

const FILE_NAME: &str = "theme.json";

type Values = IndexMap<String, String>;

/// [`ThemeStorage`] persisted to a JSON file
pub struct FileStorage {
    path: PathBuf,
    /// Last value this handle saw for each watched key
    seen: RefCell<IndexMap<String, Option<String>>>,
    watchers: RefCell<IndexMap<String, Listeners<Option<String>>>>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seen: RefCell::new(IndexMap::new()),
            watchers: RefCell::new(IndexMap::new()),
        }
    }

    /// `<config dir>/<app>/theme.json`, e.g. `~/.config/<app>/theme.json`
    /// on Linux.
    pub fn in_config_dir(app: &str) -> Result<Self> {
        let dir = dirs::config_dir().ok_or_else(|| {
            PlatformError::StorageUnavailable("no user config directory".to_string())
        })?;
        Ok(Self::new(dir.join(app).join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Values> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Values::new()),
            Err(err) => return Err(io_error(&self.path, err)),
        };
        if text.trim().is_empty() {
            return Ok(Values::new());
        }
        serde_json::from_str(&text).map_err(|err| {
            PlatformError::Other(format!("{}: malformed theme file: {}", self.path.display(), err))
        })
    }

    fn store(&self, values: &Values) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| io_error(parent, err))?;
        }
        let text = serde_json::to_string_pretty(values)
            .map_err(|err| PlatformError::Other(err.to_string()))?;
        // Write then rename so readers never see a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(|err| io_error(&tmp, err))?;
        fs::rename(&tmp, &self.path).map_err(|err| io_error(&self.path, err))
    }

    /// Re-read the file and report watched keys whose value changed since
    /// this handle last saw them. Returns the number of keys reported.
    pub fn poll(&self) -> usize {
        let values = match self.load() {
            Ok(values) => values,
            Err(err) => {
                warn!("FileStorage::poll failed: {}", err);
                return 0;
            }
        };

        let changed: Vec<(Listeners<Option<String>>, Option<String>)> = {
            let watchers = self.watchers.borrow();
            let mut seen = self.seen.borrow_mut();
            watchers
                .iter()
                .filter(|(_, listeners)| !listeners.is_empty())
                .filter_map(|(key, listeners)| {
                    let current = values.get(key).cloned();
                    let previous = seen.insert(key.clone(), current.clone());
                    (previous.flatten() != current).then(|| (listeners.clone(), current))
                })
                .collect()
        };

        for (listeners, value) in &changed {
            debug!("FileStorage::poll - external write {:?}", value);
            listeners.emit(value);
        }
        changed.len()
    }
}

fn io_error(path: &Path, err: std::io::Error) -> PlatformError {
    PlatformError::Io(format!("{}: {}", path.display(), err))
}

impl ThemeStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut values = match self.load() {
            Ok(values) => values,
            Err(PlatformError::Other(reason)) => {
                warn!("FileStorage - replacing unreadable file: {}", reason);
                Values::new()
            }
            Err(err) => return Err(err),
        };
        values.insert(key.to_string(), value.to_string());
        self.store(&values)?;
        trace!("FileStorage::write `{}` = {}", key, value);

        // Our own write is not an external change.
        if self.watchers.borrow().contains_key(key) {
            self.seen
                .borrow_mut()
                .insert(key.to_string(), Some(value.to_string()));
        }
        Ok(())
    }

    fn subscribe_external(&self, key: &str, callback: Box<dyn Fn(Option<&str>)>) -> Subscription {
        let current = self.read(key).unwrap_or_else(|err| {
            warn!("FileStorage - reading `{}` for watch failed: {}", key, err);
            None
        });
        self.seen.borrow_mut().insert(key.to_string(), current);
        self.watchers
            .borrow_mut()
            .entry(key.to_string())
            .or_default()
            .subscribe(move |value: &Option<String>| callback(value.as_deref()))
    }
}

impl std::fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStorage")
            .field("path", &self.path)
            .field("watched", &self.watchers.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}
