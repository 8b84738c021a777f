//! Storage abstraction
//!
//! The game persists three small values (high score, settings, sandbox
//! snapshot) through a key-value interface. Absence and I/O failure are
//! reported as `None` plus a log line, never as errors: a missing value
//! always has a sensible default upstream.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Durable string-keyed storage
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// File-per-key store rooted in a directory; the native stand-in for the
/// browser's LocalStorage.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(err) = std::fs::create_dir_all(&self.root) {
            log::warn!("cannot create storage dir {:?}: {err}", self.root);
            return;
        }
        if let Err(err) = std::fs::write(self.path_for(key), value) {
            log::warn!("failed to persist {key}: {err}");
        }
    }

    fn remove(&self, key: &str) {
        let _ = std::fs::remove_file(self.path_for(key));
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.values.lock() {
            map.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut map) = self.values.lock() {
            map.remove(key);
        }
    }
}
