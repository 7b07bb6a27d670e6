//! Key-value storage adapters.
//!
//! An adapter is bound to one key and only knows how to put a string
//! there and get it back. Encoding is layered on separately.

use crate::error::StorageResult;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The save/load capability.
pub trait StorageAdapter {
    fn save(&self, value: &str) -> StorageResult<()>;

    /// The stored value, or `""` when nothing is stored.
    fn load(&self) -> String;
}

impl<T: StorageAdapter + ?Sized> StorageAdapter for Arc<T> {
    fn save(&self, value: &str) -> StorageResult<()> {
        (**self).save(value)
    }

    fn load(&self) -> String {
        (**self).load()
    }
}

/// A file-backed key-value store, the native counterpart of a browser's
/// local storage.
///
/// The file holds one JSON object mapping keys to strings, so several
/// adapters with different keys can share it.
#[derive(Debug)]
pub struct LocalStorage {
    path: PathBuf,
    key: String,
    lock: Mutex<()>,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl StorageAdapter for LocalStorage {
    fn save(&self, value: &str) -> StorageResult<()> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        entries.insert(self.key.clone(), value.to_string());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        tracing::debug!(path = %self.path.display(), key = %self.key, "saved");
        Ok(())
    }

    fn load(&self) -> String {
        let _guard = self.lock.lock();
        match self.read_all() {
            Ok(mut entries) => entries.remove(&self.key).unwrap_or_default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "could not read storage");
                String::new()
            }
        }
    }
}

/// An in-memory key-value store. Clones share the same entries.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    key: String,
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: Arc::default(),
        }
    }

    /// Another adapter over the same entries, bound to a different key.
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: Arc::clone(&self.entries),
        }
    }

    /// The raw value under this adapter's key, if any.
    pub fn get(&self) -> Option<String> {
        self.entries.lock().get(&self.key).cloned()
    }
}

impl StorageAdapter for MemoryStorage {
    fn save(&self, value: &str) -> StorageResult<()> {
        self.entries
            .lock()
            .insert(self.key.clone(), value.to_string());
        Ok(())
    }

    fn load(&self) -> String {
        self.get().unwrap_or_default()
    }
}
