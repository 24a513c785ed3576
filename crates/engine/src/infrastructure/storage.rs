//! Key/value storage adapters for the draft cache.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use directories::ProjectDirs;

use crate::infrastructure::ports::{KeyValueStore, StorageError};

/// Default storage file location for the current platform.
///
/// - Linux: ~/.config/storykin/storage.json
/// - macOS: ~/Library/Application Support/app.storykin.storykin/storage.json
/// - Windows: C:\Users\<User>\AppData\Roaming\storykin\storykin\config\storage.json
pub fn default_storage_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("app", "storykin", "storykin") {
        dirs.config_dir().join("storage.json")
    } else {
        // Fallback to current directory if project dirs unavailable
        PathBuf::from("storykin_storage.json")
    }
}

/// File-backed storage.
///
/// Every key lives in one JSON object on disk; reads are served from an
/// in-memory copy loaded at construction.
#[derive(Clone)]
pub struct FileKeyValueStore {
    storage_path: PathBuf,
    cache: Arc<RwLock<HashMap<String, String>>>,
}

impl FileKeyValueStore {
    /// Opens the storage file, starting empty if it is missing or unreadable.
    pub fn open(storage_path: impl Into<PathBuf>) -> Self {
        let storage_path = storage_path.into();
        let cache = load_file(&storage_path);

        tracing::debug!(path = %storage_path.display(), "File storage initialized");

        Self {
            storage_path,
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    fn persist(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                tracing::error!(error = %e, "Failed to create storage directory");
                StorageError::Io(e.to_string())
            })?;
        }

        let data = {
            let cache = self.cache.read().map_err(|_| StorageError::Lock)?;
            serde_json::to_string_pretty(&*cache)
                .map_err(|e| StorageError::Serialization(e.to_string()))?
        };

        fs::write(&self.storage_path, data).map_err(|e| {
            tracing::error!(error = %e, "Failed to write storage file");
            StorageError::Io(e.to_string())
        })
    }
}

fn load_file(path: &Path) -> HashMap<String, String> {
    if !path.exists() {
        return HashMap::new();
    }
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str::<HashMap<String, String>>(&data) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse storage file");
                HashMap::new()
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read storage file");
            HashMap::new()
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.cache.read().map_err(|_| StorageError::Lock)?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        {
            let mut guard = self.cache.write().map_err(|_| StorageError::Lock)?;
            guard.insert(key.to_string(), value.to_string());
        }
        self.persist()
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let removed = {
            let mut guard = self.cache.write().map_err(|_| StorageError::Lock)?;
            guard.remove(key).is_some()
        };
        if removed {
            self.persist()?;
        }
        Ok(())
    }
}

/// Process-local storage, used when no file should be touched.
#[derive(Clone, Default)]
pub struct MemoryKeyValueStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.values.read().map_err(|_| StorageError::Lock)?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.values.write().map_err(|_| StorageError::Lock)?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self.values.write().map_err(|_| StorageError::Lock)?;
        guard.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("storage.json");

        let store = FileKeyValueStore::open(&path);
        store.set("draft", "{\"step\":2}").expect("set");
        assert!(path.exists());

        let reopened = FileKeyValueStore::open(&path);
        assert_eq!(
            reopened.get("draft").expect("get"),
            Some("{\"step\":2}".to_string())
        );

        reopened.remove("draft").expect("remove");
        assert_eq!(FileKeyValueStore::open(&path).get("draft").expect("get"), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").expect("write");

        let store = FileKeyValueStore::open(&path);
        assert_eq!(store.get("anything").expect("get"), None);
    }

    #[test]
    fn memory_store_is_shared_between_clones() {
        let store = MemoryKeyValueStore::new();
        let clone = store.clone();
        store.set("k", "v").expect("set");
        assert_eq!(clone.get("k").expect("get"), Some("v".to_string()));
        clone.remove("k").expect("remove");
        assert_eq!(store.get("k").expect("get"), None);
    }
}
