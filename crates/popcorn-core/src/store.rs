//! Durable key-value storage for the watched list.
//!
//! Values are JSON documents addressed by a short key. Reads never fail from
//! the caller's point of view: a missing or unreadable entry yields the
//! caller-supplied default.

use serde::de::DeserializeOwned;
use popcorn_config::is_valid_storage_key;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Raw string storage backend.
pub trait PersistentStore: Send + Sync {
    /// `Ok(None)` when nothing was ever saved under `key`
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn save_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Typed access on top of any [`PersistentStore`].
pub trait PersistentStoreExt {
    fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T;

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError>;
}

impl<S: PersistentStore + ?Sized> PersistentStoreExt for S {
    fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.load_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Store miss: '{}' (nothing saved yet)", key);
                return default;
            }
            Err(e) => {
                warn!("Failed to read '{}' from store: {}. Using default.", key, e);
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Stored value for '{}' is unreadable: {}. Using default.", key, e);
                default
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(value)?;
        self.save_raw(key, &raw)
    }
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    if is_valid_storage_key(key) {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl PersistentStore for JsonFileStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn save_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        std::fs::create_dir_all(&self.dir)?;

        // Atomic write: write to temp file, then rename
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value)?;
        std::fs::rename(&temp_path, &path)?;

        info!("Saved '{}' to {}", key, path.display());
        Ok(())
    }
}

/// In-process store. Clones share the same entries, which lets a test
/// reopen "the same disk" with a fresh `WatchlistStore`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PersistentStore for MemoryStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        Ok(self.entries().get(key).cloned())
    }

    fn save_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
