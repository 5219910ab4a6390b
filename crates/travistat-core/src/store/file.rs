use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

use super::{KeyValueStore, StoreError};

/// Durable store holding the whole key-value map as one JSON object on disk.
///
/// The file is read once on open and rewritten on every mutation, so the
/// on-disk state always reflects the last completed `set`/`remove`. A file
/// that cannot be parsed degrades to an empty map rather than failing to
/// open; the corrupt content is overwritten by the next write.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
    capacity_bytes: Option<usize>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Store file is malformed, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
            capacity_bytes: None,
        })
    }

    /// Open with a total capacity in bytes (keys plus values).
    pub fn open_with_capacity(path: PathBuf, capacity_bytes: usize) -> Result<Self, StoreError> {
        let mut store = Self::open(path)?;
        store.capacity_bytes = Some(capacity_bytes);
        Ok(store)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let contents = serde_json::to_string(entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(limit) = self.capacity_bytes {
            let existing = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let used: usize = entries.iter().map(|(k, v)| k.len() + v.len()).sum();
            let attempted = used - existing + key.len() + value.len();
            if attempted > limit {
                return Err(StoreError::QuotaExceeded { limit, attempted });
            }
        }

        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist(&entries) {
            // Roll back so memory and disk stay consistent
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(key).is_some() {
            if let Err(e) = self.persist(&entries) {
                warn!(path = %self.path.display(), key = key, error = %e, "Failed to persist removal");
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }
}
