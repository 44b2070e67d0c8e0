use std::{
    collections::HashMap,
    io,
    path::PathBuf,
    sync::Arc,
};

use parking_lot::Mutex;

/// Persistence failure. The only thing that can go wrong at this boundary is
/// the backing medium being unavailable.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Minimal byte-string key/value boundary the record store persists through.
///
/// `read` of an absent key is `Ok(None)`, not an error.
pub trait RecordStorage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

/// In-memory backend for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl RecordStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// File backend: each key persists as `<dir>/<key>.json`.
#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl RecordStorage for JsonFileStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Unavailable(err.to_string())),
        }
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;
        std::fs::write(self.path_for(key), value)
            .map_err(|err| StorageError::Unavailable(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trips() {
        let storage = MemoryStorage::default();
        assert_eq!(storage.read("k").unwrap(), None);
        storage.write("k", b"payload").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some(&b"payload"[..]));
    }

    #[test]
    fn file_storage_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested/history"));
        assert_eq!(storage.read("deployedTokens").unwrap(), None);

        storage.write("deployedTokens", b"[]").unwrap();
        assert_eq!(storage.read("deployedTokens").unwrap().as_deref(), Some(&b"[]"[..]));
        assert!(dir.path().join("nested/history/deployedTokens.json").exists());
    }
}
