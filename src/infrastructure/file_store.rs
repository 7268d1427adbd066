use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::storage::{KeyValueStorage, StorageError};

const ENV_DATA_DIR: &str = "TASKSTORE_DATA_DIR";

/// File-backed key-value storage: each key maps to `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolves the data directory from `TASKSTORE_DATA_DIR`, falling back to
    /// the platform-conventional location.
    pub fn from_env() -> Result<Self, StorageError> {
        Ok(Self::new(default_data_dir()?))
    }

    fn record_path(&self, key: &str) -> PathBuf {
        let mut path = self.dir.clone();
        for segment in key.split('/') {
            path.push(segment);
        }
        path.set_extension("json");
        path
    }
}

pub fn default_data_dir() -> Result<PathBuf, StorageError> {
    if let Ok(dir) = std::env::var(ENV_DATA_DIR)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    if cfg!(windows) {
        let appdata = std::env::var("APPDATA")
            .map_err(|_| StorageError::Unavailable("APPDATA is not set".into()))?;
        Ok(PathBuf::from(appdata).join("taskstore"))
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| StorageError::Unavailable("HOME is not set".into()))?;
        Ok(PathBuf::from(home).join(".local").join("share").join("taskstore"))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.record_path(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.record_path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.record_path(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory backend for tests and storage-less embedding. Clones share the
/// same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.records().insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.records().remove(key);
        Ok(())
    }
}
