//! # Taskbook Storage
//!
//! The persistence boundary: a key-value store of raw strings, plus JSON
//! helpers for typed values.
//!
//! The store interface deals in raw strings. Serialization is the
//! caller's concern (via the [`json`] helpers), which keeps the storage
//! contract free of any domain type. Reads distinguish "absent" from
//! "failed": a missing key is `Ok(None)`, never an error, and nothing
//! panics past this boundary.
//!
//! [`FileStore`] is the production implementation: one JSON file per key
//! under a root directory, overwritten whole on every write.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur at the storage boundary
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying file operation failed
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// A value could not be serialized or deserialized
    #[error("storage serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Key-value string storage
///
/// Implementations store raw string values under string keys. A read of
/// an absent key returns `Ok(None)`; errors are reserved for operations
/// that were attempted and failed.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, if present
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the value exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, fully overwriting any previous value
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the value cannot be written.
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed key-value store
///
/// Each key maps to `<root>/<key>.json`. Writes go through a temporary
/// file renamed into place, so a crash mid-write leaves the previous
/// value intact rather than a truncated file.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`
    ///
    /// The directory is not created here; callers create it once at
    /// startup.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this store writes under
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = self.root.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }
}

/// JSON helpers for typed values over a raw [`KeyValueStore`]
pub mod json {
    use super::{DeserializeOwned, KeyValueStore, Serialize, StorageError};

    /// Load and deserialize the JSON value under `key`
    ///
    /// Absent keys yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the read fails, or
    /// [`StorageError::Serde`] if the stored text is not valid JSON for
    /// `T`.
    pub fn load<T: DeserializeOwned>(
        store: &dyn KeyValueStore,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        match store.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serialize `value` to JSON and store it under `key`
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serde`] if serialization fails, or
    /// [`StorageError::Io`] if the write fails.
    pub fn save<T: Serialize>(
        store: &dyn KeyValueStore,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        store.put(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;

    #[test]
    fn get_absent_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn put_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.put("greeting", "hello").unwrap();
        assert_eq!(store.get("greeting").unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn put_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.put("k", "first").unwrap();
        store.put("k", "second").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn put_into_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("does-not-exist"));
        assert!(store.put("k", "v").is_err());
    }

    #[test]
    fn json_helpers_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        json::save(&store, "numbers", &vec![1u32, 2, 3]).unwrap();
        let loaded: Option<Vec<u32>> = json::load(&store, "numbers").unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn json_load_rejects_malformed_text() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.put("bad", "not json").unwrap();
        let result: Result<Option<Vec<u32>>, _> = json::load(&store, "bad");
        assert!(matches!(result, Err(StorageError::Serde(_))));
    }
}
