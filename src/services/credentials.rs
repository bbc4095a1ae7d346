// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential store over a durable key/value slot.
//!
//! The bearer token lives under a single reserved key. Only the session
//! guard writes it; the request gateway only reads it.

use crate::error::StorageError;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Reserved key holding the bearer token.
pub const CREDENTIAL_KEY: &str = "jwt";

/// Durable string key/value storage.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage. Lives as long as the process.
#[derive(Default, Clone)]
pub struct MemoryStorage {
    items: Arc<DashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).map(|v| v.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Storage backed by a JSON object file; durable across runs.
///
/// A missing file reads as empty. Every write rewrites the whole file.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, e: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&data).map_err(|e| StorageError::Corrupt {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let data = serde_json::to_string_pretty(items).map_err(|e| StorageError::Corrupt {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        fs::write(&self.path, data).map_err(|e| self.io_error(e))
    }

    fn update<F>(&self, f: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut items = self.read_all()?;
        f(&mut items);
        self.write_all(&items)
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|items| {
            items.remove(key);
        })
    }
}

/// Holder of the current bearer credential.
///
/// Cheap to clone; clones share the same underlying slot.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Store backed by process memory only.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Store backed by a session file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileStorage::new(path)))
    }

    /// Current token, or `None` in the anonymous state.
    pub fn get(&self) -> Result<Option<String>, StorageError> {
        self.storage.get_item(CREDENTIAL_KEY)
    }

    /// Replace the current token. The token is opaque and not inspected.
    pub fn set(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set_item(CREDENTIAL_KEY, token)
    }

    /// Remove the token. No-op when already empty.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_item(CREDENTIAL_KEY)
    }

    /// Whether a credential is present.
    pub fn is_present(&self) -> Result<bool, StorageError> {
        Ok(self.get()?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir()
            .join(format!("anima_{}_{}_{}", name, std::process::id(), nanos))
            .join("session.json")
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = CredentialStore::in_memory();
        assert_eq!(store.get().unwrap(), None);

        store.set("token-1").unwrap();
        assert_eq!(store.get().unwrap(), Some("token-1".to_string()));

        store.set("token-2").unwrap();
        assert_eq!(store.get().unwrap(), Some("token-2".to_string()));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);

        // Clearing again is a no-op
        store.clear().unwrap();
        assert!(!store.is_present().unwrap());
    }

    #[test]
    fn test_clones_share_slot() {
        let store = CredentialStore::in_memory();
        let other = store.clone();
        store.set("shared").unwrap();
        assert_eq!(other.get().unwrap(), Some("shared".to_string()));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = temp_path("reopen");
        let store = CredentialStore::file(&path);
        assert_eq!(store.get().unwrap(), None);

        store.set("durable").unwrap();

        let reopened = CredentialStore::file(&path);
        assert_eq!(reopened.get().unwrap(), Some("durable".to_string()));

        reopened.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_keeps_unrelated_keys() {
        let path = temp_path("keys");
        let storage = FileStorage::new(&path);
        storage.set_item("theme", "dark").unwrap();

        let store = CredentialStore::new(Arc::new(FileStorage::new(&path)));
        store.set("abc").unwrap();
        store.clear().unwrap();

        assert_eq!(storage.get_item("theme").unwrap(), Some("dark".to_string()));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let store = CredentialStore::file(&path);
        assert!(matches!(store.get(), Err(StorageError::Corrupt { .. })));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_clear_without_file_does_not_create_it() {
        let path = temp_path("noclear");
        let store = CredentialStore::file(&path);
        store.clear().unwrap();
        assert!(!path.exists());
    }
}
