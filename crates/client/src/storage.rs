//! Client-local key/value storage backing the session.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage is unavailable in this context")]
    Unavailable,

    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("session storage lock poisoned")]
    Poisoned,
}

/// A single logical slot of string keys, durable or not.
///
/// Batch operations must be all-or-nothing from the caller's point of view:
/// a reader never observes half of a `set_items` or `remove_items` call.
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageError>;

    fn remove_items(&self, keys: &[&str]) -> Result<(), StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_items(&[(key, value)])
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.remove_items(&[key])
    }
}

/// Process-local storage. Used for tests and embedded hosts.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut guard = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        for (key, value) in items {
            guard.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_items(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut guard = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        for key in keys {
            guard.remove(*key);
        }
        Ok(())
    }
}

/// Storage for contexts with no persistent slot (headless renders, disabled
/// storage). Every call fails with [`StorageError::Unavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

impl SessionStorage for UnavailableStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set_items(&self, _items: &[(&str, &str)]) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn remove_items(&self, _keys: &[&str]) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}
