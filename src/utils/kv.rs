//! Key-value storage seam over the browser's persistent store.
//!
//! All cache and cart state flows through [`KeyValueStore`], so the same
//! logic runs against localStorage in the browser and [`MemoryStore`] in
//! tests or non-browser hosts.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::core::error::StorageError;
#[cfg(target_arch = "wasm32")]
use crate::utils::dom;

/// Minimal string key-value contract.
///
/// Implementations never panic: an unavailable backend reads as empty and
/// reports writes as [`StorageError`].
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str);
    fn keys(&self) -> Vec<String>;
}

/// Shared store handle; the runtime is single-threaded cooperative.
pub type SharedStore = Rc<dyn KeyValueStore>;

// =============================================================================
// BrowserStorage
// =============================================================================

/// localStorage-backed store.
///
/// When the window is missing or storage is disabled, reads return `None`
/// and writes fail with [`StorageError::Unavailable`]; a rejected write
/// (typically quota) maps to [`StorageError::WriteFailed`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl BrowserStorage {
    pub fn new() -> Self {
        Self
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = dom::local_storage()?;
            storage.get_item(key).ok()?
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = dom::local_storage().ok_or(StorageError::Unavailable)?;
            storage
                .set_item(key, value)
                .map_err(|_| StorageError::WriteFailed)
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable)
        }
    }

    fn remove(&self, key: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(storage) = dom::local_storage() {
                let _ = storage.remove_item(key);
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
        }
    }

    fn keys(&self) -> Vec<String> {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(storage) = dom::local_storage() else {
                return Vec::new();
            };

            let mut keys = Vec::new();
            let len = storage.length().unwrap_or(0);
            for i in 0..len {
                if let Ok(Some(key)) = storage.key(i) {
                    keys.push(key);
                }
            }
            keys
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Vec::new()
        }
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory store with the same contract as [`BrowserStorage`].
///
/// Used by native tests and usable by any non-browser host. Writes can be
/// forced to fail to exercise quota-exhaustion paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail with [`StorageError::WriteFailed`].
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::WriteFailed);
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("1"));
        store.remove("a");
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_memory_store_keys() {
        let store = MemoryStore::new();
        store.set("b", "2").unwrap();
        store.set("a", "1").unwrap();
        assert_eq!(store.keys(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_memory_store_write_failure_toggle() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        assert!(store.set("a", "1").is_err());
        assert_eq!(store.get("a"), None);
        store.fail_writes(false);
        assert!(store.set("a", "1").is_ok());
    }
}
