//! In-process store

use super::{check_quota, entry_size, SessionStorage};
use crate::error::{CacheError, CacheResult};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// `HashMap`-backed store with an optional byte quota
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: u64,
    disabled: bool,
}

impl MemoryStorage {
    /// Unlimited, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that refuses writes taking it past `quota_bytes`
    pub fn with_quota(quota_bytes: u64) -> Self {
        Self {
            quota_bytes,
            ..Self::default()
        }
    }

    /// Store whose every operation fails, like a browser store disabled
    /// by privacy settings
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes currently counted against the quota
    pub fn used_bytes(&self) -> u64 {
        self.read()
            .map(|entries| entries.iter().map(|(k, v)| entry_size(k, v)).sum())
            .unwrap_or(0)
    }

    fn read(&self) -> CacheResult<RwLockReadGuard<'_, HashMap<String, String>>> {
        if self.disabled {
            return Err(CacheError::StorageUnavailable);
        }
        self.entries
            .read()
            .map_err(|_| CacheError::Storage("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> CacheResult<RwLockWriteGuard<'_, HashMap<String, String>>> {
        if self.disabled {
            return Err(CacheError::StorageUnavailable);
        }
        self.entries
            .write()
            .map_err(|_| CacheError::Storage("memory store lock poisoned".to_string()))
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> CacheResult<()> {
        let mut entries = self.write()?;

        let used: u64 = entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| entry_size(k, v))
            .sum();
        check_quota(key, value, used, self.quota_bytes)?;

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> CacheResult<()> {
        self.write()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> CacheResult<Vec<String>> {
        Ok(self.read()?.keys().cloned().collect())
    }

    fn clear(&self) -> CacheResult<()> {
        self.write()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryStorage::new();
        assert!(store.get_item("a").unwrap().is_none());

        store.set_item("a", "1").unwrap();
        store.set_item("a", "2").unwrap();
        assert_eq!(store.get_item("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);

        store.remove_item("a").unwrap();
        store.remove_item("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn quota_rejects_without_changing_store() {
        let store = MemoryStorage::with_quota(8);
        store.set_item("k", "1234").unwrap();

        let err = store.set_item("other", "12345").unwrap_err();
        assert!(matches!(err, CacheError::QuotaExceeded { .. }));
        assert!(store.get_item("other").unwrap().is_none());
        assert_eq!(store.used_bytes(), 5);
    }

    #[test]
    fn quota_ignores_value_being_replaced() {
        let store = MemoryStorage::with_quota(8);
        store.set_item("k", "1234567").unwrap();
        store.set_item("k", "7654321").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("7654321"));
    }

    #[test]
    fn disabled_store_fails_everything() {
        let store = MemoryStorage::disabled();
        assert!(matches!(
            store.get_item("k"),
            Err(CacheError::StorageUnavailable)
        ));
        assert!(store.set_item("k", "v").is_err());
        assert!(store.remove_item("k").is_err());
        assert!(store.keys().is_err());
    }

    #[test]
    fn clear_empties_store() {
        let store = MemoryStorage::new();
        store.set_item("a", "1").unwrap();
        store.set_item("b", "2").unwrap();

        let mut keys = store.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);

        store.clear().unwrap();
        assert!(store.is_empty());
    }
}
