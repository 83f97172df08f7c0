//! Directory-backed store
//!
//! One file per key, named by the SHA-256 of the key so arbitrary key
//! strings map to safe file names. Each file holds the original key next to
//! the value so the key set can be listed back.

use super::{check_quota, entry_size, SessionStorage};
use crate::error::{CacheError, CacheResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// On-disk record for one key
#[derive(Debug, Serialize, Deserialize)]
struct FileEntry {
    key: String,
    value: String,
}

/// Store rooted at a session directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    quota_bytes: u64,
}

impl FileStorage {
    /// Open (creating if needed) a store in `dir`
    pub fn open(dir: impl Into<PathBuf>) -> CacheResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| CacheError::io(format!("creating store directory {}", dir.display()), e))?;

        // Set restrictive permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o700);
            fs::set_permissions(&dir, perms)
                .map_err(|e| CacheError::io("setting store directory permissions", e))?;
        }

        Ok(Self {
            dir,
            quota_bytes: 0,
        })
    }

    /// Limit total key + value bytes; zero means unlimited
    pub fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    /// Directory holding the entries
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(digest)))
    }

    fn read_entry(path: &Path) -> CacheResult<Option<FileEntry>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CacheError::io(
                    format!("reading store entry {}", path.display()),
                    e,
                ))
            }
        };

        let entry: FileEntry = serde_json::from_str(&content)
            .map_err(|e| CacheError::Storage(format!("corrupt store entry {}: {}", path.display(), e)))?;
        Ok(Some(entry))
    }

    /// Every readable entry except the one for `skip_key`
    fn entries(&self, skip_key: Option<&str>) -> CacheResult<Vec<FileEntry>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(CacheError::io("reading store directory", e)),
        };

        let mut entries = vec![];
        for dir_entry in read_dir {
            let dir_entry = dir_entry.map_err(|e| CacheError::io("reading store entry", e))?;
            let path = dir_entry.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }

            match Self::read_entry(&path) {
                Ok(Some(entry)) if Some(entry.key.as_str()) != skip_key => entries.push(entry),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable store entry: {}", e),
            }
        }
        Ok(entries)
    }
}

/// Replace `path` through a temp file private to this write, so concurrent
/// writers of one key never share a partial file.
fn write_atomic(path: &Path, content: &str) -> CacheResult<()> {
    let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

    let result = fs::File::create(&temp_path)
        .and_then(|mut file| {
            file.write_all(content.as_bytes())?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&temp_path, path));

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(CacheError::io(format!("writing {}", path.display()), e));
    }
    Ok(())
}

impl SessionStorage for FileStorage {
    fn get_item(&self, key: &str) -> CacheResult<Option<String>> {
        let path = self.entry_path(key);
        Ok(Self::read_entry(&path)?
            .filter(|entry| entry.key == key)
            .map(|entry| entry.value))
    }

    fn set_item(&self, key: &str, value: &str) -> CacheResult<()> {
        if self.quota_bytes > 0 {
            let used: u64 = self
                .entries(Some(key))?
                .iter()
                .map(|entry| entry_size(&entry.key, &entry.value))
                .sum();
            check_quota(key, value, used, self.quota_bytes)?;
        }

        let path = self.entry_path(key);
        let content = serde_json::to_string(&FileEntry {
            key: key.to_string(),
            value: value.to_string(),
        })?;

        write_atomic(&path, &content)?;

        debug!("Stored {} bytes for key {}", content.len(), key);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> CacheResult<()> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::io(format!("removing {}", path.display()), e)),
        }
    }

    fn keys(&self) -> CacheResult<Vec<String>> {
        Ok(self.entries(None)?.into_iter().map(|entry| entry.key).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (FileStorage, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = FileStorage::open(temp.path().join("session")).unwrap();
        (store, temp)
    }

    #[test]
    fn set_get_remove() {
        let (store, _temp) = test_store();

        store.set_item("user/profile", "{\"a\":1}").unwrap();
        assert_eq!(
            store.get_item("user/profile").unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        store.remove_item("user/profile").unwrap();
        assert!(store.get_item("user/profile").unwrap().is_none());
        store.remove_item("user/profile").unwrap();
    }

    #[test]
    fn keys_lists_original_strings() {
        let (store, _temp) = test_store();
        store.set_item("a b", "1").unwrap();
        store.set_item("../etc", "2").unwrap();

        let mut keys = store.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["../etc", "a b"]);
    }

    #[test]
    fn file_names_are_hashed() {
        let (store, _temp) = test_store();
        store.set_item("../escape", "v").unwrap();

        let names: Vec<String> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].len(), 64 + ".json".len());
    }

    #[test]
    fn quota_enforced_across_files() {
        let temp = TempDir::new().unwrap();
        let store = FileStorage::open(temp.path()).unwrap().with_quota(10);

        store.set_item("a", "1234").unwrap();
        store.set_item("a", "123456789").unwrap();
        let err = store.set_item("b", "1").unwrap_err();
        assert!(matches!(err, CacheError::QuotaExceeded { .. }));
        assert!(store.get_item("b").unwrap().is_none());
    }

    #[test]
    fn corrupt_entry_is_a_storage_error() {
        let (store, _temp) = test_store();
        fs::write(store.entry_path("k"), "not json").unwrap();

        assert!(matches!(store.get_item("k"), Err(CacheError::Storage(_))));
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn concurrent_writers_of_one_key() {
        let (store, _temp) = test_store();
        let small = "s".repeat(10);
        let large = "L".repeat(50_000);

        for _ in 0..50 {
            std::thread::scope(|scope| {
                let handles: Vec<_> = (0..4)
                    .map(|i| {
                        let value = if i % 2 == 0 { &small } else { &large };
                        let store = &store;
                        scope.spawn(move || store.set_item("k", value))
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap().unwrap();
                }
            });

            let value = store.get_item("k").unwrap().unwrap();
            assert!(value == small || value == large);
        }

        let names: Vec<String> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        let entry_name = store.entry_path("k");
        let entry_name = entry_name.file_name().unwrap().to_string_lossy();
        assert_eq!(names, vec![entry_name.into_owned()]);
    }

    #[test]
    fn clear_removes_everything() {
        let (store, _temp) = test_store();
        store.set_item("a", "1").unwrap();
        store.set_item("b", "2").unwrap();

        store.clear().unwrap();
        assert!(store.keys().unwrap().is_empty());
    }
}
