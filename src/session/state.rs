//! A named session and the store behind it

use crate::error::{CacheError, CacheResult};
use crate::storage::FileStorage;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const MAX_ID_LEN: usize = 64;

/// One session directory under the sessions root
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    dir: PathBuf,
}

/// Summary of a session on disk
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    /// Session id
    pub id: String,

    /// Number of stored entries
    pub entries: usize,

    /// Most recent modification of the session or any entry
    pub modified: Option<DateTime<Utc>>,
}

impl Session {
    /// Session `id` under `root`. The directory is not created until the
    /// store is opened.
    pub fn open(root: &Path, id: &str) -> CacheResult<Self> {
        validate_id(id)?;
        Ok(Self {
            id: id.to_string(),
            dir: root.join(id),
        })
    }

    /// A new session with a random id
    pub fn generate(root: &Path) -> Self {
        let id = Uuid::new_v4().to_string();
        Self {
            dir: root.join(&id),
            id,
        }
    }

    /// Session id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Session directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether the session has been created on disk
    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    /// Open the session's store, creating the directory if needed
    pub fn storage(&self, quota_bytes: u64) -> CacheResult<FileStorage> {
        Ok(FileStorage::open(&self.dir)?.with_quota(quota_bytes))
    }

    /// Summarise the session as it is on disk
    pub fn info(&self) -> CacheResult<SessionInfo> {
        let dir_meta = fs::metadata(&self.dir)
            .map_err(|e| CacheError::io(format!("reading session {}", self.dir.display()), e))?;
        let mut modified = dir_meta.modified().ok();
        let mut entries = 0;

        let read_dir = fs::read_dir(&self.dir)
            .map_err(|e| CacheError::io(format!("reading session {}", self.dir.display()), e))?;
        for entry in read_dir.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            entries += 1;
            if let Some(file_modified) = entry.metadata().ok().and_then(|m| m.modified().ok()) {
                modified = modified.max(Some(file_modified));
            }
        }

        Ok(SessionInfo {
            id: self.id.clone(),
            entries,
            modified: modified.map(DateTime::<Utc>::from),
        })
    }
}

/// Check that `id` is usable as a directory name
pub fn validate_id(id: &str) -> CacheResult<()> {
    let invalid = |reason: &str| CacheError::SessionInvalid {
        id: id.to_string(),
        reason: reason.to_string(),
    };

    if id.is_empty() {
        return Err(invalid("empty"));
    }
    if id.len() > MAX_ID_LEN {
        return Err(invalid("longer than 64 characters"));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid("contains characters other than letters, digits, '-' and '_'"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SessionStorage;
    use tempfile::TempDir;

    #[test]
    fn valid_ids() {
        for id in ["default", "tab-1", "a_b", "x".repeat(64).as_str()] {
            assert!(validate_id(id).is_ok(), "{id}");
        }
    }

    #[test]
    fn invalid_ids() {
        for id in ["", "../up", "a b", "a/b", "é", "x".repeat(65).as_str()] {
            assert!(
                matches!(validate_id(id), Err(CacheError::SessionInvalid { .. })),
                "{id}"
            );
        }
    }

    #[test]
    fn generated_ids_are_uuids() {
        let temp = TempDir::new().unwrap();
        let session = Session::generate(temp.path());
        assert!(Uuid::parse_str(session.id()).is_ok());
        assert!(validate_id(session.id()).is_ok());
        assert!(!session.exists());
    }

    #[test]
    fn storage_creates_directory() {
        let temp = TempDir::new().unwrap();
        let session = Session::open(temp.path(), "s1").unwrap();
        let store = session.storage(0).unwrap();
        store.set_item("a", "1").unwrap();
        store.set_item("b", "2").unwrap();

        assert!(session.exists());
        let info = session.info().unwrap();
        assert_eq!(info.id, "s1");
        assert_eq!(info.entries, 2);
        assert!(info.modified.is_some());
    }
}
