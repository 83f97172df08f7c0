//! Session lifecycle management

use crate::error::{CacheError, CacheResult};
use crate::session::state::{Session, SessionInfo};
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Session manager handles listing, ending and cleaning up sessions
pub struct SessionManager {
    root: PathBuf,
}

impl SessionManager {
    /// Manage sessions under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Sessions root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a session by id
    pub fn get(&self, id: &str) -> CacheResult<Session> {
        Session::open(&self.root, id)
    }

    /// A fresh session with a random id, created on disk
    pub fn create(&self) -> CacheResult<Session> {
        let session = Session::generate(&self.root);
        session.storage(0)?;
        info!("Created session: {}", session.id());
        Ok(session)
    }

    /// List all sessions, most recently modified first
    pub fn list(&self) -> CacheResult<Vec<SessionInfo>> {
        if !self.root.exists() {
            return Ok(vec![]);
        }

        let read_dir = fs::read_dir(&self.root)
            .map_err(|e| CacheError::io("reading sessions directory", e))?;

        let mut sessions = vec![];
        for entry in read_dir.flatten() {
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let Ok(session) = Session::open(&self.root, &name) else {
                debug!("Ignoring foreign directory {}", name);
                continue;
            };
            match session.info() {
                Ok(info) => sessions.push(info),
                Err(e) => warn!("Skipping unreadable session {}: {}", name, e),
            }
        }

        sessions.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(sessions)
    }

    /// End a session, removing its store
    pub fn end(&self, id: &str) -> CacheResult<()> {
        let session = self.get(id)?;
        if !session.exists() {
            return Err(CacheError::SessionNotFound(id.to_string()));
        }

        fs::remove_dir_all(session.dir()).map_err(|e| {
            CacheError::io(format!("removing session {}", session.dir().display()), e)
        })?;
        info!("Ended session: {}", id);
        Ok(())
    }

    /// End sessions untouched for more than `max_age_hours`. Zero disables.
    pub fn cleanup(&self, max_age_hours: u32) -> CacheResult<u32> {
        if max_age_hours == 0 {
            return Ok(0);
        }

        self.cleanup_before(Utc::now() - Duration::hours(i64::from(max_age_hours)))
    }

    /// End sessions last modified before `cutoff`
    pub fn cleanup_before(&self, cutoff: DateTime<Utc>) -> CacheResult<u32> {
        let stale: Vec<String> = self
            .list()?
            .into_iter()
            .filter(|session| session.modified.is_some_and(|modified| modified < cutoff))
            .map(|session| session.id)
            .collect();

        Ok(self.end_all(&stale))
    }

    /// End each of `ids`, skipping past any that fail
    fn end_all(&self, ids: &[String]) -> u32 {
        let mut cleaned = 0;
        for id in ids {
            match self.end(id) {
                Ok(()) => {
                    cleaned += 1;
                    info!("Cleaned up old session: {}", id);
                }
                Err(e) => warn!("Failed to clean up session {}: {}", id, e),
            }
        }
        cleaned
    }
}
