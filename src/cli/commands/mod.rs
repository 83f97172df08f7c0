//! CLI command implementations

pub mod config;
pub mod get;
pub mod invalidate;
pub mod keys;
pub mod session;
pub mod set;

pub use config::execute as config;
pub use get::execute as get;
pub use invalidate::execute as invalidate;
pub use keys::execute as keys;
pub use session::execute as session;
pub use set::execute as set;

use crate::cache::SessionCache;
use crate::config::{Config, ConfigManager};
use crate::error::CacheResult;
use crate::session::{Session, SessionManager};
use crate::storage::FileStorage;

/// Session and namespace a command operates on, from the global flags
#[derive(Debug, Clone, Default)]
pub struct Target {
    /// `--session`, falling back to `storage.session`
    pub session: Option<String>,

    /// `--namespace`, falling back to `cache.namespace`
    pub namespace: Option<String>,
}

impl Target {
    /// The selected session
    pub fn session(&self, config: &Config) -> CacheResult<Session> {
        let id = self.session.as_deref().unwrap_or(&config.storage.session);
        Session::open(&ConfigManager::sessions_dir(config), id)
    }

    /// Manager over the configured sessions root
    pub fn manager(&self, config: &Config) -> SessionManager {
        SessionManager::new(ConfigManager::sessions_dir(config))
    }

    /// Cache over the selected session's store, in the selected namespace
    pub fn cache(&self, config: &Config) -> CacheResult<SessionCache<FileStorage>> {
        let storage = self.session(config)?.storage(config.storage.quota_bytes)?;
        let namespace = self
            .namespace
            .clone()
            .or_else(|| config.cache.namespace.clone())
            .unwrap_or_default();
        Ok(SessionCache::new(storage).with_namespace(namespace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(temp: &TempDir) -> Config {
        let mut config = Config::default();
        config.storage.dir = Some(temp.path().to_path_buf());
        config
    }

    #[test]
    fn flags_override_config() {
        let temp = TempDir::new().unwrap();
        let mut config = config_in(&temp);
        config.cache.namespace = Some("cfg".to_string());

        let target = Target {
            session: Some("tab-2".to_string()),
            namespace: Some("flag".to_string()),
        };

        assert_eq!(target.session(&config).unwrap().id(), "tab-2");
        assert_eq!(target.cache(&config).unwrap().namespace(), Some("flag"));
    }

    #[test]
    fn config_used_without_flags() {
        let temp = TempDir::new().unwrap();
        let mut config = config_in(&temp);
        config.cache.namespace = Some("cfg".to_string());

        let target = Target::default();
        assert_eq!(target.session(&config).unwrap().id(), "default");
        assert_eq!(target.cache(&config).unwrap().namespace(), Some("cfg"));
    }

    #[test]
    fn invalid_session_flag_rejected() {
        let temp = TempDir::new().unwrap();
        let target = Target {
            session: Some("../escape".to_string()),
            namespace: None,
        };
        assert!(target.cache(&config_in(&temp)).is_err());
    }
}
