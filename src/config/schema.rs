//! Configuration schema for sessioncache
//!
//! Configuration is stored at `~/.config/sessioncache/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default session id when none is given
pub const DEFAULT_SESSION: &str = "default";

/// 5 MiB, the usual per-origin browser limit
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache behaviour
    pub cache: CacheConfig,

    /// Backing store settings
    pub storage: StorageConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Prefix applied to every key as `namespace:key`
    pub namespace: Option<String>,

    /// Freshness window used by `get` when `--max-age` is omitted
    pub default_max_age_minutes: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            default_max_age_minutes: 30.0,
        }
    }
}

/// Backing store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Session used when neither `--session` nor `SESSIONCACHE_SESSION` is set
    pub session: String,

    /// Byte limit per session (0 = unlimited)
    pub quota_bytes: u64,

    /// Override for the sessions directory
    pub dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session: DEFAULT_SESSION.to_string(),
            quota_bytes: DEFAULT_QUOTA_BYTES,
            dir: None,
        }
    }
}
