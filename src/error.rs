//! Error types for sessioncache
//!
//! All modules use `CacheResult<T>` as their return type. The degrading
//! cache operations (`read`, `write`, `invalidate`) swallow these and hand
//! back `Option`/`bool`; the `try_*` variants surface them.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sessioncache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// All errors that can occur in sessioncache
#[derive(Error, Debug)]
pub enum CacheError {
    // Argument errors
    #[error("Cache key must not be empty")]
    EmptyKey,

    #[error("Invalid minutes argument for cache TTL: {0}")]
    InvalidTtl(f64),

    #[error("Refusing to cache a falsy value under {key}")]
    FalsyValue { key: String },

    // Entry errors
    #[error("Cache miss: {0}")]
    NotFound(String),

    #[error("Cache entry expired: {key} (age {age_ms}ms, max {max_age_ms}ms)")]
    Expired {
        key: String,
        age_ms: i64,
        max_age_ms: i64,
    },

    #[error("Malformed cache entry {key}: {reason}")]
    Malformed { key: String, reason: String },

    // Storage errors
    #[error("Session storage is not available in this environment")]
    StorageUnavailable,

    #[error("Storage quota exceeded writing {key}: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: u64,
        quota: u64,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    // Session errors
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid session id {id:?}: {reason}")]
    SessionInvalid { id: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl CacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a malformed entry error
    pub fn malformed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error means "no usable entry" rather than a failure of
    /// the store itself
    pub fn is_miss(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Expired { .. } | Self::Malformed { .. } | Self::InvalidTtl(_)
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidTtl(_) => Some("Pass a positive number of minutes, e.g. --max-age 30"),
            Self::FalsyValue { .. } => {
                Some("null, false, 0 and \"\" cannot be cached; use invalidate to clear a key")
            }
            Self::QuotaExceeded { .. } => {
                Some("Invalidate unused keys or raise storage.quota_bytes in the config")
            }
            Self::SessionNotFound(_) => Some("Run: sessioncache session list"),
            Self::SessionInvalid { .. } => {
                Some("Session ids may only contain letters, digits, '-' and '_'")
            }
            _ => None,
        }
    }
}
