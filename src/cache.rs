//! Session value cache
//!
//! Reads, writes and invalidates [`CacheEnvelope`]s in a [`SessionStorage`].
//!
//! # Failure model
//!
//! `read`, `write` and `invalidate` never fail loudly: every problem
//! degrades to `None` / `false` and is logged at debug level. The `try_*`
//! methods run the same logic and return the cause.
//!
//! | Situation | `read` | `write` | `invalidate` |
//! |-----------|--------|---------|--------------|
//! | No store available | `None` | `false` | `false` |
//! | Key absent | `None` | writes | `true` |
//! | Entry malformed | `None`, evicted | writes, fresh `created_at` | `true` |
//! | Entry expired or TTL invalid | `None`, evicted | - | - |
//! | Falsy value | - | `false`, untouched | - |
//! | Store error | `None`, eviction attempted | `false` | `false` |

use crate::clock::{Clock, SystemClock};
use crate::envelope::{effective_max_age, CacheEnvelope};
use crate::error::{CacheError, CacheResult};
use crate::storage::SessionStorage;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Separator between a namespace and the caller's key
pub const NAMESPACE_SEPARATOR: char = ':';

/// Timestamped values over an optional session store
#[derive(Debug, Clone)]
pub struct SessionCache<S, C = SystemClock> {
    storage: Option<S>,
    clock: C,
    namespace: Option<String>,
}

impl<S: SessionStorage> SessionCache<S> {
    /// Cache over `storage`, stamped with wall-clock time
    pub fn new(storage: S) -> Self {
        Self::from_option(Some(storage))
    }

    /// Cache with no store: every operation returns its safe default
    pub fn detached() -> Self {
        Self::from_option(None)
    }

    /// Cache over a store that may not exist in this environment
    pub fn from_option(storage: Option<S>) -> Self {
        Self {
            storage,
            clock: SystemClock,
            namespace: None,
        }
    }
}

impl<S: SessionStorage, C: Clock> SessionCache<S, C> {
    /// Swap the time source
    pub fn with_clock<C2: Clock>(self, clock: C2) -> SessionCache<S, C2> {
        SessionCache {
            storage: self.storage,
            clock,
            namespace: self.namespace,
        }
    }

    /// Prefix every key with `namespace:`. An empty namespace means none.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.namespace = (!namespace.is_empty()).then_some(namespace);
        self
    }

    /// Whether a store is present
    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    /// The underlying store, if any
    pub fn storage(&self) -> Option<&S> {
        self.storage.as_ref()
    }

    /// Active namespace, if any
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The key actually used in the store for `key`
    pub fn storage_key(&self, key: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}{NAMESPACE_SEPARATOR}{key}"),
            None => key.to_string(),
        }
    }

    /// Read `key` if it was written within the last `max_age_minutes`
    /// (capped at one day). Expired, malformed or unreadable entries are
    /// removed.
    pub fn read<T: DeserializeOwned>(
        &self,
        key: &str,
        max_age_minutes: f64,
    ) -> Option<CacheEnvelope<T>> {
        match self.try_read(key, max_age_minutes) {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                debug!("Cache read of {} missed: {}", key, e);
                None
            }
        }
    }

    /// [`read`](Self::read), returning why nothing came back
    pub fn try_read<T: DeserializeOwned>(
        &self,
        key: &str,
        max_age_minutes: f64,
    ) -> CacheResult<CacheEnvelope<T>> {
        let storage = self.store()?;
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }
        let storage_key = self.storage_key(key);

        let raw = match storage.get_item(&storage_key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return Err(CacheError::NotFound(key.to_string())),
            Err(e) => {
                self.evict(storage, &storage_key);
                return Err(e);
            }
        };

        self.validate(key, &raw, max_age_minutes).inspect_err(|_| {
            self.evict(storage, &storage_key);
        })
    }

    /// Store `value` under `key`, keeping the original creation time of an
    /// existing entry. Falsy values (`null`, `false`, `0`, `""`) are refused.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match self.try_write(key, value) {
            Ok(_) => true,
            Err(e) => {
                debug!("Cache write of {} failed: {}", key, e);
                false
            }
        }
    }

    /// [`write`](Self::write), returning the stored envelope or the cause of
    /// failure
    pub fn try_write<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> CacheResult<CacheEnvelope<Value>> {
        let storage = self.store()?;
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        let data = serde_json::to_value(value)?;
        if !is_truthy(&data) {
            return Err(CacheError::FalsyValue {
                key: key.to_string(),
            });
        }

        let storage_key = self.storage_key(key);
        let now = self.clock.now_millis();
        let created_at = created_at_of(storage, &storage_key).unwrap_or(now);

        let envelope = CacheEnvelope::new(data, created_at, now);
        let raw = serde_json::to_string(&envelope)?;
        storage.set_item(&storage_key, &raw)?;

        debug!("Cached {} ({} bytes)", storage_key, raw.len());
        Ok(envelope)
    }

    /// Remove `key`. Succeeds whether or not it existed.
    pub fn invalidate(&self, key: &str) -> bool {
        match self.try_invalidate(key) {
            Ok(()) => true,
            Err(e) => {
                debug!("Cache invalidate of {} failed: {}", key, e);
                false
            }
        }
    }

    /// [`invalidate`](Self::invalidate), returning the cause of failure
    pub fn try_invalidate(&self, key: &str) -> CacheResult<()> {
        let storage = self.store()?;
        storage.remove_item(&self.storage_key(key))
    }

    /// Keys in this cache's namespace, without the prefix
    pub fn keys(&self) -> CacheResult<Vec<String>> {
        let storage = self.store()?;
        let mut keys: Vec<String> = match &self.namespace {
            Some(ns) => {
                let prefix = format!("{ns}{NAMESPACE_SEPARATOR}");
                storage
                    .keys()?
                    .into_iter()
                    .filter_map(|k| k.strip_prefix(&prefix).map(str::to_string))
                    .collect()
            }
            None => storage.keys()?,
        };
        keys.sort();
        Ok(keys)
    }

    /// Parse the entry at `key` without freshness checks or eviction
    pub fn peek(&self, key: &str) -> CacheResult<Option<CacheEnvelope<Value>>> {
        let storage = self.store()?;
        match storage.get_item(&self.storage_key(key))? {
            Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(None),
        }
    }

    fn store(&self) -> CacheResult<&S> {
        self.storage.as_ref().ok_or(CacheError::StorageUnavailable)
    }

    fn validate<T: DeserializeOwned>(
        &self,
        key: &str,
        raw: &str,
        max_age_minutes: f64,
    ) -> CacheResult<CacheEnvelope<T>> {
        let envelope: CacheEnvelope<T> =
            serde_json::from_str(raw).map_err(|e| CacheError::malformed(key, e.to_string()))?;
        if envelope.created_at > envelope.updated_at {
            return Err(CacheError::malformed(key, "created_at is after updated_at"));
        }

        let max_age_ms = effective_max_age(max_age_minutes)?;
        let now = self.clock.now_millis();
        if !envelope.is_fresh(now, max_age_ms) {
            return Err(CacheError::Expired {
                key: key.to_string(),
                age_ms: envelope.age_ms(now),
                max_age_ms,
            });
        }

        Ok(envelope)
    }

    fn evict(&self, storage: &S, storage_key: &str) {
        match storage.remove_item(storage_key) {
            Ok(()) => debug!("Evicted {}", storage_key),
            Err(e) => debug!("Failed to evict {}: {}", storage_key, e),
        }
    }
}

/// Only the creation time of an existing entry
#[derive(Deserialize)]
struct CreatedAt {
    created_at: i64,
}

/// Creation time of the entry at `storage_key`, if it parses and is non-zero
fn created_at_of<S: SessionStorage>(storage: &S, storage_key: &str) -> Option<i64> {
    let raw = storage.get_item(storage_key).ok().flatten()?;
    let parsed: CreatedAt = serde_json::from_str(&raw).ok()?;
    (parsed.created_at != 0).then_some(parsed.created_at)
}

/// Whether a value counts as present: `null`, `false`, zero and the empty
/// string do not. Empty arrays and objects do.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
