//! Cache operations against the ambient browser session store
//!
//! On wasm32 with the `browser` feature these talk to
//! `window.sessionStorage`. Anywhere else there is no client-side store and
//! every call returns its safe default.

use crate::cache::SessionCache;
use crate::envelope::CacheEnvelope;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[cfg(all(feature = "browser", target_arch = "wasm32"))]
type AmbientStorage = crate::storage::BrowserSessionStorage;

#[cfg(not(all(feature = "browser", target_arch = "wasm32")))]
type AmbientStorage = crate::storage::MemoryStorage;

#[cfg(all(feature = "browser", target_arch = "wasm32"))]
fn ambient() -> SessionCache<AmbientStorage> {
    SessionCache::from_option(AmbientStorage::detect())
}

#[cfg(not(all(feature = "browser", target_arch = "wasm32")))]
fn ambient() -> SessionCache<AmbientStorage> {
    SessionCache::detached()
}

/// Whether a client-side session store is reachable
pub fn is_client() -> bool {
    ambient().is_available()
}

/// Read `key_name` from session storage if it was written within the last
/// `not_older_than` minutes (never more than one day). Stale or malformed
/// entries are removed.
pub fn read_cache<T: DeserializeOwned>(
    key_name: &str,
    not_older_than: f64,
) -> Option<CacheEnvelope<T>> {
    ambient().read(key_name, not_older_than)
}

/// Write `chunk` to session storage under `key_name`, replacing any
/// existing value but keeping its creation time.
pub fn write_cache<T: Serialize + ?Sized>(key_name: &str, chunk: &T) -> bool {
    ambient().write(key_name, chunk)
}

/// Remove `key_name` from session storage
pub fn invalidate_cache(key_name: &str) -> bool {
    ambient().invalidate(key_name)
}
