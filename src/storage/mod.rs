//! Session-scoped key-value stores
//!
//! The cache talks to its backing store only through [`SessionStorage`],
//! a synchronous string-to-string map shaped like the browser's
//! `sessionStorage`. Each primitive call is atomic on its own; nothing
//! spans calls.
//!
//! | Backend | Scope | Notes |
//! |---------|-------|-------|
//! | [`MemoryStorage`] | process | tests, embedding |
//! | [`FileStorage`] | session directory | used by the CLI |
//! | `BrowserSessionStorage` | browser tab | feature `browser` |

#[cfg(feature = "browser")]
pub mod browser;
pub mod file;
pub mod memory;

#[cfg(feature = "browser")]
pub use browser::BrowserSessionStorage;
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::{CacheError, CacheResult};
use std::sync::Arc;

/// A flat, synchronous, string-keyed store
pub trait SessionStorage {
    /// Raw value at `key`, if any
    fn get_item(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `value` at `key`, replacing whatever was there
    fn set_item(&self, key: &str, value: &str) -> CacheResult<()>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove_item(&self, key: &str) -> CacheResult<()>;

    /// All keys currently stored, in no particular order
    fn keys(&self) -> CacheResult<Vec<String>>;

    /// Remove every entry
    fn clear(&self) -> CacheResult<()> {
        for key in self.keys()? {
            self.remove_item(&key)?;
        }
        Ok(())
    }
}

impl<S: SessionStorage + ?Sized> SessionStorage for &S {
    fn get_item(&self, key: &str) -> CacheResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> CacheResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> CacheResult<()> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> CacheResult<Vec<String>> {
        (**self).keys()
    }

    fn clear(&self) -> CacheResult<()> {
        (**self).clear()
    }
}

impl<S: SessionStorage + ?Sized> SessionStorage for Arc<S> {
    fn get_item(&self, key: &str) -> CacheResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> CacheResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> CacheResult<()> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> CacheResult<Vec<String>> {
        (**self).keys()
    }

    fn clear(&self) -> CacheResult<()> {
        (**self).clear()
    }
}

/// Enforce a byte quota. `used` is the size of every other entry;
/// a quota of zero disables the check.
pub(crate) fn check_quota(key: &str, value: &str, used: u64, quota: u64) -> CacheResult<()> {
    if quota == 0 {
        return Ok(());
    }

    let needed = used + entry_size(key, value);
    if needed > quota {
        return Err(CacheError::QuotaExceeded {
            key: key.to_string(),
            needed,
            quota,
        });
    }
    Ok(())
}

/// Bytes an entry counts against a quota
pub(crate) fn entry_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}
