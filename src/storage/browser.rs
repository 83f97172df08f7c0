//! The browser's `window.sessionStorage`

use super::SessionStorage;
use crate::error::{CacheError, CacheResult};
use wasm_bindgen::{JsCast, JsValue};

/// Handle on the current tab's session store
#[derive(Debug, Clone)]
pub struct BrowserSessionStorage {
    storage: web_sys::Storage,
}

impl BrowserSessionStorage {
    /// The session store, if running client-side with one available.
    /// Returns `None` outside a window context or when access is denied.
    pub fn detect() -> Option<Self> {
        let storage = web_sys::window().and_then(|w| w.session_storage().ok().flatten())?;
        Some(Self { storage })
    }
}

fn js_error(key: &str, err: JsValue) -> CacheError {
    if let Some(dom) = err.dyn_ref::<web_sys::DomException>() {
        if dom.name() == "QuotaExceededError" {
            return CacheError::QuotaExceeded {
                key: key.to_string(),
                needed: 0,
                quota: 0,
            };
        }
        return CacheError::Storage(format!("{}: {}", dom.name(), dom.message()));
    }
    CacheError::Storage(format!("{:?}", err))
}

impl SessionStorage for BrowserSessionStorage {
    fn get_item(&self, key: &str) -> CacheResult<Option<String>> {
        self.storage.get_item(key).map_err(|e| js_error(key, e))
    }

    fn set_item(&self, key: &str, value: &str) -> CacheResult<()> {
        self.storage.set_item(key, value).map_err(|e| js_error(key, e))
    }

    fn remove_item(&self, key: &str) -> CacheResult<()> {
        self.storage.remove_item(key).map_err(|e| js_error(key, e))
    }

    fn keys(&self) -> CacheResult<Vec<String>> {
        let len = self.storage.length().map_err(|e| js_error("", e))?;
        let mut keys = Vec::with_capacity(len as usize);
        for index in 0..len {
            if let Some(key) = self.storage.key(index).map_err(|e| js_error("", e))? {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    fn clear(&self) -> CacheResult<()> {
        self.storage.clear().map_err(|e| js_error("", e))
    }
}
