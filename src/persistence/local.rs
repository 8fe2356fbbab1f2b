//! Browser LocalStorage backend (WASM only)

use super::Storage;
use crate::error::{GameError, Result};

/// Handle to `window.localStorage`
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    /// Open the window's LocalStorage (None outside a secure browsing context)
    pub fn open() -> Option<Self> {
        let inner = web_sys::window()?.local_storage().ok()??;
        Some(Self { inner })
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.inner
            .set_item(key, value)
            .map_err(|e| GameError::Storage(format!("set {}: {:?}", key, e)))
    }
}
