//! Key-value persistence
//!
//! High scores and session config live in a flat string store:
//! - LocalStorage in the browser
//! - An in-memory map natively and in tests

use std::collections::HashMap;

use crate::error::Result;

#[cfg(target_arch = "wasm32")]
mod local;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

/// Durable string key-value store
pub trait Storage {
    /// Read a value (None if missing or unreadable)
    fn get(&self, key: &str) -> Option<String>;
    /// Write a value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store, lost when the process exits
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_set_get() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("highScoreOne"), None);

        storage.set("highScoreOne", "120").unwrap();
        assert_eq!(storage.get("highScoreOne").as_deref(), Some("120"));

        storage.set("highScoreOne", "150").unwrap();
        assert_eq!(storage.get("highScoreOne").as_deref(), Some("150"));
    }
}
