//! Flat key-value persistence (player prefs)
//!
//! Features:
//! - Integer values keyed by string, absent keys read as `None`
//! - Writes are buffered until `save`, which persists the whole batch
//! - File backend writes tmp then renames over the target
//! - LocalStorage backend stores the map under a single key

use std::collections::BTreeMap;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FilePrefs;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStoragePrefs;

/// Persistence failures
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize prefs: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Key-value store in the style of engine player prefs
pub trait Prefs {
    /// Read an integer, `None` if the key was never written
    fn get_int(&self, key: &str) -> Option<i32>;

    /// Read an integer with a default for absent keys
    fn get_int_or(&self, key: &str, default: i32) -> i32 {
        self.get_int(key).unwrap_or(default)
    }

    /// Buffer a write (visible to `get_int` immediately, durable after `save`)
    fn set_int(&mut self, key: &str, value: i32);

    /// Remove a key
    fn delete_key(&mut self, key: &str);

    /// Persist all buffered writes as one batch
    fn save(&mut self) -> Result<(), PrefsError>;
}

/// In-memory prefs (tests, headless hosts)
#[derive(Debug, Clone, Default)]
pub struct MemoryPrefs {
    values: BTreeMap<String, i32>,
    saves: usize,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `save` was called
    pub fn save_count(&self) -> usize {
        self.saves
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Prefs for MemoryPrefs {
    fn get_int(&self, key: &str) -> Option<i32> {
        self.values.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), value);
    }

    fn delete_key(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn save(&mut self) -> Result<(), PrefsError> {
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_prefs_defaults() {
        let prefs = MemoryPrefs::new();
        assert_eq!(prefs.get_int("missing"), None);
        assert_eq!(prefs.get_int_or("missing", 7), 7);
        assert!(prefs.is_empty());
    }

    #[test]
    fn test_memory_prefs_set_delete() {
        let mut prefs = MemoryPrefs::new();
        prefs.set_int("a", 1);
        prefs.set_int("a", 2);
        assert_eq!(prefs.get_int("a"), Some(2));
        prefs.delete_key("a");
        assert_eq!(prefs.get_int("a"), None);
        prefs.save().unwrap();
        assert_eq!(prefs.save_count(), 1);
    }
}
