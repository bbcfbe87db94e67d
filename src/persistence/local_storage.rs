//! LocalStorage prefs for the web build

use std::collections::BTreeMap;

use super::{Prefs, PrefsError};

/// Prefs stored as one JSON object under a single LocalStorage key,
/// so a save replaces every value at once.
#[derive(Debug, Clone)]
pub struct LocalStoragePrefs {
    key: String,
    values: BTreeMap<String, i32>,
}

impl LocalStoragePrefs {
    /// Default LocalStorage key
    pub const STORAGE_KEY: &'static str = "tilt_run_prefs";

    pub fn load() -> Self {
        Self::load_key(Self::STORAGE_KEY)
    }

    pub fn load_key(key: &str) -> Self {
        let values = Self::storage()
            .and_then(|storage| storage.get_item(key).ok().flatten())
            .and_then(|json| serde_json::from_str::<BTreeMap<String, i32>>(&json).ok());

        let values = match values {
            Some(values) => {
                log::info!("Loaded {} prefs from LocalStorage", values.len());
                values
            }
            None => {
                log::info!("No prefs found, starting fresh");
                BTreeMap::new()
            }
        };

        Self {
            key: key.to_string(),
            values,
        }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl Prefs for LocalStoragePrefs {
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
        let storage = Self::storage()
            .ok_or_else(|| PrefsError::Unavailable("LocalStorage not accessible".to_string()))?;
        let json = serde_json::to_string(&self.values)?;
        storage
            .set_item(&self.key, &json)
            .map_err(|e| PrefsError::Unavailable(format!("{:?}", e)))?;
        log::info!("Prefs saved ({} keys)", self.values.len());
        Ok(())
    }
}
