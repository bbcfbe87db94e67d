//! JSON file prefs for native builds

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{Prefs, PrefsError};

/// Prefs persisted as a JSON object on disk
#[derive(Debug, Clone)]
pub struct FilePrefs {
    path: PathBuf,
    values: BTreeMap<String, i32>,
    dirty: bool,
}

impl FilePrefs {
    /// Open prefs at `path`. A missing file starts empty; a corrupt one is
    /// logged and also starts empty (it is replaced on the next save).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<BTreeMap<String, i32>>(&json) {
                Ok(values) => {
                    log::info!("Loaded {} prefs from {}", values.len(), path.display());
                    values
                }
                Err(e) => {
                    log::warn!("Prefs file {} is corrupt ({}), starting fresh", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No prefs at {}, starting fresh", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                log::warn!("Prefs file {} is unreadable ({}), starting fresh", path.display(), e);
                BTreeMap::new()
            }
        };

        Self {
            path,
            values,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Prefs for FilePrefs {
    fn get_int(&self, key: &str) -> Option<i32> {
        self.values.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), value);
        self.dirty = true;
    }

    fn delete_key(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.dirty = true;
        }
    }

    fn save(&mut self) -> Result<(), PrefsError> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        // tmp -> target so a crash leaves either the old or the new batch
        let json = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        self.dirty = false;
        log::info!("Prefs saved ({} keys)", self.values.len());
        Ok(())
    }
}
