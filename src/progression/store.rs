//! Per-level progress records and the stores that hold them

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::Grade;
use crate::consts::{COMPLETED_SUFFIX, GRADE_SUFFIX};
use crate::persistence::{Prefs, PrefsError};

/// Saved progress for one level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub completed: bool,
    pub best_grade: Grade,
}

/// Progress storage keyed by level name.
///
/// Reads of unknown levels return the default record. `put` must persist
/// both fields of the record together.
pub trait ProgressStore {
    fn get(&self, level: &str) -> ProgressRecord;
    fn put(&mut self, level: &str, record: ProgressRecord) -> Result<(), PrefsError>;
    /// Clear every tracked level back to the default record
    fn reset_all(&mut self) -> Result<(), PrefsError>;
}

/// In-memory store (tests, sessions without persistence)
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    records: HashMap<String, ProgressRecord>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn get(&self, level: &str) -> ProgressRecord {
        self.records.get(level).copied().unwrap_or_default()
    }

    fn put(&mut self, level: &str, record: ProgressRecord) -> Result<(), PrefsError> {
        self.records.insert(level.to_string(), record);
        Ok(())
    }

    fn reset_all(&mut self) -> Result<(), PrefsError> {
        self.records.clear();
        Ok(())
    }
}

/// Store over flat prefs: `{name}_completed` -> 0|1, `{name}_grade` -> 0..3
#[derive(Debug)]
pub struct PrefsProgressStore<P: Prefs> {
    prefs: P,
    known_levels: BTreeSet<String>,
}

impl<P: Prefs> PrefsProgressStore<P> {
    /// Wrap prefs, tracking `levels` for `reset_all`
    pub fn new<I, S>(prefs: P, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefs,
            known_levels: levels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn completed_key(level: &str) -> String {
        format!("{}{}", level, COMPLETED_SUFFIX)
    }

    pub fn grade_key(level: &str) -> String {
        format!("{}{}", level, GRADE_SUFFIX)
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    pub fn into_prefs(self) -> P {
        self.prefs
    }
}

impl<P: Prefs> ProgressStore for PrefsProgressStore<P> {
    fn get(&self, level: &str) -> ProgressRecord {
        ProgressRecord {
            completed: self.prefs.get_int_or(&Self::completed_key(level), 0) == 1,
            best_grade: Grade::from_stored(self.prefs.get_int_or(&Self::grade_key(level), 0)),
        }
    }

    fn put(&mut self, level: &str, record: ProgressRecord) -> Result<(), PrefsError> {
        self.known_levels.insert(level.to_string());
        self.prefs
            .set_int(&Self::completed_key(level), record.completed as i32);
        self.prefs
            .set_int(&Self::grade_key(level), record.best_grade.stars() as i32);
        // One flush for both keys
        self.prefs.save()
    }

    fn reset_all(&mut self) -> Result<(), PrefsError> {
        for level in &self.known_levels {
            self.prefs.delete_key(&Self::completed_key(level));
            self.prefs.delete_key(&Self::grade_key(level));
        }
        log::info!("Progress reset ({} levels)", self.known_levels.len());
        self.prefs.save()
    }
}
