//! Level progression
//!
//! Grades completion times, keeps the best grade per level and decides
//! which levels are playable. All state lives behind `ProgressStore`;
//! nothing here touches the engine directly.

pub mod level;
pub mod run;
pub mod select;
pub mod store;

pub use level::{Grade, LevelDatabase, LevelInfo, grade};
pub use run::{CompletionReport, LevelRun, ThresholdLabel, ThresholdMark, WinScreenAction, format_time};
pub use select::{LevelEntry, LevelSelect};
pub use store::{MemoryProgressStore, PrefsProgressStore, ProgressRecord, ProgressStore};

use crate::persistence::PrefsError;

/// Progression failures
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    #[error("No level at index {0}")]
    UnknownLevel(usize),

    #[error("Level index {index} out of range ({len} levels)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Level {0} is locked")]
    Locked(usize),

    #[error("Level '{name}' needs thresholds with grade3 < grade2 < grade1")]
    InvalidThresholds { name: String },

    #[error("Duplicate level name '{0}'")]
    DuplicateLevel(String),

    #[error("Bad level database: {0}")]
    Database(#[from] serde_json::Error),

    #[error("Progress store error: {0}")]
    Store(#[from] PrefsError),
}

/// Scene change the host should perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneRequest {
    /// Reload the active scene
    Reload,
    /// Load a scene by name
    Load(String),
}

/// Apply a completion with `grade` to the stored record for `level`.
///
/// The best grade only ever rises. The level is marked completed once the
/// best grade is nonzero, or on any finish when `zero_grade_completes` is
/// set. Both fields are written in one `put`.
pub fn record_completion(
    store: &mut impl ProgressStore,
    level: &str,
    grade: Grade,
    zero_grade_completes: bool,
) -> Result<ProgressRecord, ProgressionError> {
    let mut record = store.get(level);

    if grade > record.best_grade {
        record.best_grade = grade;
    }

    if !record.best_grade.is_zero() || zero_grade_completes {
        record.completed = true;
        store.put(level, record)?;
        log::info!(
            "Level {} completed with grade {} (best {})",
            level,
            grade,
            record.best_grade
        );
    } else {
        log::info!("Level {} finished without a star, progress unchanged", level);
    }

    Ok(record)
}

/// Index 0 is always open; index i opens once level i-1 is completed
pub fn is_unlocked(store: &impl ProgressStore, levels: &LevelDatabase, index: usize) -> bool {
    if index >= levels.len() {
        return false;
    }
    if index == 0 {
        return true;
    }
    store.get(&levels.levels[index - 1].name).completed
}

/// Wipe all progress (debug/admin only)
pub fn reset_progress(store: &mut impl ProgressStore) -> Result<(), ProgressionError> {
    store.reset_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> LevelDatabase {
        LevelDatabase::new(vec![
            LevelInfo::with_defaults("Level_1"),
            LevelInfo::with_defaults("Level_2"),
            LevelInfo::with_defaults("Level_3"),
        ])
        .unwrap()
    }

    #[test]
    fn test_best_grade_never_drops() {
        let mut store = MemoryProgressStore::new();
        record_completion(&mut store, "Level_1", Grade::TWO, false).unwrap();
        let record = record_completion(&mut store, "Level_1", Grade::ONE, false).unwrap();
        assert_eq!(record.best_grade, Grade::TWO);
        assert_eq!(store.get("Level_1").best_grade, Grade::TWO);
        assert!(store.get("Level_1").completed);
    }

    #[test]
    fn test_threshold_example() {
        let level = LevelInfo::new("Level_1", 60.0, 90.0, 120.0).unwrap();
        let mut store = MemoryProgressStore::new();

        record_completion(&mut store, &level.name, level.grade(59.9), false).unwrap();
        assert_eq!(store.get("Level_1").best_grade, Grade::THREE);

        record_completion(&mut store, &level.name, level.grade(95.0), false).unwrap();
        assert_eq!(store.get("Level_1").best_grade, Grade::THREE);
    }

    #[test]
    fn test_zero_grade_does_not_complete() {
        let mut store = MemoryProgressStore::new();
        let record = record_completion(&mut store, "Level_1", Grade::ZERO, false).unwrap();
        assert!(!record.completed);
        assert_eq!(store.get("Level_1"), ProgressRecord::default());
    }

    #[test]
    fn test_zero_grade_keeps_previous_completion() {
        let mut store = MemoryProgressStore::new();
        record_completion(&mut store, "Level_1", Grade::ONE, false).unwrap();
        record_completion(&mut store, "Level_1", Grade::ZERO, false).unwrap();
        let record = store.get("Level_1");
        assert!(record.completed);
        assert_eq!(record.best_grade, Grade::ONE);
    }

    #[test]
    fn test_zero_grade_completes_when_configured() {
        let mut store = MemoryProgressStore::new();
        let record = record_completion(&mut store, "Level_1", Grade::ZERO, true).unwrap();
        assert!(record.completed);
        assert_eq!(record.best_grade, Grade::ZERO);
        assert!(is_unlocked(&store, &db(), 1));
    }

    #[test]
    fn test_unlock_gating() {
        let db = db();
        let mut store = MemoryProgressStore::new();
        assert!(is_unlocked(&store, &db, 0));
        assert!(!is_unlocked(&store, &db, 1));
        assert!(!is_unlocked(&store, &db, 2));

        record_completion(&mut store, "Level_1", Grade::ONE, false).unwrap();
        assert!(is_unlocked(&store, &db, 1));
        assert!(!is_unlocked(&store, &db, 2));
        assert!(!is_unlocked(&store, &db, 3));
    }

    #[test]
    fn test_reset_restores_initial_unlocks() {
        let db = db();
        let mut store = MemoryProgressStore::new();
        for name in db.names() {
            record_completion(&mut store, name, Grade::THREE, false).unwrap();
        }
        assert!(is_unlocked(&store, &db, 2));

        reset_progress(&mut store).unwrap();
        assert!(is_unlocked(&store, &db, 0));
        assert!(!is_unlocked(&store, &db, 1));
        assert!(!is_unlocked(&store, &db, 2));
        assert!(db.names().all(|n| store.get(n).best_grade == Grade::ZERO));
    }
}
