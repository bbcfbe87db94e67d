//! Level select screen state

use super::{LevelDatabase, ProgressStore, ProgressionError, SceneRequest, is_unlocked};

/// One button on the level select screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    pub index: usize,
    pub name: String,
    /// Button is interactable
    pub unlocked: bool,
    /// Filled stars (0 - 3)
    pub stars: u8,
    /// Star indicators are only shown on unlocked levels
    pub stars_visible: bool,
}

/// Level select view over a level list
#[derive(Debug, Clone, Copy)]
pub struct LevelSelect<'a> {
    levels: &'a LevelDatabase,
}

impl<'a> LevelSelect<'a> {
    pub fn new(levels: &'a LevelDatabase) -> Self {
        Self { levels }
    }

    /// Rebuild every button from stored progress
    pub fn entries(&self, store: &impl ProgressStore) -> Vec<LevelEntry> {
        self.levels
            .levels
            .iter()
            .enumerate()
            .map(|(index, level)| {
                let unlocked = is_unlocked(store, self.levels, index);
                LevelEntry {
                    index,
                    name: level.name.clone(),
                    unlocked,
                    stars: store.get(&level.name).best_grade.stars(),
                    stars_visible: unlocked,
                }
            })
            .collect()
    }

    /// Handle a click on button `index`
    pub fn select(
        &self,
        store: &impl ProgressStore,
        index: usize,
    ) -> Result<SceneRequest, ProgressionError> {
        let len = self.levels.len();
        let Some(level) = self.levels.get(index) else {
            log::warn!("Level index {} out of range ({} levels)", index, len);
            return Err(ProgressionError::IndexOutOfRange { index, len });
        };

        if !is_unlocked(store, self.levels, index) {
            log::warn!("Level {} ({}) is locked", index, level.name);
            return Err(ProgressionError::Locked(index));
        }

        log::info!("Loading level: {}", level.name);
        Ok(SceneRequest::Load(level.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::{Grade, LevelInfo, MemoryProgressStore, record_completion};

    fn db() -> LevelDatabase {
        LevelDatabase::new(vec![
            LevelInfo::with_defaults("Level_1"),
            LevelInfo::with_defaults("Level_2"),
            LevelInfo::with_defaults("Level_3"),
        ])
        .unwrap()
    }

    #[test]
    fn test_fresh_entries() {
        let db = db();
        let store = MemoryProgressStore::new();
        let entries = LevelSelect::new(&db).entries(&store);

        assert_eq!(entries.len(), 3);
        assert!(entries[0].unlocked && entries[0].stars_visible);
        assert!(!entries[1].unlocked && !entries[1].stars_visible);
        assert!(entries.iter().all(|e| e.stars == 0));
    }

    #[test]
    fn test_entries_after_progress() {
        let db = db();
        let mut store = MemoryProgressStore::new();
        record_completion(&mut store, "Level_1", Grade::TWO, false).unwrap();

        let entries = LevelSelect::new(&db).entries(&store);
        assert_eq!(entries[0].stars, 2);
        assert!(entries[1].unlocked);
        assert!(!entries[2].unlocked);
    }

    #[test]
    fn test_select() {
        let db = db();
        let mut store = MemoryProgressStore::new();
        let select = LevelSelect::new(&db);

        assert_eq!(
            select.select(&store, 0).unwrap(),
            SceneRequest::Load("Level_1".to_string())
        );
        assert!(matches!(select.select(&store, 1), Err(ProgressionError::Locked(1))));
        assert!(matches!(
            select.select(&store, 7),
            Err(ProgressionError::IndexOutOfRange { index: 7, len: 3 })
        ));

        record_completion(&mut store, "Level_1", Grade::ONE, false).unwrap();
        assert_eq!(
            select.select(&store, 1).unwrap(),
            SceneRequest::Load("Level_2".to_string())
        );
    }

    #[test]
    fn test_viewing_does_not_write_progress() {
        let db = db();
        let store = MemoryProgressStore::new();
        let select = LevelSelect::new(&db);
        select.entries(&store);
        select.select(&store, 0).unwrap();
        assert!(!store.get("Level_1").completed);
    }
}
