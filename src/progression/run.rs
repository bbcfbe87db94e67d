//! A single play of a level, from start to the win screen

use super::{
    Grade, LevelDatabase, LevelInfo, ProgressStore, ProgressionError, SceneRequest,
    record_completion,
};
use crate::settings::ProgressionSettings;

/// How a threshold label should be styled on the win screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdMark {
    /// Finished within this threshold
    Reached,
    /// Missed a slower tier
    Missed,
    /// Missed the fastest (3 star) tier
    MissedFastest,
}

/// Threshold time shown under a star
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdLabel {
    pub stars: u8,
    pub time: f32,
    /// `mm:ss.ff`
    pub text: String,
    pub mark: ThresholdMark,
}

/// Everything the win screen needs after a completion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionReport {
    pub level: String,
    pub elapsed: f32,
    /// Grade earned by this run
    pub grade: Grade,
    /// Best grade after this run
    pub best_grade: Grade,
    /// Star indicators to light
    pub stars_lit: u8,
    pub show_lose_indicator: bool,
    pub completed: bool,
    pub thresholds: [ThresholdLabel; 3],
    /// Automatic scene change, if configured
    pub next_scene: Option<SceneRequest>,
}

/// Win screen buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinScreenAction {
    Restart,
    Menu,
    Next,
}

/// One attempt at a level
#[derive(Debug, Clone)]
pub struct LevelRun {
    index: usize,
    level: LevelInfo,
    start_time: f64,
    best_grade: Grade,
    finished: bool,
}

impl LevelRun {
    /// Start a run of level `index` at host time `now` (seconds)
    pub fn start(
        levels: &LevelDatabase,
        index: usize,
        store: &impl ProgressStore,
        now: f64,
    ) -> Result<Self, ProgressionError> {
        let Some(level) = levels.get(index) else {
            log::warn!("Cannot start level {}: only {} levels configured", index, levels.len());
            return Err(ProgressionError::UnknownLevel(index));
        };

        let best_grade = store.get(&level.name).best_grade;
        log::info!("Starting {} (best grade {})", level.name, best_grade);

        Ok(Self {
            index,
            level: level.clone(),
            start_time: now,
            best_grade,
            finished: false,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn level(&self) -> &LevelInfo {
        &self.level
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Seconds since the run started
    pub fn elapsed(&self, now: f64) -> f32 {
        (now - self.start_time).max(0.0) as f32
    }

    /// Handle the end-of-level trigger. Returns `Ok(None)` if this run was
    /// already completed.
    pub fn complete(
        &mut self,
        store: &mut impl ProgressStore,
        settings: &ProgressionSettings,
        now: f64,
    ) -> Result<Option<CompletionReport>, ProgressionError> {
        if self.finished {
            log::debug!("Ignoring repeat completion of {}", self.level.name);
            return Ok(None);
        }
        self.finished = true;

        let elapsed = self.elapsed(now);
        let grade = self.level.grade(elapsed);
        let record =
            record_completion(store, &self.level.name, grade, settings.zero_grade_completes)?;
        self.best_grade = self.best_grade.max(record.best_grade);

        let next_scene = if settings.load_next_scene && !settings.next_level_name.is_empty() {
            log::info!("Loading next scene {}", settings.next_level_name);
            Some(SceneRequest::Load(settings.next_level_name.clone()))
        } else {
            None
        };

        Ok(Some(CompletionReport {
            level: self.level.name.clone(),
            elapsed,
            grade,
            best_grade: self.best_grade,
            stars_lit: self.best_grade.stars(),
            show_lose_indicator: self.best_grade.is_zero() && settings.show_lose_indicator,
            completed: record.completed,
            thresholds: threshold_labels(&self.level, elapsed),
            next_scene,
        }))
    }

    /// Scene for a win screen button
    pub fn navigate(&self, action: WinScreenAction, settings: &ProgressionSettings) -> SceneRequest {
        match action {
            WinScreenAction::Restart => SceneRequest::Reload,
            WinScreenAction::Menu => SceneRequest::Load(settings.menu_scene.clone()),
            WinScreenAction::Next => SceneRequest::Load(settings.next_level.clone()),
        }
    }
}

fn threshold_labels(level: &LevelInfo, elapsed: f32) -> [ThresholdLabel; 3] {
    let times = level.thresholds();
    std::array::from_fn(|i| {
        let mark = if elapsed <= times[i] {
            ThresholdMark::Reached
        } else if i == 0 {
            ThresholdMark::MissedFastest
        } else {
            ThresholdMark::Missed
        };
        ThresholdLabel {
            stars: 3 - i as u8,
            time: times[i],
            text: format_time(times[i]),
            mark,
        }
    })
}

/// Format seconds as `mm:ss.ff` (minutes include whole hours)
pub fn format_time(seconds: f32) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds as f64 * 1000.0).round() as u64
    } else {
        0
    };
    let minutes = total_ms / 60_000;
    let secs = (total_ms / 1000) % 60;
    let hundredths = (total_ms % 1000) / 10;
    format!("{:02}:{:02}.{:02}", minutes, secs, hundredths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::{MemoryProgressStore, ProgressRecord};

    fn db() -> LevelDatabase {
        LevelDatabase::new(vec![
            LevelInfo::new("Level_1", 60.0, 90.0, 120.0).unwrap(),
            LevelInfo::with_defaults("Level_2"),
        ])
        .unwrap()
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00.00");
        assert_eq!(format_time(59.9), "00:59.90");
        assert_eq!(format_time(90.0), "01:30.00");
        assert_eq!(format_time(3725.5), "62:05.50");
        assert_eq!(format_time(-3.0), "00:00.00");
        assert_eq!(format_time(f32::NAN), "00:00.00");
    }

    #[test]
    fn test_start_unknown_level() {
        let store = MemoryProgressStore::new();
        assert!(matches!(
            LevelRun::start(&db(), 5, &store, 0.0),
            Err(ProgressionError::UnknownLevel(5))
        ));
    }

    #[test]
    fn test_complete_three_stars() {
        let settings = ProgressionSettings::default();
        let mut store = MemoryProgressStore::new();
        let mut run = LevelRun::start(&db(), 0, &store, 10.0).unwrap();

        let report = run.complete(&mut store, &settings, 69.9).unwrap().unwrap();
        assert_eq!(report.grade, Grade::THREE);
        assert_eq!(report.stars_lit, 3);
        assert!(!report.show_lose_indicator);
        assert!(report.completed);
        assert!(report.next_scene.is_none());
        assert!(report.thresholds.iter().all(|t| t.mark == ThresholdMark::Reached));
        assert_eq!(report.thresholds[0].text, "01:00.00");
        assert_eq!(report.thresholds[2].stars, 1);
        assert_eq!(
            store.get("Level_1"),
            ProgressRecord {
                completed: true,
                best_grade: Grade::THREE
            }
        );
    }

    #[test]
    fn test_complete_slower_keeps_best() {
        let settings = ProgressionSettings::default();
        let mut store = MemoryProgressStore::new();
        let mut first = LevelRun::start(&db(), 0, &store, 0.0).unwrap();
        first.complete(&mut store, &settings, 59.9).unwrap();

        let mut second = LevelRun::start(&db(), 0, &store, 0.0).unwrap();
        let report = second.complete(&mut store, &settings, 95.0).unwrap().unwrap();
        assert_eq!(report.grade, Grade::ONE);
        assert_eq!(report.best_grade, Grade::THREE);
        assert_eq!(report.stars_lit, 3);
        assert_eq!(report.thresholds[0].mark, ThresholdMark::MissedFastest);
        assert_eq!(report.thresholds[1].mark, ThresholdMark::Missed);
        assert_eq!(report.thresholds[2].mark, ThresholdMark::Reached);
    }

    #[test]
    fn test_zero_star_finish_shows_lose() {
        let settings = ProgressionSettings::default();
        let mut store = MemoryProgressStore::new();
        let mut run = LevelRun::start(&db(), 0, &store, 0.0).unwrap();
        let report = run.complete(&mut store, &settings, 200.0).unwrap().unwrap();
        assert_eq!(report.grade, Grade::ZERO);
        assert!(report.show_lose_indicator);
        assert!(!report.completed);
        assert_eq!(report.stars_lit, 0);

        let quiet = ProgressionSettings {
            show_lose_indicator: false,
            ..Default::default()
        };
        let mut run = LevelRun::start(&db(), 0, &store, 0.0).unwrap();
        let report = run.complete(&mut store, &quiet, 200.0).unwrap().unwrap();
        assert!(!report.show_lose_indicator);
    }

    #[test]
    fn test_repeat_trigger_ignored() {
        let settings = ProgressionSettings::default();
        let mut store = MemoryProgressStore::new();
        let mut run = LevelRun::start(&db(), 0, &store, 0.0).unwrap();
        assert!(run.complete(&mut store, &settings, 100.0).unwrap().is_some());
        assert!(run.is_finished());
        assert!(run.complete(&mut store, &settings, 1.0).unwrap().is_none());
        assert_eq!(store.get("Level_1").best_grade, Grade::ONE);
    }

    #[test]
    fn test_auto_next_scene() {
        let mut settings = ProgressionSettings {
            load_next_scene: true,
            ..Default::default()
        };
        let mut store = MemoryProgressStore::new();

        let mut run = LevelRun::start(&db(), 0, &store, 0.0).unwrap();
        let report = run.complete(&mut store, &settings, 1.0).unwrap().unwrap();
        assert!(report.next_scene.is_none());

        settings.next_level_name = "Level_2".to_string();
        let mut run = LevelRun::start(&db(), 0, &store, 0.0).unwrap();
        let report = run.complete(&mut store, &settings, 1.0).unwrap().unwrap();
        assert_eq!(report.next_scene, Some(SceneRequest::Load("Level_2".to_string())));
    }

    #[test]
    fn test_navigation() {
        let settings = ProgressionSettings::default();
        let store = MemoryProgressStore::new();
        let run = LevelRun::start(&db(), 1, &store, 0.0).unwrap();
        assert_eq!(run.navigate(WinScreenAction::Restart, &settings), SceneRequest::Reload);
        assert_eq!(
            run.navigate(WinScreenAction::Menu, &settings),
            SceneRequest::Load("MainMenu".to_string())
        );
        assert_eq!(
            run.navigate(WinScreenAction::Next, &settings),
            SceneRequest::Load("Level_1".to_string())
        );
    }
}
