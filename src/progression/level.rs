//! Level definitions and star grading

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ProgressionError;
use crate::consts::*;

/// Star grade earned on completion (0 = finished without a star)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Grade(u8);

impl Grade {
    pub const ZERO: Grade = Grade(0);
    pub const ONE: Grade = Grade(1);
    pub const TWO: Grade = Grade(2);
    pub const THREE: Grade = Grade(3);

    /// Build a grade, clamping to 0..=3
    pub fn new(stars: u8) -> Self {
        Grade(stars.min(MAX_GRADE))
    }

    /// Build from a persisted integer, clamping out-of-range values
    pub fn from_stored(value: i32) -> Self {
        Grade(value.clamp(0, MAX_GRADE as i32) as u8)
    }

    pub fn stars(self) -> u8 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn default_grade3() -> f32 {
    DEFAULT_TIME_GRADE3
}
fn default_grade2() -> f32 {
    DEFAULT_TIME_GRADE2
}
fn default_grade1() -> f32 {
    DEFAULT_TIME_GRADE1
}

/// A level and its star thresholds (seconds, fastest to slowest)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub name: String,
    #[serde(default = "default_grade3")]
    pub time_grade3: f32,
    #[serde(default = "default_grade2")]
    pub time_grade2: f32,
    #[serde(default = "default_grade1")]
    pub time_grade1: f32,
}

impl LevelInfo {
    /// Create a level, thresholds must satisfy `grade3 < grade2 < grade1`
    pub fn new(
        name: impl Into<String>,
        time_grade3: f32,
        time_grade2: f32,
        time_grade1: f32,
    ) -> Result<Self, ProgressionError> {
        let level = Self {
            name: name.into(),
            time_grade3,
            time_grade2,
            time_grade1,
        };
        level.validate()?;
        Ok(level)
    }

    /// Level with the default 60/90/120 second thresholds
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time_grade3: DEFAULT_TIME_GRADE3,
            time_grade2: DEFAULT_TIME_GRADE2,
            time_grade1: DEFAULT_TIME_GRADE1,
        }
    }

    pub fn validate(&self) -> Result<(), ProgressionError> {
        let t = [self.time_grade3, self.time_grade2, self.time_grade1];
        let valid = !self.name.is_empty()
            && t.iter().all(|v| v.is_finite() && *v >= 0.0)
            && t[0] < t[1]
            && t[1] < t[2];
        if valid {
            Ok(())
        } else {
            Err(ProgressionError::InvalidThresholds {
                name: self.name.clone(),
            })
        }
    }

    /// Thresholds ordered by star count descending: [3★, 2★, 1★]
    pub fn thresholds(&self) -> [f32; 3] {
        [self.time_grade3, self.time_grade2, self.time_grade1]
    }

    /// Grade a completion time. Ties at a boundary award the higher grade.
    pub fn grade(&self, elapsed: f32) -> Grade {
        grade(elapsed, self)
    }
}

/// Grade a completion time against a level's thresholds
pub fn grade(elapsed: f32, level: &LevelInfo) -> Grade {
    if elapsed <= level.time_grade3 {
        Grade::THREE
    } else if elapsed <= level.time_grade2 {
        Grade::TWO
    } else if elapsed <= level.time_grade1 {
        Grade::ONE
    } else {
        // Also reached for NaN
        Grade::ZERO
    }
}

/// Ordered level list; index order is unlock order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelDatabase {
    pub levels: Vec<LevelInfo>,
}

impl LevelDatabase {
    pub fn new(levels: Vec<LevelInfo>) -> Result<Self, ProgressionError> {
        let db = Self { levels };
        db.validate()?;
        Ok(db)
    }

    /// Parse and validate a JSON level database
    pub fn from_json(json: &str) -> Result<Self, ProgressionError> {
        let db: LevelDatabase = serde_json::from_str(json)?;
        db.validate()?;
        log::info!("Loaded level database ({} levels)", db.levels.len());
        Ok(db)
    }

    pub fn validate(&self) -> Result<(), ProgressionError> {
        for (i, level) in self.levels.iter().enumerate() {
            level.validate()?;
            if self.levels[..i].iter().any(|l| l.name == level.name) {
                return Err(ProgressionError::DuplicateLevel(level.name.clone()));
            }
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&LevelInfo> {
        self.levels.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.levels.iter().position(|l| l.name == name)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|l| l.name.as_str())
    }
}
