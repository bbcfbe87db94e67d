//! Tilt Run - level progression and gyro parallax for a mobile platformer
//!
//! Core modules:
//! - `progression`: Star grading, best-grade tracking, unlock gating, level select
//! - `parallax`: Device orientation (or pointer) to layered camera offset
//! - `persistence`: Flat key-value prefs with batched saves
//! - `settings`: Data-driven tuning for both subsystems

pub mod parallax;
pub mod persistence;
pub mod progression;
pub mod settings;

pub use parallax::{InputSample, OrientationSource, ParallaxController, ParallaxLayer};
pub use persistence::{MemoryPrefs, Prefs, PrefsError};
pub use progression::{
    Grade, LevelDatabase, LevelInfo, LevelRun, LevelSelect, MemoryProgressStore,
    PrefsProgressStore, ProgressRecord, ProgressStore, ProgressionError, SceneRequest,
};
pub use settings::{ParallaxSettings, ProgressionSettings, ScreenOrientation, Settings};

/// Game configuration constants
pub mod consts {
    /// Default star thresholds in seconds (3 stars, 2 stars, 1 star)
    pub const DEFAULT_TIME_GRADE3: f32 = 60.0;
    pub const DEFAULT_TIME_GRADE2: f32 = 90.0;
    pub const DEFAULT_TIME_GRADE1: f32 = 120.0;

    /// Highest star grade a level can award
    pub const MAX_GRADE: u8 = 3;

    /// Prefs key suffixes
    pub const COMPLETED_SUFFIX: &str = "_completed";
    pub const GRADE_SUFFIX: &str = "_grade";

    /// Sensor settle time before the reference attitude is captured
    pub const CALIBRATION_DELAY: f32 = 0.5;

    /// Pointer input is scaled to a degree-like range before sensitivity
    pub const POINTER_DEGREE_SCALE: f32 = 100.0;
}

/// Wrap an angle in degrees into [-180, 180]
#[inline]
pub fn normalize_degrees(mut angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    // Large inputs would never converge by repeated subtraction in f32
    if angle.abs() > 720.0 {
        angle %= 360.0;
    }
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle < -180.0 {
        angle += 360.0;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(-180.0), -180.0);
        assert_eq!(normalize_degrees(270.0), -90.0);
        assert_eq!(normalize_degrees(-270.0), 90.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert_eq!(normalize_degrees(f32::NAN), 0.0);
    }
}
