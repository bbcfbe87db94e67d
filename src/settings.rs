//! Game settings and tuning
//!
//! Persisted separately from progress (LocalStorage on web, JSON file on native).

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::CALIBRATION_DELAY;
use crate::parallax::AxisBounds;
use crate::persistence::PrefsError;

/// Screen orientation the game is locked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScreenOrientation {
    #[default]
    Portrait,
    LandscapeLeft,
    LandscapeRight,
}

impl ScreenOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenOrientation::Portrait => "Portrait",
            ScreenOrientation::LandscapeLeft => "LandscapeLeft",
            ScreenOrientation::LandscapeRight => "LandscapeRight",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "portrait" => Some(ScreenOrientation::Portrait),
            "landscapeleft" | "landscape_left" | "left" => Some(ScreenOrientation::LandscapeLeft),
            "landscaperight" | "landscape_right" | "right" => {
                Some(ScreenOrientation::LandscapeRight)
            }
            _ => None,
        }
    }
}

/// End-of-level and navigation behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionSettings {
    /// Count a zero-star finish as completed (unlocks the next level)
    pub zero_grade_completes: bool,
    /// Show the "lose" indicator when a finish earns no stars
    pub show_lose_indicator: bool,

    // === Navigation ===
    /// Request `next_level_name` automatically after completion
    pub load_next_scene: bool,
    /// Scene loaded automatically when `load_next_scene` is set
    pub next_level_name: String,
    /// Scene behind the win screen's "next" button
    pub next_level: String,
    /// Scene behind the win screen's "menu" button
    pub menu_scene: String,
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            zero_grade_completes: false,
            show_lose_indicator: true,

            load_next_scene: false,
            next_level_name: String::new(),
            next_level: "Level_1".to_string(),
            menu_scene: "MainMenu".to_string(),
        }
    }
}

/// Gyro parallax tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxSettings {
    /// Offset per degree of tilt (0 - 1)
    pub sensitivity: f32,
    /// Smoothing time constant in seconds (0 snaps)
    pub smooth_time: f32,
    /// Symmetric per-axis clamp applied to each layer
    pub max_offset: Vec2,
    /// Explicit (min, max) horizontal clamp, overrides `max_offset.x`
    pub x_clamp: Option<Vec2>,
    /// Explicit (min, max) vertical clamp, overrides `max_offset.y`
    pub y_clamp: Option<Vec2>,
    /// Per-layer multipliers, back to front
    pub layer_multipliers: Vec<f32>,
    /// Horizontal/vertical scale shared by every layer
    pub axis_multiplier: Vec2,
    /// Blend between origin (0) and full displacement (1)
    pub influence: f32,
    pub invert_x: bool,
    pub invert_y: bool,

    // === Calibration ===
    /// Capture the reference attitude automatically after start
    pub auto_calibrate: bool,
    /// Sensor settle time before the reference is captured (seconds)
    pub calibration_delay: f32,
    pub screen_orientation: ScreenOrientation,

    // === Desktop fallback ===
    /// Drive layers from the pointer when no sensor is present
    pub pointer_fallback: bool,
    pub pointer_sensitivity: f32,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.15,
            smooth_time: 0.1,
            max_offset: Vec2::new(1.5, 1.0),
            x_clamp: None,
            y_clamp: None,
            layer_multipliers: vec![0.3, 0.7, 1.2],
            axis_multiplier: Vec2::ONE,
            influence: 1.0,
            invert_x: false,
            invert_y: true,

            auto_calibrate: true,
            calibration_delay: CALIBRATION_DELAY,
            screen_orientation: ScreenOrientation::Portrait,

            pointer_fallback: true,
            pointer_sensitivity: 1.0,
        }
    }
}

impl ParallaxSettings {
    /// Clamp range for layer displacement
    pub fn layer_bounds(&self) -> AxisBounds {
        let symmetric = AxisBounds::symmetric(self.max_offset);
        let x = self.x_clamp.unwrap_or(Vec2::new(symmetric.min.x, symmetric.max.x));
        let y = self.y_clamp.unwrap_or(Vec2::new(symmetric.min.y, symmetric.max.y));
        AxisBounds::new(Vec2::new(x.x, y.x), Vec2::new(x.y, y.y))
    }

    /// Clamp out-of-range values, returns true if anything changed
    pub fn validate(&mut self) -> bool {
        let mut fixed = false;

        if !(self.sensitivity > 0.0 && self.sensitivity <= 1.0) {
            log::warn!("Parallax sensitivity {} out of range, using 0.15", self.sensitivity);
            self.sensitivity = 0.15;
            fixed = true;
        }
        if !(self.smooth_time >= 0.0) {
            log::warn!("Negative smooth_time {}, disabling smoothing", self.smooth_time);
            self.smooth_time = 0.0;
            fixed = true;
        }
        if !(self.calibration_delay >= 0.0) {
            log::warn!("Negative calibration_delay {}, calibrating immediately", self.calibration_delay);
            self.calibration_delay = 0.0;
            fixed = true;
        }
        if !(self.max_offset.x >= 0.0 && self.max_offset.y >= 0.0) {
            log::warn!("Negative max_offset {:?}, using absolute value", self.max_offset);
            self.max_offset = self.max_offset.abs();
            fixed = true;
        }

        if !(0.0..=1.0).contains(&self.influence) {
            log::warn!("Parallax influence {} out of range, clamping", self.influence);
            self.influence = if self.influence.is_nan() {
                1.0
            } else {
                self.influence.clamp(0.0, 1.0)
            };
            fixed = true;
        }
        if !self.axis_multiplier.is_finite() {
            log::warn!("Non-finite axis_multiplier {:?}, using 1", self.axis_multiplier);
            self.axis_multiplier = Vec2::ONE;
            fixed = true;
        }

        fixed
    }
}

/// All tunable settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub progression: ProgressionSettings,
    pub parallax: ParallaxSettings,
}

impl Settings {
    /// Clamp out-of-range values, returns true if anything changed
    pub fn validate(&mut self) -> bool {
        self.parallax.validate()
    }

    pub fn from_json(json: &str) -> Result<Self, PrefsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.validate();
        Ok(settings)
    }

    /// Load settings from a JSON file, defaults if missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Bad settings file {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PrefsError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tilt_run_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native builds read settings from a file via `load_from`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.progression.zero_grade_completes);
        assert!(settings.progression.show_lose_indicator);
        assert_eq!(settings.progression.menu_scene, "MainMenu");
        assert_eq!(settings.progression.next_level, "Level_1");
        assert_eq!(settings.parallax.layer_multipliers, vec![0.3, 0.7, 1.2]);
        assert!(settings.parallax.invert_y);
        assert!((settings.parallax.calibration_delay - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_orientation_from_str() {
        assert_eq!(ScreenOrientation::from_str("Portrait"), Some(ScreenOrientation::Portrait));
        assert_eq!(
            ScreenOrientation::from_str("landscape_left"),
            Some(ScreenOrientation::LandscapeLeft)
        );
        assert_eq!(ScreenOrientation::from_str("RIGHT"), Some(ScreenOrientation::LandscapeRight));
        assert_eq!(ScreenOrientation::from_str("sideways"), None);
        assert_eq!(ScreenOrientation::LandscapeLeft.as_str(), "LandscapeLeft");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings =
            Settings::from_json(r#"{ "parallax": { "sensitivity": 0.5 } }"#).unwrap();
        assert!((settings.parallax.sensitivity - 0.5).abs() < f32::EPSILON);
        assert!((settings.parallax.smooth_time - 0.1).abs() < f32::EPSILON);
        assert_eq!(settings.progression.menu_scene, "MainMenu");
    }

    #[test]
    fn test_validate_fixes_out_of_range() {
        let mut settings = Settings::default();
        settings.parallax.sensitivity = 4.0;
        settings.parallax.smooth_time = -1.0;
        settings.parallax.max_offset = Vec2::new(-1.0, 2.0);
        assert!(settings.validate());
        assert!((settings.parallax.sensitivity - 0.15).abs() < f32::EPSILON);
        assert_eq!(settings.parallax.smooth_time, 0.0);
        assert_eq!(settings.parallax.max_offset, Vec2::new(1.0, 2.0));
        assert!(!settings.validate());
    }

    #[test]
    fn test_layer_bounds() {
        let mut parallax = ParallaxSettings::default();
        let bounds = parallax.layer_bounds();
        assert_eq!(bounds.min, Vec2::new(-1.5, -1.0));
        assert_eq!(bounds.max, Vec2::new(1.5, 1.0));

        parallax.x_clamp = Some(Vec2::new(-0.5, 0.75));
        let bounds = parallax.layer_bounds();
        assert_eq!(bounds.min, Vec2::new(-0.5, -1.0));
        assert_eq!(bounds.max, Vec2::new(0.75, 1.0));

        parallax.y_clamp = Some(Vec2::new(0.3, -0.3));
        let bounds = parallax.layer_bounds();
        assert_eq!(bounds.min.y, -0.3);
        assert_eq!(bounds.max.y, 0.3);
    }

    #[test]
    fn test_clamps_and_influence_from_json() {
        let settings = Settings::from_json(
            r#"{ "parallax": { "x_clamp": [-0.5, 0.5], "axis_multiplier": [0.05, 0.03], "influence": 0.7 } }"#,
        )
        .unwrap();
        assert_eq!(settings.parallax.x_clamp, Some(Vec2::new(-0.5, 0.5)));
        assert_eq!(settings.parallax.y_clamp, None);
        assert_eq!(settings.parallax.axis_multiplier, Vec2::new(0.05, 0.03));
        assert!((settings.parallax.influence - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_validate_clamps_influence() {
        let mut parallax = ParallaxSettings {
            influence: 1.5,
            ..Default::default()
        };
        assert!(parallax.validate());
        assert_eq!(parallax.influence, 1.0);

        parallax.influence = -0.2;
        assert!(parallax.validate());
        assert_eq!(parallax.influence, 0.0);
    }

    #[test]
    fn test_file_roundtrip_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert!(!Settings::load_from(&path).progression.load_next_scene);

        let mut settings = Settings::default();
        settings.progression.load_next_scene = true;
        settings.progression.next_level_name = "Level_2".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert!(loaded.progression.load_next_scene);
        assert_eq!(loaded.progression.next_level_name, "Level_2");
    }
}
