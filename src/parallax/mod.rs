//! Gyro parallax
//!
//! Turns device attitude (or the pointer, when there is no sensor) into a
//! bounded offset applied to several layers at different multipliers.
//! Driven by the host once per frame through `ParallaxController::tick`.

pub mod layer;
pub mod orientation;
pub mod source;

pub use layer::{AxisBounds, ParallaxLayer, smooth_damp};
pub use orientation::{OrientationState, adjust_for_screen, euler_offset, pointer_offset};
pub use source::{HostInput, InputSample, OrientationSource, ScriptedSource};

use glam::{Quat, Vec2, Vec3};

use crate::settings::ParallaxSettings;
use orientation::prepare_attitude;

/// Where the input for an active controller comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Sensor,
    /// No sensor; pointer fallback (if enabled in settings)
    Pointer,
}

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParallaxState {
    Uninitialized,
    /// Waiting for the sensor to settle before capturing the reference
    Calibrating { elapsed: f32 },
    Active { mode: InputMode },
}

/// Drives a set of parallax layers from an orientation source
#[derive(Debug, Clone)]
pub struct ParallaxController {
    settings: ParallaxSettings,
    layers: Vec<ParallaxLayer>,
    state: ParallaxState,
    orientation: OrientationState,
    offset: Vec2,
}

impl ParallaxController {
    pub fn new(mut settings: ParallaxSettings, layers: Vec<ParallaxLayer>) -> Self {
        settings.validate();
        Self {
            settings,
            layers,
            state: ParallaxState::Uninitialized,
            orientation: OrientationState::default(),
            offset: Vec2::ZERO,
        }
    }

    /// Build one layer per origin, paired with `settings.layer_multipliers`
    /// (scaled by `axis_multiplier`) and clamped to `settings.layer_bounds()`.
    /// Extra origins or multipliers are ignored.
    pub fn from_origins(settings: ParallaxSettings, origins: &[Vec3]) -> Self {
        if origins.len() != settings.layer_multipliers.len() {
            log::warn!(
                "{} parallax layers but {} multipliers, using {}",
                origins.len(),
                settings.layer_multipliers.len(),
                origins.len().min(settings.layer_multipliers.len())
            );
        }
        let bounds = settings.layer_bounds();
        let layers = origins
            .iter()
            .zip(&settings.layer_multipliers)
            .map(|(origin, multiplier)| {
                ParallaxLayer::with_axis_multiplier(
                    *origin,
                    settings.axis_multiplier * *multiplier,
                    bounds,
                )
                .with_influence(settings.influence)
            })
            .collect();
        Self::new(settings, layers)
    }

    pub fn settings(&self) -> &ParallaxSettings {
        &self.settings
    }

    pub fn state(&self) -> ParallaxState {
        self.state
    }

    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }

    /// Current positions, one per layer
    pub fn positions(&self) -> Vec<Vec3> {
        self.layers.iter().map(ParallaxLayer::position).collect()
    }

    /// Shared offset from the last active frame (before layer multipliers)
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn reference(&self) -> Quat {
        self.orientation.reference
    }

    /// Leave `Uninitialized`: calibrate if a sensor is present, otherwise
    /// fall back to pointer input.
    pub fn start(&mut self, source: &impl OrientationSource) {
        self.orientation = OrientationState::default();
        self.offset = Vec2::ZERO;

        if source.has_sensor() {
            if self.settings.auto_calibrate {
                self.state = ParallaxState::Calibrating { elapsed: 0.0 };
            } else {
                self.state = ParallaxState::Active {
                    mode: InputMode::Sensor,
                };
            }
        } else {
            log::warn!("Orientation sensor not available, using pointer input");
            self.state = ParallaxState::Active {
                mode: InputMode::Pointer,
            };
        }
    }

    /// Advance one frame of `dt` seconds
    pub fn tick(&mut self, dt: f32, source: &mut impl OrientationSource) {
        match self.state {
            ParallaxState::Uninitialized => self.start(source),
            ParallaxState::Calibrating { elapsed } => {
                let elapsed = elapsed + dt.max(0.0);
                if elapsed < self.settings.calibration_delay {
                    self.state = ParallaxState::Calibrating { elapsed };
                } else if self.capture_reference(source) {
                    log::info!("Gyro calibrated");
                    self.state = ParallaxState::Active {
                        mode: InputMode::Sensor,
                    };
                } else {
                    // Retry on the next frame
                    self.state = ParallaxState::Calibrating { elapsed };
                }
            }
            ParallaxState::Active { mode } => {
                let Some(angles) = self.read_angles(mode, source.sample()) else {
                    return;
                };
                self.offset = self.scale(angles);
                for layer in &mut self.layers {
                    layer.update(self.offset, self.settings.smooth_time, dt);
                }
            }
        }
    }

    /// Re-capture the reference attitude. Returns false when there is no
    /// sensor or no usable reading.
    pub fn recalibrate(&mut self, source: &mut impl OrientationSource) -> bool {
        if !source.has_sensor() {
            log::debug!("Recalibrate ignored: no orientation sensor");
            return false;
        }
        if !self.capture_reference(source) {
            log::debug!("Recalibrate ignored: no attitude reading");
            return false;
        }
        self.state = ParallaxState::Active {
            mode: InputMode::Sensor,
        };
        log::info!("Gyro recalibrated");
        true
    }

    /// Teardown: layers return to their origins
    pub fn disable(&mut self) {
        for layer in &mut self.layers {
            layer.reset();
        }
        self.offset = Vec2::ZERO;
        self.state = ParallaxState::Uninitialized;
    }

    fn capture_reference(&mut self, source: &mut impl OrientationSource) -> bool {
        let InputSample::Attitude(raw) = source.sample() else {
            return false;
        };
        match prepare_attitude(raw, self.settings.screen_orientation) {
            Some(attitude) => {
                self.orientation.current = attitude;
                self.orientation.calibrate();
                true
            }
            None => {
                log::warn!("Unusable attitude reading {:?}", raw);
                false
            }
        }
    }

    /// Degrees (or pointer equivalent) for this frame's sample
    fn read_angles(&mut self, mode: InputMode, sample: InputSample) -> Option<Vec2> {
        match sample {
            InputSample::Attitude(raw) if mode == InputMode::Sensor => {
                let Some(attitude) = prepare_attitude(raw, self.settings.screen_orientation)
                else {
                    log::warn!("Unusable attitude reading {:?}", raw);
                    return None;
                };
                self.orientation.current = attitude;
                Some(self.orientation.relative_angles())
            }
            InputSample::Pointer(position)
                if mode == InputMode::Pointer && self.settings.pointer_fallback =>
            {
                Some(pointer_offset(position, self.settings.pointer_sensitivity))
            }
            _ => None,
        }
    }

    fn scale(&self, angles: Vec2) -> Vec2 {
        let mut offset = angles * self.settings.sensitivity;
        if self.settings.invert_x {
            offset.x = -offset.x;
        }
        if self.settings.invert_y {
            offset.y = -offset.y;
        }
        offset
    }
}
