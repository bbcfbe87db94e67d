//! Orientation and pointer input sources

use glam::{Quat, Vec2};

/// One frame of input
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputSample {
    /// Raw device attitude from the orientation sensor
    Attitude(Quat),
    /// Pointer position normalized to 0..1 per axis (origin bottom-left)
    Pointer(Vec2),
    /// Nothing to read this frame
    #[default]
    None,
}

/// Anything that can be polled once per frame for orientation input
pub trait OrientationSource {
    /// Whether a real orientation sensor is present
    fn has_sensor(&self) -> bool;

    /// Read the current sample
    fn sample(&mut self) -> InputSample;
}

/// Latest values pushed by the host each frame
#[derive(Debug, Clone, Default)]
pub struct HostInput {
    sensor: bool,
    attitude: Option<Quat>,
    pointer: Option<Vec2>,
}

impl HostInput {
    pub fn new(has_sensor: bool) -> Self {
        Self {
            sensor: has_sensor,
            ..Default::default()
        }
    }

    pub fn set_attitude(&mut self, attitude: Quat) {
        self.attitude = Some(attitude);
    }

    /// Record a pointer position in screen pixels
    pub fn set_pointer(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.pointer = Some(Vec2::new(x / width, y / height));
    }

    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }
}

impl OrientationSource for HostInput {
    fn has_sensor(&self) -> bool {
        self.sensor
    }

    fn sample(&mut self) -> InputSample {
        match (self.sensor, self.attitude, self.pointer) {
            (true, Some(q), _) => InputSample::Attitude(q),
            (_, _, Some(p)) => InputSample::Pointer(p),
            _ => InputSample::None,
        }
    }
}

/// Replays a fixed sequence; the last sample repeats once exhausted
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    sensor: bool,
    samples: Vec<InputSample>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(has_sensor: bool, samples: Vec<InputSample>) -> Self {
        Self {
            sensor: has_sensor,
            samples,
            cursor: 0,
        }
    }

    /// Sensor source that always reports `attitude`
    pub fn steady(attitude: Quat) -> Self {
        Self::new(true, vec![InputSample::Attitude(attitude)])
    }

    pub fn push(&mut self, sample: InputSample) {
        self.samples.push(sample);
    }
}

impl OrientationSource for ScriptedSource {
    fn has_sensor(&self) -> bool {
        self.sensor
    }

    fn sample(&mut self) -> InputSample {
        let Some(last) = self.samples.len().checked_sub(1) else {
            return InputSample::None;
        };
        let sample = self.samples[self.cursor.min(last)];
        if self.cursor < last {
            self.cursor += 1;
        }
        sample
    }
}
