//! Attitude to angular offset conversion

use glam::{EulerRot, Quat, Vec2};

use crate::consts::POINTER_DEGREE_SCALE;
use crate::normalize_degrees;
use crate::settings::ScreenOrientation;

/// Reference (calibrated) attitude and the latest reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationState {
    pub reference: Quat,
    pub current: Quat,
}

impl Default for OrientationState {
    fn default() -> Self {
        Self {
            reference: Quat::IDENTITY,
            current: Quat::IDENTITY,
        }
    }
}

impl OrientationState {
    /// Take the current reading as the new zero
    pub fn calibrate(&mut self) {
        self.reference = self.current;
    }

    /// inverse(reference) * current
    pub fn relative(&self) -> Quat {
        self.reference.inverse() * self.current
    }

    /// Signed degrees: x from yaw (about Y), y from pitch (about X)
    pub fn relative_angles(&self) -> Vec2 {
        euler_offset(self.relative())
    }
}

/// Yaw/pitch of a rotation in degrees, each wrapped to [-180, 180]
pub fn euler_offset(rotation: Quat) -> Vec2 {
    let (yaw, pitch, _roll) = rotation.to_euler(EulerRot::YXZ);
    Vec2::new(
        normalize_degrees(yaw.to_degrees()),
        normalize_degrees(pitch.to_degrees()),
    )
}

/// Remap a raw sensor attitude into the frame of the locked screen orientation
pub fn adjust_for_screen(raw: Quat, orientation: ScreenOrientation) -> Quat {
    match orientation {
        ScreenOrientation::Portrait => raw,
        ScreenOrientation::LandscapeLeft => Quat::from_xyzw(-raw.y, raw.x, -raw.z, raw.w),
        ScreenOrientation::LandscapeRight => Quat::from_xyzw(raw.y, -raw.x, -raw.z, raw.w),
    }
}

/// Screen-adjusted, normalized attitude, `None` for unusable readings
pub fn prepare_attitude(raw: Quat, orientation: ScreenOrientation) -> Option<Quat> {
    if !raw.is_finite() || raw.length_squared() < 1e-6 {
        return None;
    }
    Some(adjust_for_screen(raw, orientation).normalize())
}

/// Degree-equivalent input from a normalized pointer position
pub fn pointer_offset(position: Vec2, sensitivity: f32) -> Vec2 {
    (position - Vec2::splat(0.5)) * sensitivity * POINTER_DEGREE_SCALE
}
