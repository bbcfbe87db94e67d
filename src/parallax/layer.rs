//! Parallax layers and their smoothing

use glam::{Vec2, Vec3};

/// Per-axis clamp range for a layer's displacement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl AxisBounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// `-max_offset ..= max_offset` on each axis
    pub fn symmetric(max_offset: Vec2) -> Self {
        let max_offset = max_offset.abs();
        Self {
            min: -max_offset,
            max: max_offset,
        }
    }

    pub fn clamp(&self, v: Vec2) -> Vec2 {
        v.max(self.min).min(self.max)
    }

    pub fn contains(&self, v: Vec2) -> bool {
        v.cmpge(self.min).all() && v.cmple(self.max).all()
    }
}

/// A visual layer displaced by the shared offset times its multiplier
#[derive(Debug, Clone)]
pub struct ParallaxLayer {
    origin: Vec3,
    /// Per-axis multiplier applied to the shared offset
    pub multiplier: Vec2,
    pub bounds: AxisBounds,
    /// Share of the displacement applied (0 = pinned at origin, 1 = full)
    pub influence: f32,
    position: Vec3,
    velocity: Vec2,
}

impl ParallaxLayer {
    pub fn new(origin: Vec3, multiplier: f32, bounds: AxisBounds) -> Self {
        Self::with_axis_multiplier(origin, Vec2::splat(multiplier), bounds)
    }

    /// Layer with separate horizontal and vertical multipliers
    pub fn with_axis_multiplier(origin: Vec3, multiplier: Vec2, bounds: AxisBounds) -> Self {
        Self {
            origin,
            multiplier,
            bounds,
            influence: 1.0,
            position: origin,
            velocity: Vec2::ZERO,
        }
    }

    /// Set the blend toward the target, clamped to 0..=1
    pub fn with_influence(mut self, influence: f32) -> Self {
        self.influence = if influence.is_finite() {
            influence.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self
    }

    /// Position captured when the layer was created
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Position the host should render this frame
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Clamped displacement for a shared offset. Influence scales before
    /// the clamp so the result stays inside `bounds`.
    pub fn displacement(&self, offset: Vec2) -> Vec2 {
        self.bounds.clamp(offset * self.multiplier * self.influence)
    }

    /// Where the layer settles for a shared offset
    pub fn target(&self, offset: Vec2) -> Vec3 {
        self.origin + self.displacement(offset).extend(0.0)
    }

    /// Move toward the target for `offset` over `dt` seconds
    pub fn update(&mut self, offset: Vec2, smooth_time: f32, dt: f32) {
        let target = self.target(offset);
        let (x, vx) = smooth_damp(self.position.x, target.x, self.velocity.x, smooth_time, dt);
        let (y, vy) = smooth_damp(self.position.y, target.y, self.velocity.y, smooth_time, dt);
        self.position = Vec3::new(x, y, self.origin.z);
        self.velocity = Vec2::new(vx, vy);
    }

    /// Snap back to the origin
    pub fn reset(&mut self) {
        self.position = self.origin;
        self.velocity = Vec2::ZERO;
    }
}

/// Critically damped spring toward `target`. Returns (value, velocity).
/// A zero `smooth_time` snaps to the target.
pub fn smooth_damp(current: f32, target: f32, velocity: f32, smooth_time: f32, dt: f32) -> (f32, f32) {
    if !(dt > 0.0) {
        return (current, velocity);
    }
    if smooth_time <= 0.0 {
        return (target, 0.0);
    }

    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;
    let temp = (velocity + omega * change) * dt;
    let mut new_velocity = (velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // No overshoot past the target
    if (target - current > 0.0) == (output > target) {
        output = target;
        new_velocity = 0.0;
    }

    (output, new_velocity)
}
