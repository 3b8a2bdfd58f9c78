//! First-order exponential smoothing for light motion.
//!
//! Each frame covers a fixed fraction of the remaining distance to the
//! target, so the light glides toward the pointer rather than snapping.
//! With the default factor of 0.08 a unit-range step shrinks to under
//! 1% within 60 frames (roughly one second at 60 Hz) and to under
//! 0.1% within 90.

use glam::Vec2;

/// One smoothing step: move `current` toward `target` by `factor` of
/// the remaining distance.
///
/// A factor of 0 leaves `current` unchanged; a factor of 1 snaps it to
/// `target`.
#[inline]
#[must_use]
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// [`approach`] applied independently to both components of a vector.
#[inline]
#[must_use]
pub fn approach_vec2(current: Vec2, target: Vec2, factor: f32) -> Vec2 {
    current + (target - current) * factor
}
