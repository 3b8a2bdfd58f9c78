//! Light state and session lifecycle.

use glam::Vec2;

use crate::easing::approach_vec2;

/// Page-wide light position and scroll progress.
///
/// `current` is set directly only at initialization; after that it is
/// driven toward `target` by the easing step (pointer-leave resets
/// `target`, and `current` glides home). Scroll is sampled directly
/// with no easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalLightState {
    /// Where the light is headed (normalized viewport coordinates).
    pub target: Vec2,
    /// Where the light is right now; what actually gets published.
    pub current: Vec2,
    /// Normalized, clamped scroll progress in [0, 1].
    pub scroll: f32,
}

impl GlobalLightState {
    /// Start at rest: `current` pinned to `target`.
    #[must_use]
    pub fn at_rest(target: Vec2) -> Self {
        Self {
            target,
            current: target,
            scroll: 0.0,
        }
    }

    /// One easing step toward the target.
    pub fn ease(&mut self, factor: f32) {
        self.current = approach_vec2(self.current, self.target, factor);
    }
}

/// Raw-pixel pointer light used for per-card local lighting (the
/// richer variant of the effect).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerLightState {
    /// Latest pointer position in viewport pixels.
    pub target: Vec2,
    /// Eased pointer position actually used for card lighting.
    pub current: Vec2,
}

impl PointerLightState {
    /// Start at rest at the given pixel position.
    #[must_use]
    pub fn at_rest(position: Vec2) -> Self {
        Self {
            target: position,
            current: position,
        }
    }

    /// One easing step toward the target.
    pub fn ease(&mut self, factor: f32) {
        self.current = approach_vec2(self.current, self.target, factor);
    }
}

/// Session lifecycle: `Uninitialized → Running → TornDown`, terminal
/// and non-reentrant within a page session.
///
/// Replaces an ambient boolean on the global object with an explicit
/// state that can be owned, passed, and asserted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Setup has not run yet.
    #[default]
    Uninitialized,
    /// The frame loop is live.
    Running,
    /// Torn down; the session is over and cannot restart.
    TornDown,
}

impl Lifecycle {
    /// Attempt the `Uninitialized → Running` transition. Returns
    /// `false` (and changes nothing) from any other state, which is
    /// what makes setup idempotent.
    pub fn begin(&mut self) -> bool {
        if *self == Self::Uninitialized {
            *self = Self::Running;
            true
        } else {
            false
        }
    }

    /// Transition to `TornDown` from any state. Idempotent.
    pub fn end(&mut self) {
        *self = Self::TornDown;
    }

    /// Whether the frame loop should be live.
    #[must_use]
    pub fn is_running(self) -> bool {
        self == Self::Running
    }
}
