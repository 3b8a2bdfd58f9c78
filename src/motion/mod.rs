//! The motion controller: state, events, pure per-frame computation,
//! and the controller that ties them together.

/// Platform-agnostic input events.
pub mod event;
/// Light state and session lifecycle.
pub mod state;

pub(crate) mod compute;

mod controller;

pub use compute::{compute_frame, CardLight, FrameVars};
pub use controller::MotionController;
pub use event::InputEvent;
pub use state::{GlobalLightState, Lifecycle, PointerLightState};
