//! Environment seams: everything the controller needs from the page.
//!
//! The controller never touches a real document. It reads geometry and
//! preferences through [`Host`] and publishes CSS custom properties
//! through the same trait, so the whole engine runs against a fake
//! host in unit tests. The frame loop is likewise hidden behind
//! [`FrameScheduler`], letting tests drive discrete ticks.

use glam::Vec2;

/// Opaque handle to a tracked card element.
///
/// Indices are only meaningful until the next discovery pass; the
/// controller drops stale ids whenever it rebuilds the tracked set.
pub type CardId = usize;

/// Bounding box of a tracked card, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardRect {
    /// Distance from the viewport's left edge.
    pub left: f32,
    /// Distance from the viewport's top edge.
    pub top: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
}

/// The page environment as seen by the motion controller.
///
/// One writer rule: the controller is the only code that calls the
/// property setters; the rendering system reads them back out-of-band.
pub trait Host {
    /// Current viewport size in pixels.
    fn viewport(&self) -> Vec2;

    /// Current vertical scroll offset in pixels.
    fn scroll_y(&self) -> f32;

    /// Whether the user prefers reduced motion. Read once at setup.
    fn prefers_reduced_motion(&self) -> bool;

    /// Whether the user prefers reduced transparency. Read once at
    /// setup.
    fn prefers_reduced_transparency(&self) -> bool;

    /// Find every element matching `selector` and return fresh card
    /// ids for them. Replaces any ids handed out earlier.
    fn discover_cards(&mut self, selector: &str) -> Vec<CardId>;

    /// Bounding box of a card, or `None` if its geometry cannot be
    /// read right now (mid-churn DOM, detached node). A `None` skips
    /// that card for one frame; it is not an error.
    fn card_rect(&self, card: CardId) -> Option<CardRect>;

    /// Write a custom property on the document root.
    fn set_root_property(&mut self, name: &str, value: &str);

    /// Write a custom property scoped to a single card.
    fn set_card_property(&mut self, card: CardId, name: &str, value: &str);
}

/// A continuously repeating frame callback with explicit cancellation.
///
/// `start` schedules `tick` once per display refresh until `cancel` is
/// called; the loop never terminates on its own. Implementations must
/// tolerate `cancel` on an idle scheduler.
pub trait FrameScheduler {
    /// Begin invoking `tick` once per frame.
    fn start(&mut self, tick: Box<dyn FnMut()>);

    /// Stop the loop. Best-effort; never panics.
    fn cancel(&mut self);
}

#[cfg(test)]
pub(crate) mod testing {
    //! Hand-cranked scheduler for deterministic controller tests.

    use super::FrameScheduler;

    /// Scheduler that only ticks when told to.
    #[derive(Default)]
    pub(crate) struct ManualScheduler {
        tick: Option<Box<dyn FnMut()>>,
        started: u32,
    }

    impl ManualScheduler {
        /// Drive `frames` ticks, stopping early if cancelled.
        pub(crate) fn run(&mut self, frames: u32) {
            for _ in 0..frames {
                match self.tick.as_mut() {
                    Some(tick) => tick(),
                    None => break,
                }
            }
        }

        pub(crate) fn is_running(&self) -> bool {
            self.tick.is_some()
        }

        pub(crate) fn times_started(&self) -> u32 {
            self.started
        }
    }

    impl FrameScheduler for ManualScheduler {
        fn start(&mut self, tick: Box<dyn FnMut()>) {
            self.tick = Some(tick);
            self.started += 1;
        }

        fn cancel(&mut self) {
            self.tick = None;
        }
    }
}
