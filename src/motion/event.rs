/// Platform-agnostic input events.
///
/// These are fed into a [`MotionController`](super::MotionController);
/// the browser adapter converts raw DOM events into these, and tests
/// construct them directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to an absolute viewport position.
    PointerMoved {
        /// Horizontal position in viewport pixels.
        x: f32,
        /// Vertical position in viewport pixels.
        y: f32,
    },
    /// Pointer left the tracking surface; the light returns home.
    PointerLeft,
    /// Page scrolled to a new vertical offset.
    Scrolled {
        /// Scroll offset from the top of the page, in pixels.
        y: f32,
    },
    /// Viewport was resized; card geometry must be re-read.
    Resized,
    /// Something under the document body changed; the tracked card
    /// set must be rebuilt.
    TreeChanged,
}
