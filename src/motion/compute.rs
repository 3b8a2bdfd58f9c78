//! Pure per-frame computation of published CSS custom properties.
//!
//! Everything here is a function of state in, property values out; the
//! act of writing the values to the document lives in the host
//! adapter. Property names match the stylesheet contract: positions
//! publish as percentages, scroll as a bare ratio. All values are
//! formatted to 3 decimals (the first cut emitted raw float
//! percentages and fixed only the scroll value; uniform precision
//! keeps the published state deterministic).

use glam::Vec2;

use crate::host::CardRect;
use crate::motion::state::{GlobalLightState, PointerLightState};
use crate::options::{ClampRange, MotionOptions};

/// Root-level property names, in publish order.
pub(crate) const ROOT_VARS: [&str; 5] = [
    "--glass-light-x",
    "--glass-light-y",
    "--glass-light-x2",
    "--glass-light-y2",
    "--glass-scroll",
];

/// Card-scoped property names, in publish order.
pub(crate) const CARD_VARS: [&str; 4] = [
    "--glass-card-light-x",
    "--glass-card-light-y",
    "--glass-card-light-x2",
    "--glass-card-light-y2",
];

/// Local light position relative to one card's bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardLight {
    /// Horizontal position as a fraction of the card width.
    pub x: f32,
    /// Vertical position as a fraction of the card height.
    pub y: f32,
}

/// One frame's worth of computed property values.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameVars {
    /// `(name, value)` pairs for the document root.
    pub root: Vec<(&'static str, String)>,
    /// Per-card `(name, value)` pairs, parallel to the rect slice
    /// passed to [`compute_frame`]. `None` where the rect was
    /// unreadable this frame.
    pub cards: Vec<Option<Vec<(&'static str, String)>>>,
}

fn percent(value: f32) -> String {
    format!("{:.3}%", value * 100.0)
}

/// Root property values for the current global light state: eased
/// position, its mirror complement for paired gradient stops, and raw
/// scroll progress.
#[must_use]
pub(crate) fn global_vars(
    state: &GlobalLightState,
) -> Vec<(&'static str, String)> {
    vec![
        (ROOT_VARS[0], percent(state.current.x)),
        (ROOT_VARS[1], percent(state.current.y)),
        (ROOT_VARS[2], percent(1.0 - state.current.x)),
        (ROOT_VARS[3], percent(1.0 - state.current.y)),
        (ROOT_VARS[4], format!("{:.3}", state.scroll)),
    ]
}

/// Local light position for one card: the eased pointer position
/// mapped into the card's box, clamped to `local_clamp`.
///
/// Zero-size boxes floor to 1px, so a collapsed card yields a finite
/// (if meaningless) position instead of a division by zero.
#[must_use]
pub(crate) fn card_light(
    pointer: Vec2,
    rect: &CardRect,
    local_clamp: ClampRange,
) -> CardLight {
    let x = (pointer.x - rect.left) / rect.width.max(1.0);
    let y = (pointer.y - rect.top) / rect.height.max(1.0);
    CardLight {
        x: local_clamp.clamp(x),
        y: local_clamp.clamp(y),
    }
}

fn card_vars(light: CardLight) -> Vec<(&'static str, String)> {
    vec![
        (CARD_VARS[0], percent(light.x)),
        (CARD_VARS[1], percent(light.y)),
        (CARD_VARS[2], percent(1.0 - light.x)),
        (CARD_VARS[3], percent(1.0 - light.y)),
    ]
}

/// Compute every property value for one frame.
///
/// `card_rects` holds the geometry of each tracked card in tracking
/// order; an empty slice means no card output (not an error). When
/// card lighting is disabled the card list is left empty regardless.
#[must_use]
pub fn compute_frame(
    global: &GlobalLightState,
    pointer: &PointerLightState,
    card_rects: &[Option<CardRect>],
    options: &MotionOptions,
) -> FrameVars {
    let cards = if options.card_lighting {
        card_rects
            .iter()
            .map(|rect| {
                rect.as_ref().map(|r| {
                    card_vars(card_light(
                        pointer.current,
                        r,
                        options.local_clamp,
                    ))
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    FrameVars {
        root: global_vars(global),
        cards,
    }
}
