//! The motion controller: sole owner of light state and the tracked
//! card set.
//!
//! Event handlers only write targets; the frame tick is the only
//! reader/transformer of `current` state and the only writer of
//! published properties. Everything environment-shaped goes through
//! the [`Host`] trait so the controller runs unchanged against a fake
//! host in tests.

use glam::Vec2;

use crate::host::{CardId, Host};
use crate::motion::compute::compute_frame;
use crate::motion::event::InputEvent;
use crate::motion::state::{
    GlobalLightState, Lifecycle, PointerLightState,
};
use crate::options::MotionOptions;

/// Drives the ambient lighting effect: eases the light toward the
/// pointer, tracks scroll progress, and publishes CSS custom
/// properties on the root and on each tracked card.
pub struct MotionController {
    options: MotionOptions,
    lifecycle: Lifecycle,
    /// Accessibility preferences, read once at setup. When either is
    /// set the animated component is fully suppressed, not slowed.
    reduced_motion: bool,
    reduced_transparency: bool,
    light: GlobalLightState,
    pointer: PointerLightState,
    cards: Vec<CardId>,
}

impl MotionController {
    /// Set up the controller against a host: read preferences, seed
    /// the light at its resting position, sample scroll, discover
    /// cards, and publish the first frame so consumers never see
    /// unset properties.
    pub fn new(options: MotionOptions, host: &mut impl Host) -> Self {
        let reduced_motion = host.prefers_reduced_motion();
        let reduced_transparency = host.prefers_reduced_transparency();
        let home = Vec2::from(options.default_target);
        let viewport = host.viewport();

        let mut light = GlobalLightState::at_rest(home);
        light.scroll =
            (host.scroll_y() / options.scroll_distance).min(1.0);

        let mut controller = Self {
            // Pointer light rests where the global light rests,
            // expressed in pixels.
            pointer: PointerLightState::at_rest(home * viewport),
            options,
            lifecycle: Lifecycle::Uninitialized,
            reduced_motion,
            reduced_transparency,
            light,
            cards: Vec::new(),
        };
        let _ = controller.lifecycle.begin();
        controller.discover(host);
        controller.publish(host);
        log::debug!(
            "motion controller up: {} card(s), reduced_motion={}, \
             reduced_transparency={}",
            controller.cards.len(),
            controller.reduced_motion,
            controller.reduced_transparency,
        );
        controller
    }

    /// Guarded setup: the session-level entry point.
    ///
    /// `session` is the one [`Lifecycle`] for the whole page session,
    /// owned by the caller and passed by reference. The first call
    /// begins the session and builds a controller; every later call —
    /// including after teardown — is an idempotent no-op returning
    /// `None`, so the caller registers listeners and starts the frame
    /// loop exactly once.
    pub fn begin_session(
        options: MotionOptions,
        session: &mut Lifecycle,
        host: &mut impl Host,
    ) -> Option<Self> {
        if !session.begin() {
            return None;
        }
        Some(Self::new(options, host))
    }

    /// Whether the animated component is suppressed by an
    /// accessibility preference.
    #[must_use]
    pub fn suppressed(&self) -> bool {
        self.reduced_motion || self.reduced_transparency
    }

    /// Session lifecycle state.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Currently tracked card ids (latest discovery wins).
    #[must_use]
    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    /// Eased global light state, as published.
    #[must_use]
    pub fn light(&self) -> &GlobalLightState {
        &self.light
    }

    /// Route one input event. After teardown every event is inert.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        host: &mut impl Host,
    ) {
        if !self.lifecycle.is_running() {
            return;
        }
        match event {
            InputEvent::PointerMoved { x, y } => {
                self.on_pointer_moved(x, y, host);
            }
            InputEvent::PointerLeft => {
                // The light returns home rather than freezing at the
                // last position.
                self.light.target = Vec2::from(self.options.default_target);
                self.pointer.target = Vec2::from(self.options.default_target)
                    * host.viewport();
            }
            InputEvent::Scrolled { y } => {
                // Scroll is published raw: no easing.
                self.light.scroll =
                    (y / self.options.scroll_distance).min(1.0);
            }
            InputEvent::Resized | InputEvent::TreeChanged => {
                self.discover(host);
            }
        }
    }

    fn on_pointer_moved(&mut self, x: f32, y: f32, host: &mut impl Host) {
        // Fully suppressed for accessibility, not merely slowed.
        if self.suppressed() {
            return;
        }
        let viewport = host.viewport();
        let normalized = Vec2::new(
            x / viewport.x.max(1.0),
            y / viewport.y.max(1.0),
        );
        self.light.target = Vec2::new(
            self.options.global_clamp.clamp(normalized.x),
            self.options.global_clamp.clamp(normalized.y),
        );
        self.pointer.target = Vec2::new(x, y);
    }

    /// One frame: ease every channel (unless suppressed), then publish.
    ///
    /// Publishing always runs so the computed CSS state stays
    /// internally consistent even when the animation is suppressed.
    /// Never fails; a card whose geometry cannot be read is skipped
    /// for this frame.
    pub fn tick(&mut self, host: &mut impl Host) {
        if !self.lifecycle.is_running() {
            return;
        }
        if !self.suppressed() {
            self.light.ease(self.options.smoothing);
            self.pointer.ease(self.options.smoothing);
        }
        self.publish(host);
    }

    /// Stop for good. Further events and ticks are no-ops. Idempotent
    /// and infallible; tearing down an already-dead controller is not
    /// an error.
    pub fn teardown(&mut self) {
        if self.lifecycle.is_running() {
            log::debug!("motion controller torn down");
        }
        self.lifecycle.end();
    }

    /// Rebuild the tracked card set from scratch. Full replacement,
    /// no diffing: the set is tens of elements at most and latest
    /// discovery wins.
    fn discover(&mut self, host: &mut impl Host) {
        if !self.options.card_lighting {
            return;
        }
        self.cards = host.discover_cards(&self.options.selector);
        log::debug!("tracking {} card(s)", self.cards.len());
    }

    fn publish(&mut self, host: &mut impl Host) {
        let rects: Vec<_> = self
            .cards
            .iter()
            .map(|&card| host.card_rect(card))
            .collect();
        let frame = compute_frame(
            &self.light,
            &self.pointer,
            &rects,
            &self.options,
        );
        for (name, value) in &frame.root {
            host.set_root_property(name, value);
        }
        for (card, vars) in self.cards.iter().zip(&frame.cards) {
            if let Some(vars) = vars {
                for (name, value) in vars {
                    host.set_card_property(*card, name, value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::host::CardRect;

    /// In-memory host: fixed viewport, scripted cards, recorded
    /// property writes.
    struct FakeHost {
        viewport: Vec2,
        scroll_y: f32,
        reduced_motion: bool,
        reduced_transparency: bool,
        /// Rects handed out on the next discovery pass.
        dom_cards: Vec<CardRect>,
        discoveries: u32,
        root_props: HashMap<String, String>,
        card_props: HashMap<(CardId, String), String>,
        writes: u32,
    }

    impl FakeHost {
        fn new() -> Self {
            Self {
                viewport: Vec2::new(1000.0, 500.0),
                scroll_y: 0.0,
                reduced_motion: false,
                reduced_transparency: false,
                dom_cards: Vec::new(),
                discoveries: 0,
                root_props: HashMap::new(),
                card_props: HashMap::new(),
                writes: 0,
            }
        }

        fn root(&self, name: &str) -> &str {
            self.root_props
                .get(name)
                .map_or("<unset>", String::as_str)
        }
    }

    impl Host for FakeHost {
        fn viewport(&self) -> Vec2 {
            self.viewport
        }

        fn scroll_y(&self) -> f32 {
            self.scroll_y
        }

        fn prefers_reduced_motion(&self) -> bool {
            self.reduced_motion
        }

        fn prefers_reduced_transparency(&self) -> bool {
            self.reduced_transparency
        }

        fn discover_cards(&mut self, _selector: &str) -> Vec<CardId> {
            self.discoveries += 1;
            (0..self.dom_cards.len()).collect()
        }

        fn card_rect(&self, card: CardId) -> Option<CardRect> {
            self.dom_cards.get(card).copied()
        }

        fn set_root_property(&mut self, name: &str, value: &str) {
            self.writes += 1;
            let _ = self
                .root_props
                .insert(name.to_owned(), value.to_owned());
        }

        fn set_card_property(
            &mut self,
            card: CardId,
            name: &str,
            value: &str,
        ) {
            self.writes += 1;
            let _ = self
                .card_props
                .insert((card, name.to_owned()), value.to_owned());
        }
    }

    fn controller(host: &mut FakeHost) -> MotionController {
        MotionController::new(MotionOptions::default(), host)
    }

    #[test]
    fn setup_publishes_the_resting_frame() {
        let mut host = FakeHost::new();
        let ctl = controller(&mut host);
        assert_eq!(host.root("--glass-light-x"), "50.000%");
        assert_eq!(host.root("--glass-light-y"), "18.000%");
        assert_eq!(host.root("--glass-light-x2"), "50.000%");
        assert_eq!(host.root("--glass-light-y2"), "82.000%");
        assert_eq!(host.root("--glass-scroll"), "0.000");
        assert!(ctl.lifecycle().is_running());
        assert_eq!(host.discoveries, 1);
    }

    #[test]
    fn setup_samples_scroll_immediately() {
        let mut host = FakeHost::new();
        host.scroll_y = 450.0;
        let _ctl = controller(&mut host);
        assert_eq!(host.root("--glass-scroll"), "0.500");
    }

    #[test]
    fn pointer_move_sets_clamped_normalized_targets() {
        let mut host = FakeHost::new();
        let mut ctl = controller(&mut host);
        ctl.handle_event(
            InputEvent::PointerMoved { x: 250.0, y: 499.0 },
            &mut host,
        );
        assert_eq!(ctl.light().target.x, 0.25);
        // 499/500 = 0.998 clamps to the 0.95 edge guard.
        assert_eq!(ctl.light().target.y, 0.95);

        ctl.handle_event(
            InputEvent::PointerMoved { x: 0.0, y: 0.0 },
            &mut host,
        );
        assert_eq!(ctl.light().target, Vec2::new(0.05, 0.05));
    }

    #[test]
    fn ticks_converge_on_the_target() {
        let mut host = FakeHost::new();
        let mut ctl = controller(&mut host);
        ctl.handle_event(
            InputEvent::PointerMoved { x: 900.0, y: 250.0 },
            &mut host,
        );
        for _ in 0..200 {
            ctl.tick(&mut host);
        }
        assert!((ctl.light().current.x - 0.9).abs() < 1e-3);
        assert!((ctl.light().current.y - 0.5).abs() < 1e-3);
        // Published values track the eased position and stay inside
        // the global clamp range.
        let x: f32 = host.root("--glass-light-x")
            .trim_end_matches('%')
            .parse()
            .unwrap();
        assert!((5.0..=95.0).contains(&x));
    }

    #[test]
    fn pointer_leave_resets_targets_exactly() {
        let mut host = FakeHost::new();
        let mut ctl = controller(&mut host);
        ctl.handle_event(
            InputEvent::PointerMoved { x: 900.0, y: 400.0 },
            &mut host,
        );
        ctl.handle_event(
            InputEvent::PointerMoved { x: 100.0, y: 100.0 },
            &mut host,
        );
        ctl.handle_event(InputEvent::PointerLeft, &mut host);
        assert_eq!(ctl.light().target, Vec2::new(0.5, 0.18));
    }

    #[test]
    fn scroll_normalizes_and_saturates() {
        let mut host = FakeHost::new();
        let mut ctl = controller(&mut host);

        ctl.handle_event(InputEvent::Scrolled { y: 0.0 }, &mut host);
        ctl.tick(&mut host);
        assert_eq!(host.root("--glass-scroll"), "0.000");

        ctl.handle_event(InputEvent::Scrolled { y: 450.0 }, &mut host);
        ctl.tick(&mut host);
        assert_eq!(host.root("--glass-scroll"), "0.500");

        ctl.handle_event(InputEvent::Scrolled { y: 1800.0 }, &mut host);
        ctl.tick(&mut host);
        assert_eq!(host.root("--glass-scroll"), "1.000");
    }

    #[test]
    fn preference_gating_pins_current_at_the_default() {
        let mut host = FakeHost::new();
        host.reduced_motion = true;
        let mut ctl = controller(&mut host);
        for i in 0..50 {
            ctl.handle_event(
                InputEvent::PointerMoved {
                    x: (i * 17 % 1000) as f32,
                    y: (i * 31 % 500) as f32,
                },
                &mut host,
            );
            ctl.tick(&mut host);
        }
        assert_eq!(ctl.light().current, Vec2::new(0.5, 0.18));
        // Publishing still ran, so the CSS state stays consistent.
        assert_eq!(host.root("--glass-light-x"), "50.000%");
    }

    #[test]
    fn reduced_transparency_suppresses_too() {
        let mut host = FakeHost::new();
        host.reduced_transparency = true;
        let mut ctl = controller(&mut host);
        ctl.handle_event(
            InputEvent::PointerMoved { x: 999.0, y: 1.0 },
            &mut host,
        );
        ctl.tick(&mut host);
        assert_eq!(ctl.light().current, Vec2::new(0.5, 0.18));
        assert!(ctl.suppressed());
    }

    #[test]
    fn discovery_fully_replaces_the_tracked_set() {
        let mut host = FakeHost::new();
        host.dom_cards = vec![CardRect {
            left: 0.0,
            top: 0.0,
            width: 100.0,
            height: 100.0,
        }];
        let mut ctl = controller(&mut host);
        assert_eq!(ctl.cards().len(), 1);

        // Three cards appear, one of them replacing the original.
        host.dom_cards = vec![
            CardRect {
                left: 0.0,
                top: 200.0,
                width: 100.0,
                height: 100.0,
            };
            3
        ];
        ctl.handle_event(InputEvent::TreeChanged, &mut host);
        assert_eq!(ctl.cards().len(), 3);

        // All removed.
        host.dom_cards.clear();
        ctl.handle_event(InputEvent::TreeChanged, &mut host);
        assert!(ctl.cards().is_empty());
    }

    #[test]
    fn resize_triggers_rediscovery() {
        let mut host = FakeHost::new();
        let mut ctl = controller(&mut host);
        assert_eq!(host.discoveries, 1);
        ctl.handle_event(InputEvent::Resized, &mut host);
        assert_eq!(host.discoveries, 2);
    }

    #[test]
    fn card_lighting_off_skips_discovery_entirely() {
        let mut host = FakeHost::new();
        host.dom_cards = vec![CardRect {
            left: 0.0,
            top: 0.0,
            width: 100.0,
            height: 100.0,
        }];
        let options = MotionOptions {
            card_lighting: false,
            ..MotionOptions::default()
        };
        let mut ctl = MotionController::new(options, &mut host);
        ctl.handle_event(InputEvent::TreeChanged, &mut host);
        assert_eq!(host.discoveries, 0);
        assert!(ctl.cards().is_empty());
        assert!(host.card_props.is_empty());
    }

    #[test]
    fn card_properties_follow_the_pointer_light() {
        let mut host = FakeHost::new();
        host.dom_cards = vec![CardRect {
            left: 100.0,
            top: 100.0,
            width: 200.0,
            height: 100.0,
        }];
        let mut ctl = controller(&mut host);
        ctl.handle_event(
            InputEvent::PointerMoved { x: 200.0, y: 150.0 },
            &mut host,
        );
        for _ in 0..400 {
            ctl.tick(&mut host);
        }
        let x = host
            .card_props
            .get(&(0, "--glass-card-light-x".to_owned()))
            .unwrap();
        let x: f32 = x.trim_end_matches('%').parse().unwrap();
        // (200 - 100) / 200 = 0.5 → 50%
        assert!((x - 50.0).abs() < 0.5);
    }

    #[test]
    fn second_setup_in_one_session_starts_nothing() {
        use crate::host::testing::ManualScheduler;
        use crate::host::FrameScheduler;

        let mut host = FakeHost::new();
        let mut session = Lifecycle::default();
        let mut scheduler = ManualScheduler::default();

        // The setup path: begin the session, then start the loop —
        // exactly what the browser adapter does.
        let mut setup = |session: &mut Lifecycle,
                         host: &mut FakeHost,
                         scheduler: &mut ManualScheduler| {
            let controller = MotionController::begin_session(
                MotionOptions::default(),
                session,
                host,
            )?;
            scheduler.start(Box::new(|| {}));
            Some(controller)
        };

        let first = setup(&mut session, &mut host, &mut scheduler);
        assert!(first.is_some());
        let discoveries_after_first = host.discoveries;

        // Client-side navigation re-enters setup: nothing registers
        // or starts a second time.
        let second = setup(&mut session, &mut host, &mut scheduler);
        assert!(second.is_none());
        assert_eq!(scheduler.times_started(), 1);
        assert_eq!(host.discoveries, discoveries_after_first);

        // The session stays closed even after teardown.
        let mut controller = first.unwrap();
        controller.teardown();
        session.end();
        assert!(setup(&mut session, &mut host, &mut scheduler).is_none());
        assert_eq!(scheduler.times_started(), 1);
    }

    #[test]
    fn teardown_makes_everything_inert() {
        let mut host = FakeHost::new();
        let mut ctl = controller(&mut host);
        ctl.teardown();
        let writes_after_teardown = host.writes;

        ctl.handle_event(
            InputEvent::PointerMoved { x: 900.0, y: 400.0 },
            &mut host,
        );
        ctl.handle_event(InputEvent::Scrolled { y: 700.0 }, &mut host);
        ctl.tick(&mut host);
        ctl.tick(&mut host);
        assert_eq!(host.writes, writes_after_teardown);
        assert_eq!(ctl.light().target, Vec2::new(0.5, 0.18));

        // Second teardown is tolerated silently.
        ctl.teardown();
        assert_eq!(ctl.lifecycle(), Lifecycle::TornDown);
    }
}
