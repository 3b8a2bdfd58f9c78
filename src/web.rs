//! Browser adapter: wires the motion controller to a live document.
//!
//! Everything in here is a thin shell around the platform-agnostic
//! engine: [`DomHost`] implements [`Host`] over `web-sys`,
//! [`RafScheduler`] implements [`FrameScheduler`] over
//! `requestAnimationFrame`, and [`setup`] registers the DOM listeners
//! and the mutation observer, guarded so client-side navigation
//! re-entry cannot double-register anything.
//!
//! No failure here is fatal: a missing window, document, or root
//! element turns setup into a silent no-op, and teardown tolerates an
//! already-clean state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, Document, HtmlElement, MutationObserver,
    MutationObserverInit, Window,
};

use crate::host::{CardId, CardRect, FrameScheduler, Host};
use crate::motion::{InputEvent, Lifecycle, MotionController};
use crate::options::MotionOptions;

/// Window property guarding against a second setup in one page
/// session. Kept alongside the session [`Lifecycle`] below so even a
/// second copy of the bundle stays idempotent.
const SESSION_GUARD: &str = "__glassMotion";

thread_local! {
    /// The one session state for this bundle; `begin_session` runs
    /// against it so setup is idempotent.
    static SESSION_STATE: RefCell<Lifecycle> =
        const { RefCell::new(Lifecycle::Uninitialized) };
}

// ─────────────────────────────────────────────────────────────────────────────
// DomHost
// ─────────────────────────────────────────────────────────────────────────────

/// [`Host`] backed by the live document.
pub struct DomHost {
    window: Window,
    document: Document,
    root: HtmlElement,
    cards: Vec<HtmlElement>,
}

impl DomHost {
    /// Attach to the current page. `None` when there is no window,
    /// document, or root element (e.g. a non-interactive render
    /// pass), in which case the effect never starts.
    #[must_use]
    pub fn attach() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let root = document
            .document_element()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        Some(Self {
            window,
            document,
            root,
            cards: Vec::new(),
        })
    }

    fn media_matches(&self, query: &str) -> bool {
        self.window
            .match_media(query)
            .ok()
            .flatten()
            .is_some_and(|list| list.matches())
    }
}

impl Host for DomHost {
    fn viewport(&self) -> Vec2 {
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        Vec2::new(width as f32, height as f32)
    }

    fn scroll_y(&self) -> f32 {
        self.window.scroll_y().unwrap_or(0.0) as f32
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.media_matches("(prefers-reduced-motion: reduce)")
    }

    fn prefers_reduced_transparency(&self) -> bool {
        self.media_matches("(prefers-reduced-transparency: reduce)")
    }

    fn discover_cards(&mut self, selector: &str) -> Vec<CardId> {
        self.cards.clear();
        if let Ok(list) = self.document.query_selector_all(selector) {
            for i in 0..list.length() {
                if let Some(el) = list
                    .get(i)
                    .and_then(|node| node.dyn_into::<HtmlElement>().ok())
                {
                    self.cards.push(el);
                }
            }
        }
        (0..self.cards.len()).collect()
    }

    fn card_rect(&self, card: CardId) -> Option<CardRect> {
        let rect = self.cards.get(card)?.get_bounding_client_rect();
        Some(CardRect {
            left: rect.left() as f32,
            top: rect.top() as f32,
            width: rect.width() as f32,
            height: rect.height() as f32,
        })
    }

    fn set_root_property(&mut self, name: &str, value: &str) {
        let _ = self.root.style().set_property(name, value);
    }

    fn set_card_property(&mut self, card: CardId, name: &str, value: &str) {
        if let Some(el) = self.cards.get(card) {
            let _ = el.style().set_property(name, value);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RafScheduler
// ─────────────────────────────────────────────────────────────────────────────

/// [`FrameScheduler`] over `requestAnimationFrame`: the callback
/// reschedules itself every frame until [`FrameScheduler::cancel`]
/// takes the stored handle.
pub struct RafScheduler {
    window: Window,
    handle: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl RafScheduler {
    /// New idle scheduler on the given window.
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self {
            window,
            handle: Rc::new(Cell::new(None)),
            callback: Rc::new(RefCell::new(None)),
        }
    }

    fn request(
        window: &Window,
        handle: &Cell<Option<i32>>,
        callback: &RefCell<Option<Closure<dyn FnMut()>>>,
    ) {
        if let Some(cb) = callback.borrow().as_ref() {
            if let Ok(id) =
                window.request_animation_frame(cb.as_ref().unchecked_ref())
            {
                handle.set(Some(id));
            }
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn start(&mut self, mut tick: Box<dyn FnMut()>) {
        if self.callback.borrow().is_some() {
            return;
        }
        let window = self.window.clone();
        let handle = Rc::clone(&self.handle);
        let callback = Rc::clone(&self.callback);
        *self.callback.borrow_mut() =
            Some(Closure::wrap(Box::new(move || {
                tick();
                // Reschedule unconditionally; only cancel stops us.
                Self::request(&window, &handle, &callback);
            }) as Box<dyn FnMut()>));
        Self::request(&self.window, &self.handle, &self.callback);
    }

    fn cancel(&mut self) {
        if let Some(id) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        *self.callback.borrow_mut() = None;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// The registered event listener closures, held alive for the page
/// session so they can be removed at teardown.
struct Listeners {
    pointer_move: Closure<dyn FnMut(web_sys::PointerEvent)>,
    pointer_leave: Closure<dyn FnMut(web_sys::Event)>,
    scroll: Closure<dyn FnMut(web_sys::Event)>,
    resize: Closure<dyn FnMut(web_sys::Event)>,
}

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, MutationObserver)>;

/// Everything owned for one page session. Kept alive by the
/// `beforeunload` listener, which is the one closure that lives as
/// long as the page itself.
struct Session {
    controller: Rc<RefCell<MotionController>>,
    scheduler: RefCell<RafScheduler>,
    listeners: RefCell<Option<Listeners>>,
    observer: RefCell<Option<(MutationObserver, ObserverCallback)>>,
}

impl Session {
    /// Best-effort teardown: cancel the frame loop, remove listeners,
    /// disconnect the observer, kill the controller. Never panics;
    /// anything already gone is skipped.
    fn teardown(&self, window: &Window) {
        if let Ok(mut scheduler) = self.scheduler.try_borrow_mut() {
            scheduler.cancel();
        }
        if let Ok(mut slot) = self.listeners.try_borrow_mut() {
            if let Some(listeners) = slot.take() {
                let _ = window.remove_event_listener_with_callback(
                    "pointermove",
                    listeners.pointer_move.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "pointerleave",
                    listeners.pointer_leave.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "scroll",
                    listeners.scroll.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "resize",
                    listeners.resize.as_ref().unchecked_ref(),
                );
            }
        }
        if let Ok(mut slot) = self.observer.try_borrow_mut() {
            if let Some((observer, _callback)) = slot.take() {
                observer.disconnect();
            }
        }
        if let Ok(mut controller) = self.controller.try_borrow_mut() {
            controller.teardown();
        }
        SESSION_STATE.with(|state| {
            if let Ok(mut lifecycle) = state.try_borrow_mut() {
                lifecycle.end();
            }
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Setup
// ─────────────────────────────────────────────────────────────────────────────

fn guard_is_set(window: &Window) -> bool {
    js_sys::Reflect::get(window, &JsValue::from_str(SESSION_GUARD))
        .ok()
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

fn set_guard(window: &Window) {
    let _ = js_sys::Reflect::set(
        window,
        &JsValue::from_str(SESSION_GUARD),
        &JsValue::TRUE,
    );
}

fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Warn);
}

/// Start the effect with default options. Safe to call more than
/// once per page session; every call after the first is a no-op.
pub fn setup() {
    setup_with_options(MotionOptions::default());
}

/// Start the effect with explicit options.
///
/// Registers pointer/scroll/resize listeners, a mutation observer on
/// the document body, and the frame loop; hooks `beforeunload` for
/// teardown. A missing browser environment makes this a silent no-op
/// before any state is touched.
pub fn setup_with_options(options: MotionOptions) {
    let Some(mut dom) = DomHost::attach() else {
        return;
    };
    let window = dom.window.clone();
    if guard_is_set(&window) {
        return;
    }
    set_guard(&window);
    init_logging();

    let Some(controller) = SESSION_STATE.with(|state| {
        MotionController::begin_session(
            options,
            &mut state.borrow_mut(),
            &mut dom,
        )
    }) else {
        return;
    };
    let controller = Rc::new(RefCell::new(controller));
    let body = dom.document.body();
    let host = Rc::new(RefCell::new(dom));

    let listeners = register_listeners(&window, &controller, &host);
    let observer = observe_tree(body.as_ref(), &controller, &host);

    let mut scheduler = RafScheduler::new(window.clone());
    {
        let controller = Rc::clone(&controller);
        let host = Rc::clone(&host);
        scheduler.start(Box::new(move || {
            if let (Ok(mut ctl), Ok(mut host)) =
                (controller.try_borrow_mut(), host.try_borrow_mut())
            {
                ctl.tick(&mut *host);
            }
        }));
    }

    let session = Rc::new(Session {
        controller,
        scheduler: RefCell::new(scheduler),
        listeners: RefCell::new(Some(listeners)),
        observer: RefCell::new(observer),
    });

    let unload = {
        let session = Rc::clone(&session);
        let window = window.clone();
        Closure::wrap(Box::new(move |_event: web_sys::Event| {
            session.teardown(&window);
        }) as Box<dyn FnMut(web_sys::Event)>)
    };
    let _ = window.add_event_listener_with_callback(
        "beforeunload",
        unload.as_ref().unchecked_ref(),
    );
    // The unload closure (and through it, the whole session) lives
    // for the remainder of the page.
    unload.forget();
}

/// Entry point for direct script-tag use.
#[wasm_bindgen(js_name = setupGlassMotion)]
pub fn setup_glass_motion() {
    setup();
}

fn forward(
    controller: &Rc<RefCell<MotionController>>,
    host: &Rc<RefCell<DomHost>>,
    event: InputEvent,
) {
    if let (Ok(mut ctl), Ok(mut host)) =
        (controller.try_borrow_mut(), host.try_borrow_mut())
    {
        ctl.handle_event(event, &mut *host);
    }
}

fn register_listeners(
    window: &Window,
    controller: &Rc<RefCell<MotionController>>,
    host: &Rc<RefCell<DomHost>>,
) -> Listeners {
    let pointer_move = {
        let controller = Rc::clone(controller);
        let host = Rc::clone(host);
        Closure::wrap(Box::new(move |event: web_sys::PointerEvent| {
            forward(
                &controller,
                &host,
                InputEvent::PointerMoved {
                    x: event.client_x() as f32,
                    y: event.client_y() as f32,
                },
            );
        }) as Box<dyn FnMut(web_sys::PointerEvent)>)
    };
    let pointer_leave = {
        let controller = Rc::clone(controller);
        let host = Rc::clone(host);
        Closure::wrap(Box::new(move |_event: web_sys::Event| {
            forward(&controller, &host, InputEvent::PointerLeft);
        }) as Box<dyn FnMut(web_sys::Event)>)
    };
    let scroll = {
        let controller = Rc::clone(controller);
        let host = Rc::clone(host);
        Closure::wrap(Box::new(move |_event: web_sys::Event| {
            let y = host.try_borrow().map_or(0.0, |h| h.scroll_y());
            forward(&controller, &host, InputEvent::Scrolled { y });
        }) as Box<dyn FnMut(web_sys::Event)>)
    };
    let resize = {
        let controller = Rc::clone(controller);
        let host = Rc::clone(host);
        Closure::wrap(Box::new(move |_event: web_sys::Event| {
            forward(&controller, &host, InputEvent::Resized);
        }) as Box<dyn FnMut(web_sys::Event)>)
    };

    let _ = window.add_event_listener_with_callback(
        "pointermove",
        pointer_move.as_ref().unchecked_ref(),
    );
    let _ = window.add_event_listener_with_callback(
        "pointerleave",
        pointer_leave.as_ref().unchecked_ref(),
    );
    let scroll_opts = AddEventListenerOptions::new();
    scroll_opts.set_passive(true);
    let _ = window
        .add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            scroll.as_ref().unchecked_ref(),
            &scroll_opts,
        );
    let _ = window.add_event_listener_with_callback(
        "resize",
        resize.as_ref().unchecked_ref(),
    );

    Listeners {
        pointer_move,
        pointer_leave,
        scroll,
        resize,
    }
}

/// Watch the document body for subtree churn so the tracked card set
/// follows additions and removals. `None` when there is no body or
/// the observer cannot be created; the effect still runs, it just
/// only rediscovers on resize.
fn observe_tree(
    body: Option<&HtmlElement>,
    controller: &Rc<RefCell<MotionController>>,
    host: &Rc<RefCell<DomHost>>,
) -> Option<(MutationObserver, ObserverCallback)> {
    let body = body?;
    let callback: ObserverCallback = {
        let controller = Rc::clone(controller);
        let host = Rc::clone(host);
        Closure::wrap(Box::new(
            move |_records: js_sys::Array, _observer: MutationObserver| {
                forward(&controller, &host, InputEvent::TreeChanged);
            },
        )
            as Box<dyn FnMut(js_sys::Array, MutationObserver)>)
    };
    let observer =
        MutationObserver::new(callback.as_ref().unchecked_ref()).ok()?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    observer.observe_with_options(body, &init).ok()?;
    Some((observer, callback))
}
