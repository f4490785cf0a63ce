// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `#[wasm_bindgen]` entry object.
//!
//! [`StackedCardsBoot`] owns one [`BootManager`] over the live document and
//! wires it to the browser: navigation and resize events drive the lifecycle,
//! wheel, touch, and scroll events are routed to active controllers, and a
//! [`FrameLoop`] ticks tweens while any is in flight.
//!
//! Browser callbacks hold only `Weak` references to the shared state, so
//! dropping the boot object (or calling `free()` from JS) tears everything
//! down. State borrows in callbacks use `try_borrow_mut`; an event that
//! arrives while the state is busy is dropped.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use stacked_cards_core::backend::{Environment, Intersection};
use stacked_cards_core::boot::BootManager;
use stacked_cards_core::trace::Tracer;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, HtmlElement, TouchEvent, WheelEvent, Window,
};

use crate::dom::{DomDocument, DomEnvironment, IntersectionHandler};
use crate::raf::FrameLoop;

#[cfg(feature = "console-trace")]
type Sink = crate::ConsoleSink;
#[cfg(not(feature = "console-trace"))]
type Sink = stacked_cards_core::trace::NoopSink;

/// Pixels per line for wheel events reported in line units.
const LINE_HEIGHT_PX: f64 = 16.0;

/// Page navigation is about to replace the document body.
const BEFORE_SWAP_EVENT: &str = "astro:before-swap";

/// Page navigation finished and the new body is in place.
const PAGE_LOAD_EVENT: &str = "astro:page-load";

/// Boots stacked-cards roots in the current document and keeps them in sync
/// with navigation, resizes, and user input.
///
/// ```js
/// const boot = new StackedCardsBoot();
/// boot.boot();
/// ```
#[wasm_bindgen]
pub struct StackedCardsBoot {
    inner: Rc<BootInner>,
}

impl core::fmt::Debug for StackedCardsBoot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StackedCardsBoot")
            .field("installed", &self.inner.is_installed())
            .field("frames", &self.inner.frames)
            .finish_non_exhaustive()
    }
}

#[wasm_bindgen]
impl StackedCardsBoot {
    /// Creates a boot object for the current window. Nothing is attached
    /// until [`install`](Self::install) or [`boot`](Self::boot).
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let inner = Rc::new_cyclic(|weak: &Weak<BootInner>| {
            let intersect_weak = weak.clone();
            let on_intersect: IntersectionHandler =
                Rc::new(move |entries: Vec<Intersection<HtmlElement>>| {
                    if let Some(inner) = intersect_weak.upgrade() {
                        inner.on_intersections(&entries);
                    }
                });

            let frame_weak = weak.clone();
            let frames = FrameLoop::new(move |dt| {
                let Some(inner) = frame_weak.upgrade() else {
                    return false;
                };
                let Ok(mut state) = inner.state.try_borrow_mut() else {
                    return true;
                };
                state.tick(dt)
            });

            BootInner {
                weak: weak.clone(),
                window: window.clone(),
                document: document.clone(),
                state: RefCell::new(BootState {
                    manager: BootManager::new(),
                    doc: DomDocument::new(window.clone(), document.clone(), on_intersect),
                    env: DomEnvironment::new(window.clone()),
                    sink: Sink::default(),
                }),
                frames,
                listeners: RefCell::new(Vec::new()),
            }
        });
        Ok(Self { inner })
    }

    /// Attaches document and window listeners. Calling it again is a no-op.
    pub fn install(&self) -> Result<(), JsValue> {
        self.inner.install()
    }

    /// Installs listeners if needed, then scans the document for roots.
    pub fn boot(&self) -> Result<(), JsValue> {
        self.inner.install()?;
        self.inner.refresh();
        Ok(())
    }

    /// Scans the document for roots that are new or need re-evaluation.
    pub fn refresh(&self) {
        self.inner.refresh();
    }

    /// Disconnects the visibility observer and destroys every controller.
    #[wasm_bindgen(js_name = destroyAll)]
    pub fn destroy_all(&self) {
        self.inner.destroy_all();
    }

    /// Destroys every controller and detaches all listeners.
    pub fn uninstall(&self) {
        self.inner.destroy_all();
        self.inner.listeners.borrow_mut().clear();
    }

    /// Number of roots with a live controller.
    #[wasm_bindgen(getter, js_name = activeCount)]
    pub fn active_count(&self) -> usize {
        self.inner
            .state
            .try_borrow()
            .map_or(0, |state| state.manager.registry().len())
    }
}

impl Drop for StackedCardsBoot {
    fn drop(&mut self) {
        self.uninstall();
    }
}

struct BootState {
    manager: BootManager<DomDocument>,
    doc: DomDocument,
    env: DomEnvironment,
    sink: Sink,
}

impl BootState {
    fn refresh(&mut self) {
        let Self {
            manager,
            doc,
            env,
            sink,
        } = self;
        manager.refresh(doc, env, &mut Tracer::new(sink));
    }

    fn tick(&mut self, dt: f64) -> bool {
        self.manager.tick(dt, &mut Tracer::new(&mut self.sink))
    }
}

struct BootInner {
    weak: Weak<Self>,
    window: Window,
    document: web_sys::Document,
    state: RefCell<BootState>,
    frames: FrameLoop,
    listeners: RefCell<Vec<Listener>>,
}

impl BootInner {
    fn is_installed(&self) -> bool {
        !self.listeners.borrow().is_empty()
    }

    fn install(&self) -> Result<(), JsValue> {
        if self.is_installed() {
            return Ok(());
        }
        let window: &EventTarget = &self.window;
        let document: &EventTarget = &self.document;
        let listeners = [
            self.listen(document, BEFORE_SWAP_EVENT, true, Self::on_before_swap)?,
            self.listen(document, PAGE_LOAD_EVENT, true, Self::on_page_load)?,
            self.listen(window, "resize", true, Self::on_page_load)?,
            self.listen(window, "wheel", false, Self::on_wheel)?,
            self.listen(window, "touchstart", true, Self::on_touch_start)?,
            self.listen(window, "touchmove", false, Self::on_touch_move)?,
            self.listen(window, "touchend", true, Self::on_touch_end)?,
            self.listen(window, "touchcancel", true, Self::on_touch_end)?,
            self.listen(document, "scroll", false, Self::on_scroll)?,
        ];
        self.listeners.borrow_mut().extend(listeners);
        Ok(())
    }

    fn listen(
        &self,
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        handler: fn(&Self, &Event),
    ) -> Result<Listener, JsValue> {
        let weak = self.weak.clone();
        let closure = Closure::wrap(Box::new(move |e: Event| {
            if let Some(inner) = weak.upgrade() {
                handler(&inner, &e);
            }
        }) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Listener {
            target: target.clone(),
            event,
            closure,
        })
    }

    /// Runs `f` on the state if it is free, then starts frames if anything
    /// began animating.
    fn with_state<R>(&self, f: impl FnOnce(&mut BootState) -> R) -> Option<R> {
        let result = {
            let mut state = self.state.try_borrow_mut().ok()?;
            let result = f(&mut *state);
            if state.manager.is_animating() {
                self.frames.start();
            }
            result
        };
        Some(result)
    }

    fn refresh(&self) {
        self.with_state(BootState::refresh);
    }

    fn destroy_all(&self) {
        self.with_state(|state| {
            state
                .manager
                .destroy_all(&mut Tracer::new(&mut state.sink));
        });
        self.frames.stop();
    }

    fn on_intersections(&self, entries: &[Intersection<HtmlElement>]) {
        self.with_state(|state| {
            let BootState {
                manager,
                doc,
                env,
                sink,
            } = state;
            manager.on_intersections(doc, env, entries, &mut Tracer::new(sink));
        });
    }

    fn on_before_swap(&self, _event: &Event) {
        self.destroy_all();
    }

    fn on_page_load(&self, _event: &Event) {
        self.refresh();
    }

    fn on_wheel(&self, event: &Event) {
        let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
            return;
        };
        let consumed = self.with_state(|state| {
            let unit = match wheel.delta_mode() {
                WheelEvent::DOM_DELTA_LINE => LINE_HEIGHT_PX,
                WheelEvent::DOM_DELTA_PAGE => state.env.viewport_height(),
                _ => 1.0,
            };
            state
                .manager
                .on_wheel(wheel.delta_y() * unit, &mut Tracer::new(&mut state.sink))
        });
        if consumed == Some(true) {
            event.prevent_default();
        }
    }

    fn on_touch_start(&self, event: &Event) {
        if let Some(y) = touch_y(event) {
            self.with_state(|state| state.manager.on_touch_start(y));
        }
    }

    fn on_touch_move(&self, event: &Event) {
        let Some(y) = touch_y(event) else {
            return;
        };
        let consumed = self.with_state(|state| {
            state
                .manager
                .on_touch_move(y, &mut Tracer::new(&mut state.sink))
        });
        if consumed == Some(true) {
            event.prevent_default();
        }
    }

    fn on_touch_end(&self, _event: &Event) {
        self.with_state(|state| state.manager.on_touch_end());
    }

    fn on_scroll(&self, _event: &Event) {
        let restore = self
            .with_state(|state| {
                let y = state.env.scroll_y();
                state
                    .manager
                    .on_scroll(y, &mut Tracer::new(&mut state.sink))
                    .map(|restore_y| (state.env.scroll_x(), restore_y))
            })
            .flatten();
        if let Some((x, y)) = restore {
            self.window.scroll_to_with_x_and_y(x, y);
        }
    }
}

/// Vertical position of the first active touch.
fn touch_y(event: &Event) -> Option<f64> {
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some(f64::from(touch.client_y()))
}

/// An attached event listener. Detaches when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}
