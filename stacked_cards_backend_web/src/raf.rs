// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! On-demand `requestAnimationFrame` loop.
//!
//! [`FrameLoop`] runs only while something is animating. Each callback
//! receives the time since the previous frame in seconds (zero on the first
//! frame after a start) and returns whether another frame is wanted; returning
//! `false` parks the loop until the next [`start`](FrameLoop::start).

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

// Global bindings, so frames never fetch the Window object.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

/// Frame deltas longer than this are clamped, so a backgrounded tab does not
/// finish every tween in one jump when it becomes visible again.
const MAX_FRAME_DELTA_S: f64 = 0.1;

type FrameClosure = Closure<dyn FnMut(f64)>;

/// A `requestAnimationFrame` loop that runs until its callback declines the
/// next frame.
pub struct FrameLoop {
    inner: Rc<FrameInner>,
}

struct FrameInner {
    /// The JS closure registered with `requestAnimationFrame`.
    ///
    /// Created on the first `start()` and reused afterwards.
    closure: RefCell<Option<FrameClosure>>,

    /// The user-supplied callback. Receives seconds since the previous frame.
    callback: RefCell<Box<dyn FnMut(f64) -> bool>>,

    /// Timestamp of the previous frame in milliseconds.
    last_timestamp: Cell<Option<f64>>,

    running: Cell<bool>,

    /// The ID returned by the most recent `requestAnimationFrame` call.
    raf_id: Cell<i32>,
}

impl FrameInner {
    fn request_frame(&self) {
        if let Some(ref closure) = *self.closure.borrow() {
            let id = request_animation_frame(closure.as_ref().unchecked_ref());
            self.raf_id.set(id);
        }
    }
}

impl FrameLoop {
    /// Creates a loop that is **not yet running**.
    pub fn new(callback: impl FnMut(f64) -> bool + 'static) -> Self {
        Self {
            inner: Rc::new(FrameInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                last_timestamp: Cell::new(None),
                running: Cell::new(false),
                raf_id: Cell::new(0),
            }),
        }
    }

    /// Requests frames until the callback returns `false`.
    ///
    /// If already running, this is a no-op.
    pub fn start(&self) {
        if self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);
        self.inner.last_timestamp.set(None);

        if self.inner.closure.borrow().is_none() {
            // The closure holds a weak reference so the loop can be dropped
            // while a frame is pending.
            let weak = Rc::downgrade(&self.inner);
            let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if !inner.running.get() {
                    return;
                }
                let dt = inner
                    .last_timestamp
                    .replace(Some(timestamp_ms))
                    .map_or(0.0, |last| {
                        ((timestamp_ms - last) / 1000.0).clamp(0.0, MAX_FRAME_DELTA_S)
                    });

                // Scoped so the borrow does not overlap with `closure`.
                let again = inner.callback.borrow_mut()(dt);

                if again && inner.running.get() {
                    inner.request_frame();
                } else {
                    inner.running.set(false);
                }
            }) as Box<dyn FnMut(f64)>);
            *self.inner.closure.borrow_mut() = Some(closure);
        }

        self.inner.request_frame();
    }

    /// Stops the loop and cancels the pending frame.
    pub fn stop(&self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        cancel_animation_frame(self.inner.raf_id.get());
    }

    /// Returns `true` if a frame is pending.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
        // Drop the JS closure so it doesn't leak.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameLoop")
            .field("running", &self.inner.running.get())
            .field("last_timestamp", &self.inner.last_timestamp.get())
            .finish_non_exhaustive()
    }
}
