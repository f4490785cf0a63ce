// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser console trace output.

use alloc::format;

use stacked_cards_core::trace::{
    ActivationEvent, BoundaryEvent, GestureToggleEvent, RefreshEvent, RequestEvent, TeardownEvent,
    TraceSink, TweenEndEvent, TweenStartEvent,
};
use wasm_bindgen::JsValue;

/// Writes one `console.debug` line per trace event.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

fn debug(line: &str) {
    web_sys::console::debug_1(&JsValue::from_str(line));
}

impl TraceSink for ConsoleSink {
    fn on_activation(&mut self, e: &ActivationEvent) {
        debug(&format!(
            "[stacked-cards] activate #{} {:?}",
            e.instance.0, e.mode
        ));
    }

    fn on_request(&mut self, e: &RequestEvent) {
        debug(&format!(
            "[stacked-cards] request #{} {:?} -> {:?}",
            e.instance.0, e.direction, e.decision
        ));
    }

    fn on_boundary(&mut self, e: &BoundaryEvent) {
        debug(&format!(
            "[stacked-cards] boundary #{} {:?} at {:.3}s",
            e.instance.0, e.direction, e.playhead
        ));
    }

    fn on_tween_start(&mut self, e: &TweenStartEvent) {
        debug(&format!(
            "[stacked-cards] tween #{} {:?} {:?} {:.3}s -> {:.3}s",
            e.instance.0, e.tween, e.direction, e.from, e.to
        ));
    }

    fn on_tween_complete(&mut self, e: &TweenEndEvent) {
        debug(&format!(
            "[stacked-cards] tween #{} {:?} done at {:.3}s",
            e.instance.0, e.tween, e.position
        ));
    }

    fn on_tween_cancel(&mut self, e: &TweenEndEvent) {
        debug(&format!(
            "[stacked-cards] tween #{} {:?} cancelled at {:.3}s",
            e.instance.0, e.tween, e.position
        ));
    }

    fn on_gesture_toggle(&mut self, e: &GestureToggleEvent) {
        let state = if e.enabled { "on" } else { "off" };
        debug(&format!(
            "[stacked-cards] gesture #{} {state} ({:?} at y={})",
            e.instance.0, e.cause, e.scroll_y
        ));
    }

    fn on_teardown(&mut self, e: &TeardownEvent) {
        debug(&format!(
            "[stacked-cards] destroy #{} enhanced={}",
            e.instance.0, e.was_enhanced
        ));
    }

    fn on_refresh(&mut self, e: &RefreshEvent) {
        debug(&format!(
            "[stacked-cards] refresh roots={} skipped={} evicted={} observed={} activated={}",
            e.roots, e.skipped, e.evicted, e.observed, e.activated
        ));
    }
}
