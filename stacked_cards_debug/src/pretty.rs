// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Playhead
//! positions are printed in seconds of timeline time.

use std::io::Write;

use stacked_cards_core::trace::{
    ActivationEvent, ActivationMode, BoundaryEvent, GestureToggleEvent, RefreshEvent,
    RequestEvent, TeardownEvent, TraceSink, TweenEndEvent, TweenStartEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn mode_label(mode: ActivationMode) -> String {
    match mode {
        ActivationMode::Enhanced {
            card_count,
            pin_mode,
        } => format!("enhanced cards={card_count} pin={}", pin_mode.as_str()),
        ActivationMode::Static(reason) => format!("static reason={reason:?}"),
        ActivationMode::Existing => "existing".to_owned(),
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_activation(&mut self, e: &ActivationEvent) {
        let _ = writeln!(
            self.writer,
            "[activate] #{} {}",
            e.instance.0,
            mode_label(e.mode),
        );
    }

    fn on_request(&mut self, e: &RequestEvent) {
        let _ = writeln!(
            self.writer,
            "[request] #{} {:?} -> {:?}",
            e.instance.0, e.direction, e.decision,
        );
    }

    fn on_boundary(&mut self, e: &BoundaryEvent) {
        let _ = writeln!(
            self.writer,
            "[boundary] #{} {:?} at {:.3}s",
            e.instance.0, e.direction, e.playhead,
        );
    }

    fn on_tween_start(&mut self, e: &TweenStartEvent) {
        let _ = writeln!(
            self.writer,
            "[tween:start] #{} tween={} {:?} {:.3}s -> {:.3}s",
            e.instance.0, e.tween.0, e.direction, e.from, e.to,
        );
    }

    fn on_tween_complete(&mut self, e: &TweenEndEvent) {
        let _ = writeln!(
            self.writer,
            "[tween:done] #{} tween={} at {:.3}s",
            e.instance.0, e.tween.0, e.position,
        );
    }

    fn on_tween_cancel(&mut self, e: &TweenEndEvent) {
        let _ = writeln!(
            self.writer,
            "[tween:cancel] #{} tween={} at {:.3}s",
            e.instance.0, e.tween.0, e.position,
        );
    }

    fn on_gesture_toggle(&mut self, e: &GestureToggleEvent) {
        let state = if e.enabled { "on" } else { "off" };
        let _ = writeln!(
            self.writer,
            "[gesture] #{} {state} cause={:?} scroll_y={:.1}",
            e.instance.0, e.cause, e.scroll_y,
        );
    }

    fn on_teardown(&mut self, e: &TeardownEvent) {
        let _ = writeln!(
            self.writer,
            "[teardown] #{} enhanced={}",
            e.instance.0, e.was_enhanced,
        );
    }

    fn on_refresh(&mut self, e: &RefreshEvent) {
        let _ = writeln!(
            self.writer,
            "[refresh] roots={} skipped={} evicted={} observed={} activated={}",
            e.roots, e.skipped, e.evicted, e.observed, e.activated,
        );
    }
}
