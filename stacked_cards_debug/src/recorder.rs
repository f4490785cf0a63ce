// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps every event it receives
//! as a [`RecordedEvent`], in arrival order.

use stacked_cards_core::controller::InstanceId;
use stacked_cards_core::trace::{
    ActivationEvent, BoundaryEvent, GestureToggleEvent, RefreshEvent, RequestEvent, TeardownEvent,
    TraceSink, TweenEndEvent, TweenStartEvent,
};

/// One recorded trace event.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// See [`TraceSink::on_activation`].
    Activation(ActivationEvent),
    /// See [`TraceSink::on_request`].
    Request(RequestEvent),
    /// See [`TraceSink::on_boundary`].
    Boundary(BoundaryEvent),
    /// See [`TraceSink::on_tween_start`].
    TweenStart(TweenStartEvent),
    /// See [`TraceSink::on_tween_complete`].
    TweenComplete(TweenEndEvent),
    /// See [`TraceSink::on_tween_cancel`].
    TweenCancel(TweenEndEvent),
    /// See [`TraceSink::on_gesture_toggle`].
    GestureToggle(GestureToggleEvent),
    /// See [`TraceSink::on_teardown`].
    Teardown(TeardownEvent),
    /// See [`TraceSink::on_refresh`].
    Refresh(RefreshEvent),
}

impl RecordedEvent {
    /// Short event name, as used by the exporters.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Activation(_) => "activation",
            Self::Request(_) => "request",
            Self::Boundary(_) => "boundary",
            Self::TweenStart(_) => "tween_start",
            Self::TweenComplete(_) => "tween_complete",
            Self::TweenCancel(_) => "tween_cancel",
            Self::GestureToggle(_) => "gesture_toggle",
            Self::Teardown(_) => "teardown",
            Self::Refresh(_) => "refresh",
        }
    }

    /// The controller the event belongs to; `None` for document-wide events.
    #[must_use]
    pub fn instance(&self) -> Option<InstanceId> {
        match self {
            Self::Activation(e) => Some(e.instance),
            Self::Request(e) => Some(e.instance),
            Self::Boundary(e) => Some(e.instance),
            Self::TweenStart(e) => Some(e.instance),
            Self::TweenComplete(e) | Self::TweenCancel(e) => Some(e.instance),
            Self::GestureToggle(e) => Some(e.instance),
            Self::Teardown(e) => Some(e.instance),
            Self::Refresh(_) => None,
        }
    }

    /// Delivers the event to `sink` again.
    pub fn replay(&self, sink: &mut dyn TraceSink) {
        match self {
            Self::Activation(e) => sink.on_activation(e),
            Self::Request(e) => sink.on_request(e),
            Self::Boundary(e) => sink.on_boundary(e),
            Self::TweenStart(e) => sink.on_tween_start(e),
            Self::TweenComplete(e) => sink.on_tween_complete(e),
            Self::TweenCancel(e) => sink.on_tween_cancel(e),
            Self::GestureToggle(e) => sink.on_gesture_toggle(e),
            Self::Teardown(e) => sink.on_teardown(e),
            Self::Refresh(e) => sink.on_refresh(e),
        }
    }
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Returns the events recorded for one controller.
    pub fn for_instance(&self, id: InstanceId) -> impl Iterator<Item = &RecordedEvent> {
        self.events.iter().filter(move |e| e.instance() == Some(id))
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for RecorderSink {
    fn on_activation(&mut self, e: &ActivationEvent) {
        self.events.push(RecordedEvent::Activation(*e));
    }

    fn on_request(&mut self, e: &RequestEvent) {
        self.events.push(RecordedEvent::Request(*e));
    }

    fn on_boundary(&mut self, e: &BoundaryEvent) {
        self.events.push(RecordedEvent::Boundary(*e));
    }

    fn on_tween_start(&mut self, e: &TweenStartEvent) {
        self.events.push(RecordedEvent::TweenStart(*e));
    }

    fn on_tween_complete(&mut self, e: &TweenEndEvent) {
        self.events.push(RecordedEvent::TweenComplete(*e));
    }

    fn on_tween_cancel(&mut self, e: &TweenEndEvent) {
        self.events.push(RecordedEvent::TweenCancel(*e));
    }

    fn on_gesture_toggle(&mut self, e: &GestureToggleEvent) {
        self.events.push(RecordedEvent::GestureToggle(*e));
    }

    fn on_teardown(&mut self, e: &TeardownEvent) {
        self.events.push(RecordedEvent::Teardown(*e));
    }

    fn on_refresh(&mut self, e: &RefreshEvent) {
        self.events.push(RecordedEvent::Refresh(*e));
    }
}
