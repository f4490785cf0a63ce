// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for controllers and the boot manager.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! controller, registry, and boot manager call as things happen. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::config::PinMode;
use crate::controller::{InstanceId, StaticReason};
use crate::machine::{Decision, Direction};
use crate::pin::PinEvent;
use crate::tween::TweenId;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// How an activation resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationMode {
    /// Interactive stacking was built.
    Enhanced {
        /// Number of cards on the timeline.
        card_count: usize,
        /// Pin strategy in use.
        pin_mode: PinMode,
    },
    /// The root was left static.
    Static(StaticReason),
    /// The root already had a controller; nothing was built.
    Existing,
}

/// Emitted when a root is activated.
#[derive(Clone, Copy, Debug)]
pub struct ActivationEvent {
    /// Controller identity.
    pub instance: InstanceId,
    /// Outcome of the activation.
    pub mode: ActivationMode,
}

/// Emitted for each step request an enhanced controller receives.
#[derive(Clone, Copy, Debug)]
pub struct RequestEvent {
    /// Controller identity.
    pub instance: InstanceId,
    /// Requested direction.
    pub direction: Direction,
    /// What the state machine decided.
    pub decision: Decision,
}

/// Emitted when a request has no label to go to.
#[derive(Clone, Copy, Debug)]
pub struct BoundaryEvent {
    /// Controller identity.
    pub instance: InstanceId,
    /// Direction that ran out of labels.
    pub direction: Direction,
    /// Playhead position in seconds.
    pub playhead: f64,
}

/// Emitted when a tween starts.
#[derive(Clone, Copy, Debug)]
pub struct TweenStartEvent {
    /// Controller identity.
    pub instance: InstanceId,
    /// Tween identity.
    pub tween: TweenId,
    /// Direction of travel.
    pub direction: Direction,
    /// Starting playhead position.
    pub from: f64,
    /// Target label position.
    pub to: f64,
}

/// Emitted when a tween ends, either by completing or by being cancelled.
#[derive(Clone, Copy, Debug)]
pub struct TweenEndEvent {
    /// Controller identity.
    pub instance: InstanceId,
    /// Tween identity.
    pub tween: TweenId,
    /// Playhead position at the end.
    pub position: f64,
}

/// Emitted when a gesture observer is enabled or disabled by the pin trigger.
#[derive(Clone, Copy, Debug)]
pub struct GestureToggleEvent {
    /// Controller identity.
    pub instance: InstanceId,
    /// Boundary crossing that caused the toggle.
    pub cause: PinEvent,
    /// New state.
    pub enabled: bool,
    /// Scroll offset at the time.
    pub scroll_y: f64,
}

/// Emitted when a controller is destroyed for the first time.
#[derive(Clone, Copy, Debug)]
pub struct TeardownEvent {
    /// Controller identity.
    pub instance: InstanceId,
    /// Whether the controller had been enhanced.
    pub was_enhanced: bool,
}

/// Emitted at the end of a boot-manager refresh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshEvent {
    /// Roots found in the document.
    pub roots: usize,
    /// Roots skipped because they are already active.
    pub skipped: usize,
    /// Static roots destroyed for re-evaluation.
    pub evicted: usize,
    /// Roots handed to the visibility observer.
    pub observed: usize,
    /// Roots activated immediately because no observer was available.
    pub activated: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a root is activated.
    fn on_activation(&mut self, e: &ActivationEvent) {
        _ = e;
    }

    /// Called for every step request on an enhanced controller.
    fn on_request(&mut self, e: &RequestEvent) {
        _ = e;
    }

    /// Called when a request runs past the first or last label.
    fn on_boundary(&mut self, e: &BoundaryEvent) {
        _ = e;
    }

    /// Called when a tween starts.
    fn on_tween_start(&mut self, e: &TweenStartEvent) {
        _ = e;
    }

    /// Called when a tween reaches its label.
    fn on_tween_complete(&mut self, e: &TweenEndEvent) {
        _ = e;
    }

    /// Called when a tween is cancelled before reaching its label.
    fn on_tween_cancel(&mut self, e: &TweenEndEvent) {
        _ = e;
    }

    /// Called when the gesture observer is toggled.
    fn on_gesture_toggle(&mut self, e: &GestureToggleEvent) {
        _ = e;
    }

    /// Called when a controller is torn down.
    fn on_teardown(&mut self, e: &TeardownEvent) {
        _ = e;
    }

    /// Called after each boot-manager refresh.
    fn on_refresh(&mut self, e: &RefreshEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Generates a `Tracer` method that forwards one event to the sink.
macro_rules! forward {
    ($(#[$doc:meta])* $name:ident => $sink_method:ident($event:ty)) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$event) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$sink_method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    forward!(
        /// Emits an [`ActivationEvent`].
        activation => on_activation(ActivationEvent)
    );
    forward!(
        /// Emits a [`RequestEvent`].
        request => on_request(RequestEvent)
    );
    forward!(
        /// Emits a [`BoundaryEvent`].
        boundary => on_boundary(BoundaryEvent)
    );
    forward!(
        /// Emits a [`TweenStartEvent`].
        tween_start => on_tween_start(TweenStartEvent)
    );
    forward!(
        /// Emits a completion [`TweenEndEvent`].
        tween_complete => on_tween_complete(TweenEndEvent)
    );
    forward!(
        /// Emits a cancellation [`TweenEndEvent`].
        tween_cancel => on_tween_cancel(TweenEndEvent)
    );
    forward!(
        /// Emits a [`GestureToggleEvent`].
        gesture_toggle => on_gesture_toggle(GestureToggleEvent)
    );
    forward!(
        /// Emits a [`TeardownEvent`].
        teardown => on_teardown(TeardownEvent)
    );
    forward!(
        /// Emits a [`RefreshEvent`].
        refresh => on_refresh(RefreshEvent)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> RequestEvent {
        RequestEvent {
            instance: InstanceId(3),
            direction: Direction::Down,
            decision: Decision::Start(Direction::Down),
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_request(&sample_request());
        sink.on_refresh(&RefreshEvent::default());
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.request(&sample_request());
        tracer.refresh(&RefreshEvent::default());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            requests: Vec<u32>,
        }
        impl TraceSink for RecordingSink {
            fn on_request(&mut self, e: &RequestEvent) {
                self.requests.push(e.instance.0);
            }
        }

        let mut sink = RecordingSink {
            requests: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.request(&sample_request());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.requests, &[3]);
    }
}
