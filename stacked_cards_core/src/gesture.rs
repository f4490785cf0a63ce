// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wheel and touch intent detection.
//!
//! A [`GestureObserver`] turns raw wheel deltas and touch drags into step
//! requests. Deltas accumulate per direction until their magnitude reaches the
//! tolerance, then fire once and reset; reversing direction discards whatever
//! had accumulated. While enabled, the observer also pins the page: it captures
//! the scroll offset at enable time and asks for it to be restored after every
//! native scroll.

use crate::machine::Direction;

/// Minimum accumulated travel, in pixels, before a gesture fires.
pub const DEFAULT_TOLERANCE: f64 = 10.0;

/// What the host should do with a wheel or touch-move event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureResponse {
    /// The observer is disabled; let the event through untouched.
    Ignored,
    /// Prevent the event's default; optionally request a step.
    Consumed(Option<Direction>),
}

impl GestureResponse {
    /// Returns `true` if the host should call `preventDefault`.
    #[must_use]
    pub fn prevents_default(self) -> bool {
        matches!(self, Self::Consumed(_))
    }

    /// Returns the requested direction, if the gesture fired.
    #[must_use]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::Consumed(d) => d,
            Self::Ignored => None,
        }
    }
}

/// Disabled-by-default gesture observer for one root.
#[derive(Clone, Debug)]
pub struct GestureObserver {
    tolerance: f64,
    enabled: bool,
    killed: bool,
    accumulated: f64,
    saved_scroll: Option<f64>,
    touch_y: Option<f64>,
}

impl GestureObserver {
    /// Creates a disabled observer.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.max(0.0),
            enabled: false,
            killed: false,
            accumulated: 0.0,
            saved_scroll: None,
            touch_y: None,
        }
    }

    /// Returns `true` while enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` once [`kill`](Self::kill) has been called.
    #[must_use]
    pub fn is_killed(&self) -> bool {
        self.killed
    }

    /// Returns the scroll offset captured on enable.
    #[must_use]
    pub fn saved_scroll(&self) -> Option<f64> {
        self.saved_scroll
    }

    /// Enables the observer and captures `scroll_y`.
    ///
    /// Returns `false` (and captures nothing) if already enabled or killed.
    pub fn enable(&mut self, scroll_y: f64) -> bool {
        if self.enabled || self.killed {
            return false;
        }
        self.enabled = true;
        self.accumulated = 0.0;
        self.saved_scroll = Some(scroll_y);
        true
    }

    /// Disables the observer and releases the scroll capture.
    ///
    /// Returns `false` if it was not enabled.
    pub fn disable(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        self.enabled = false;
        self.accumulated = 0.0;
        self.saved_scroll = None;
        self.touch_y = None;
        true
    }

    /// Disables the observer permanently.
    pub fn kill(&mut self) {
        self.disable();
        self.killed = true;
    }

    /// Returns the offset a native scroll to `scroll_y` should be undone to.
    #[must_use]
    pub fn restore_target(&self, scroll_y: f64) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        self.saved_scroll.filter(|saved| *saved != scroll_y)
    }

    /// Handles a wheel event. Positive `delta_y` scrolls down (next card).
    pub fn on_wheel(&mut self, delta_y: f64) -> GestureResponse {
        if !self.enabled {
            return GestureResponse::Ignored;
        }
        GestureResponse::Consumed(self.accumulate(delta_y))
    }

    /// Records where a touch began.
    pub fn on_touch_start(&mut self, y: f64) {
        self.touch_y = self.enabled.then_some(y);
    }

    /// Handles a touch move to `y`. Dragging the finger up requests the next
    /// card, like scrolling down.
    pub fn on_touch_move(&mut self, y: f64) -> GestureResponse {
        if !self.enabled {
            return GestureResponse::Ignored;
        }
        let direction = match self.touch_y.replace(y) {
            Some(last) => self.accumulate(last - y),
            None => None,
        };
        GestureResponse::Consumed(direction)
    }

    /// Forgets the current touch.
    pub fn on_touch_end(&mut self) {
        self.touch_y = None;
    }

    fn accumulate(&mut self, delta: f64) -> Option<Direction> {
        if !delta.is_finite() || delta == 0.0 {
            return None;
        }
        if self.accumulated != 0.0 && (self.accumulated > 0.0) != (delta > 0.0) {
            self.accumulated = 0.0;
        }
        self.accumulated += delta;
        if self.accumulated.abs() < self.tolerance {
            return None;
        }
        let direction = if self.accumulated > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        self.accumulated = 0.0;
        Some(direction)
    }
}

impl Default for GestureObserver {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}
