// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Direction state machine.
//!
//! [`StepMachine`] decides what a step request means given what is already
//! in flight. It knows nothing about labels or tweens; the
//! [controller](crate::controller) resolves a [`Decision`] into timeline work
//! and reports back with [`started`](StepMachine::started) and
//! [`completed`](StepMachine::completed).
//!
//! ```text
//!                  request(d) / Start(d)
//!   ┌──────┐ ──────────────────────────────► ┌────────────────┐
//!   │ idle │                                 │ animating(d)   │ ◄─┐ request(d)
//!   └──────┘ ◄────────────────────────────── └────────────────┘ ──┘ / Queue
//!               completed() [drains queue]       │
//!                                                │ request(d') / Redirect(d')
//!                                                ▼
//!                                   idle, queue cleared, then Start(d')
//! ```
//!
//! A queued direction can only ever equal the direction currently animating:
//! an opposite request redirects instead of queueing.

/// Which way a step request moves through the cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Back towards the previous card (wheel up, finger down).
    Up,
    /// On towards the next card (wheel down, finger up).
    Down,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Whether a tween is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A tween in the given direction is in flight.
    Animating(Direction),
}

/// What the caller must do in response to a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Start a tween in this direction (the machine was idle).
    Start(Direction),
    /// Nothing now; the direction has been queued behind the current tween.
    Queue(Direction),
    /// Cancel the in-flight tween without completing it, then start a tween
    /// in this direction. The machine is already idle with an empty queue.
    Redirect(Direction),
}

/// Direction state of one controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepMachine {
    phase: Phase,
    queued: Option<Direction>,
}

impl StepMachine {
    /// Creates an idle machine.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            queued: None,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the queued direction, if any.
    #[must_use]
    pub const fn queued(&self) -> Option<Direction> {
        self.queued
    }

    /// Returns `true` while a tween is in flight.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Animating(_))
    }

    /// Handles a step request.
    pub fn request(&mut self, direction: Direction) -> Decision {
        match self.phase {
            Phase::Idle => Decision::Start(direction),
            Phase::Animating(current) if current == direction => {
                self.queued = Some(direction);
                Decision::Queue(direction)
            }
            Phase::Animating(_) => {
                self.queued = None;
                self.phase = Phase::Idle;
                Decision::Redirect(direction)
            }
        }
    }

    /// Records that a tween in `direction` is now in flight.
    pub fn started(&mut self, direction: Direction) {
        self.phase = Phase::Animating(direction);
    }

    /// Records that the in-flight tween finished and returns the queued
    /// direction to start next, if any. The queue is emptied either way.
    pub fn completed(&mut self) -> Option<Direction> {
        self.phase = Phase::Idle;
        self.queued.take()
    }

    /// Returns to idle with an empty queue.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
