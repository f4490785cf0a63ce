// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cancellable tweens of a timeline playhead.
//!
//! A [`Tween`] moves a [`StepTimeline`](crate::timeline::StepTimeline)'s
//! playhead linearly from one position to a label, taking as long as the
//! distance covered (the timeline plays at unit speed). It is advanced by frame
//! deltas and reports [`TweenStatus::Complete`] exactly once; a tween that is
//! dropped before then never completes, which is how cancellation is
//! expressed.

use alloc::string::String;
use core::fmt;

/// Identity of a tween, unique within the controller that issued it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u32);

impl fmt::Debug for TweenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TweenId({})", self.0)
    }
}

/// Result of advancing a tween.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenStatus {
    /// Still in flight; carries the new playhead position.
    Running(f64),
    /// Reached its label; carries the final playhead position.
    Complete(f64),
}

/// An in-flight move of the playhead towards a label.
#[derive(Clone, Debug)]
pub struct Tween {
    id: TweenId,
    label: String,
    from: f64,
    to: f64,
    elapsed: f64,
    finished: bool,
}

impl Tween {
    /// Creates a tween from `from` to `to`, targeting `label`.
    #[must_use]
    pub fn new(id: TweenId, label: String, from: f64, to: f64) -> Self {
        Self {
            id,
            label,
            from,
            to,
            elapsed: 0.0,
            finished: false,
        }
    }

    /// Returns the tween's identity.
    #[must_use]
    pub fn id(&self) -> TweenId {
        self.id
    }

    /// Returns the label being tweened to.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the target playhead position.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Returns the tween's duration in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        (self.to - self.from).abs()
    }

    /// Returns the playhead position at the tween's current progress.
    #[must_use]
    pub fn position(&self) -> f64 {
        let duration = self.duration();
        if duration <= 0.0 || self.elapsed >= duration {
            return self.to;
        }
        self.from + (self.to - self.from) * (self.elapsed / duration)
    }

    /// Returns `true` once [`TweenStatus::Complete`] has been reported.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advances by `dt` seconds.
    ///
    /// Completion is reported on the first call that reaches the target;
    /// later calls keep returning [`TweenStatus::Running`] at the target so a
    /// caller that forgets to drop the tween cannot observe a second
    /// completion.
    pub fn advance(&mut self, dt: f64) -> TweenStatus {
        if self.finished {
            return TweenStatus::Running(self.to);
        }
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        if self.elapsed >= self.duration() {
            self.finished = true;
            TweenStatus::Complete(self.to)
        } else {
            TweenStatus::Running(self.position())
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    fn tween(from: f64, to: f64) -> Tween {
        Tween::new(TweenId(1), "card3".to_string(), from, to)
    }

    #[test]
    fn duration_is_distance() {
        assert_eq!(tween(0.0, 0.5).duration(), 0.5);
        assert_eq!(tween(1.0, 0.25).duration(), 0.75);
    }

    #[test]
    fn advances_linearly_then_completes_once() {
        let mut t = tween(0.0, 0.5);
        assert_eq!(t.advance(0.25), TweenStatus::Running(0.25));
        assert_eq!(t.advance(0.5), TweenStatus::Complete(0.5));
        assert!(t.is_finished());
        assert_eq!(t.advance(0.1), TweenStatus::Running(0.5));
    }

    #[test]
    fn backwards_tween() {
        let mut t = tween(1.0, 0.5);
        assert_eq!(t.advance(0.125), TweenStatus::Running(0.875));
        assert_eq!(t.advance(0.375), TweenStatus::Complete(0.5));
    }

    #[test]
    fn zero_length_completes_on_first_advance() {
        let mut t = tween(0.5, 0.5);
        assert_eq!(t.advance(0.0), TweenStatus::Complete(0.5));
    }

    #[test]
    fn ignores_bogus_deltas() {
        let mut t = tween(0.0, 0.5);
        assert_eq!(t.advance(f64::NAN), TweenStatus::Running(0.0));
        assert_eq!(t.advance(-1.0), TweenStatus::Running(0.0));
    }
}
