// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The labelled step timeline.
//!
//! A [`StepTimeline`] over `N` cards has `N - 1` steps of equal duration `d`.
//! Step `i` occupies `[i·d, (i+1)·d]` and, eased with
//! [`Ease::Power1Out`](crate::pose::Ease::Power1Out):
//!
//! - scales card `i` from 1 to [`stacked_scale(i)`](crate::pose::stacked_scale)
//!   and blends its background towards the active color,
//! - brings card `i + 1` in from an absolute offset of one viewport height
//!   down to its resting offset.
//!
//! Labels mark step boundaries: `card{i+2}` sits at `i·d` and a trailing
//! `card{N+1}` at `(N-1)·d`. The timeline is always paused; its playhead is
//! moved by [`Tween`](crate::tween::Tween)s between labels.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::pose::{CardPose, Ease, REST_SCALE, resting_offset, stacked_scale, z_index};

/// Label lookups treat positions closer than this as equal.
const LABEL_EPSILON: f64 = 1e-6;

/// A named position on the timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    /// Label name, `card2` through `card{N+1}`.
    pub name: String,
    /// Position in seconds.
    pub time: f64,
}

/// Paused keyframe timeline for one root's cards.
#[derive(Clone, Debug)]
pub struct StepTimeline {
    card_count: usize,
    step_duration: f64,
    y_offset_step: f64,
    entry_offset: f64,
    ease: Ease,
    labels: Vec<Label>,
    playhead: f64,
}

impl StepTimeline {
    /// Builds the timeline for `card_count` cards.
    ///
    /// `entry_offset` is the offset an entering card starts from (one
    /// viewport height). Negative or non-finite step durations are treated
    /// as zero.
    #[must_use]
    pub fn new(card_count: usize, step_duration: f64, y_offset_step: f64, entry_offset: f64) -> Self {
        let step_duration = if step_duration.is_finite() {
            step_duration.max(0.0)
        } else {
            0.0
        };
        let steps = card_count.saturating_sub(1);
        let mut labels = Vec::with_capacity(steps + 1);
        if card_count > 0 {
            for i in 0..=steps {
                #[expect(
                    clippy::cast_precision_loss,
                    reason = "card counts are tiny compared to f64 mantissa"
                )]
                let time = i as f64 * step_duration;
                labels.push(Label {
                    name: format!("card{}", i + 2),
                    time,
                });
            }
        }
        Self {
            card_count,
            step_duration,
            y_offset_step,
            entry_offset,
            ease: Ease::Power1Out,
            labels,
            playhead: 0.0,
        }
    }

    /// Returns the number of cards.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.card_count
    }

    /// Returns the duration of one step in seconds.
    #[must_use]
    pub fn step_duration(&self) -> f64 {
        self.step_duration
    }

    /// Returns the total duration in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        #[expect(
            clippy::cast_precision_loss,
            reason = "card counts are tiny compared to f64 mantissa"
        )]
        let steps = self.card_count.saturating_sub(1) as f64;
        steps * self.step_duration
    }

    /// Returns the offset entering cards start from.
    #[must_use]
    pub fn entry_offset(&self) -> f64 {
        self.entry_offset
    }

    /// Changes the offset entering cards start from, e.g. after the viewport
    /// was resized.
    pub fn set_entry_offset(&mut self, entry_offset: f64) {
        self.entry_offset = entry_offset;
    }

    /// Returns all labels in time order.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Looks a label up by name.
    #[must_use]
    pub fn label(&self, name: &str) -> Option<&Label> {
        self.labels.iter().find(|l| l.name == name)
    }

    /// Returns the playhead position in seconds.
    #[must_use]
    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    /// Moves the playhead, clamped to `0..=duration`.
    pub fn seek(&mut self, time: f64) {
        self.playhead = time.clamp(0.0, self.duration());
    }

    /// Returns the first label strictly after the playhead.
    #[must_use]
    pub fn next_label(&self) -> Option<&Label> {
        self.labels
            .iter()
            .find(|l| l.time > self.playhead + LABEL_EPSILON)
    }

    /// Returns the last label strictly before the playhead.
    #[must_use]
    pub fn previous_label(&self) -> Option<&Label> {
        self.labels
            .iter()
            .rev()
            .find(|l| l.time < self.playhead - LABEL_EPSILON)
    }

    /// Eased progress of step `step` at the current playhead.
    fn step_progress(&self, step: usize) -> f64 {
        if self.step_duration <= 0.0 {
            return 0.0;
        }
        #[expect(
            clippy::cast_precision_loss,
            reason = "card counts are tiny compared to f64 mantissa"
        )]
        let start = step as f64 * self.step_duration;
        self.ease
            .apply((self.playhead - start) / self.step_duration)
    }

    /// Returns the pose of card `index` at the current playhead.
    #[must_use]
    pub fn pose(&self, index: usize) -> CardPose {
        let resting = resting_offset(index, self.y_offset_step);
        let last = self.card_count.saturating_sub(1);

        let (scale, highlight) = if index < last {
            let p = self.step_progress(index);
            (REST_SCALE + (stacked_scale(index) - REST_SCALE) * p, p)
        } else {
            (REST_SCALE, 0.0)
        };

        let y = if index == 0 {
            resting
        } else {
            let p = self.step_progress(index - 1);
            let start = self.entry_offset;
            start + (resting - start) * p
        };

        CardPose {
            y,
            scale,
            z_index: z_index(index),
            highlight,
        }
    }

    /// Returns the poses of all cards at the current playhead.
    pub fn poses(&self) -> impl Iterator<Item = CardPose> + '_ {
        (0..self.card_count).map(|i| self.pose(i))
    }
}
