// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Card poses and the per-index stacking rules.

use kurbo::{Affine, Vec2};

/// Scale of a card that has not been stacked.
pub const REST_SCALE: f64 = 1.0;

/// Smallest scale a stacked card shrinks to (the first card).
pub const BASE_STACKED_SCALE: f64 = 0.85;

/// Scale added per card index when stacked.
pub const STACKED_SCALE_STEP: f64 = 0.05;

/// Upper bound on the stacked scale.
pub const MAX_STACKED_SCALE: f64 = 0.95;

/// Returns the scale card `index` shrinks to once the next card covers it.
///
/// Non-decreasing in `index` and capped at [`MAX_STACKED_SCALE`], so deeper
/// cards in the stack stay visibly smaller than the ones above them.
#[must_use]
pub fn stacked_scale(index: usize) -> f64 {
    #[expect(
        clippy::cast_precision_loss,
        reason = "card counts are tiny compared to f64 mantissa"
    )]
    let i = index as f64;
    (BASE_STACKED_SCALE + STACKED_SCALE_STEP * i).min(MAX_STACKED_SCALE)
}

/// Returns the stacking order of card `index`.
#[must_use]
pub fn z_index(index: usize) -> i32 {
    i32::try_from(index).map_or(i32::MAX, |i| i.saturating_add(1))
}

/// Returns the resting vertical offset of card `index`.
#[must_use]
pub fn resting_offset(index: usize, y_offset_step: f64) -> f64 {
    #[expect(
        clippy::cast_precision_loss,
        reason = "card counts are tiny compared to f64 mantissa"
    )]
    let i = index as f64;
    i * y_offset_step
}

/// The animated visual state of one card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardPose {
    /// Vertical translation in pixels.
    pub y: f64,
    /// Uniform scale, applied around the top-center origin.
    pub scale: f64,
    /// Stacking order.
    pub z_index: i32,
    /// Progress of the background color towards the active color (`0..=1`).
    pub highlight: f64,
}

impl CardPose {
    /// The pose card `index` takes before any step has played.
    #[must_use]
    pub fn resting(index: usize, y_offset_step: f64) -> Self {
        Self {
            y: resting_offset(index, y_offset_step),
            scale: REST_SCALE,
            z_index: z_index(index),
            highlight: 0.0,
        }
    }

    /// Returns the 2D transform for this pose, relative to the transform
    /// origin the presenter sets on the element.
    #[must_use]
    pub fn transform(&self) -> Affine {
        Affine::translate(Vec2::new(0.0, self.y)) * Affine::scale(self.scale)
    }
}

/// Easing curves used by the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Ease {
    /// Constant velocity.
    Linear,
    /// Quadratic ease-out (`1 - (1 - t)^2`).
    #[default]
    Power1Out,
}

impl Ease {
    /// Maps linear progress `t` (clamped to `0..=1`) through the curve.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power1Out => {
                let inv = 1.0 - t;
                1.0 - inv * inv
            }
        }
    }
}
