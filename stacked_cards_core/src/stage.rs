// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render state of one root and its cards.
//!
//! A [`CardStage`] holds everything a presenter writes to the host tree for a
//! single root:
//!
//! - one optional [`CardPose`] per card (`None` means "unanimated": the
//!   presenter clears whatever it set before),
//! - the root's enhancement flag and pin mode attributes,
//! - the root's pin translation and reserved spacing.
//!
//! Setters mark the matching [`dirty`](crate::dirty) channel only when the
//! value actually changes, and [`evaluate`](CardStage::evaluate) drains the
//! channels into a [`StageChanges`] for
//! [`Presenter::apply`](crate::backend::Presenter::apply).

use alloc::vec;
use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker};

use crate::color::Rgba;
use crate::config::PinMode;
use crate::dirty;
use crate::pose::CardPose;

/// Pin styling applied to the root in [`PinMode::Gsap`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinStyle {
    /// Downward translation that keeps the root in place, in pixels.
    pub offset: f64,
    /// Space reserved after the root for the pinned scroll distance.
    pub spacing: f64,
}

/// The set of changes produced by a single [`CardStage::evaluate`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StageChanges {
    /// Indices of cards whose pose changed or was cleared.
    pub cards: Vec<u32>,
    /// Whether the root's marker attributes changed.
    pub markers: bool,
    /// Whether the root's pin styling changed.
    pub pin: bool,
}

impl StageChanges {
    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && !self.markers && !self.pin
    }
}

/// Render state for one root.
pub struct CardStage {
    poses: Vec<Option<CardPose>>,
    active_color: Rgba,
    enhanced: Option<bool>,
    pin_mode: Option<PinMode>,
    pin: Option<PinStyle>,
    dirty: DirtyTracker<u32>,
}

impl core::fmt::Debug for CardStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CardStage")
            .field("poses", &self.poses)
            .field("active_color", &self.active_color)
            .field("enhanced", &self.enhanced)
            .field("pin_mode", &self.pin_mode)
            .field("pin", &self.pin)
            .finish_non_exhaustive()
    }
}

impl CardStage {
    /// Creates a stage for `card_count` unanimated cards and an unmarked root.
    #[must_use]
    pub fn new(card_count: usize) -> Self {
        Self {
            poses: vec![None; card_count],
            active_color: Rgba::TRANSPARENT,
            enhanced: None,
            pin_mode: None,
            pin: None,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        }
    }

    /// Returns the number of cards.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.poses.len()
    }

    /// Returns the pose of card `idx`, or `None` if it is unanimated or out of
    /// range.
    #[must_use]
    pub fn pose(&self, idx: u32) -> Option<CardPose> {
        self.poses.get(idx as usize).copied().flatten()
    }

    /// Returns all card poses in index order.
    #[must_use]
    pub fn poses(&self) -> &[Option<CardPose>] {
        &self.poses
    }

    /// Sets the pose of card `idx`. Out-of-range indices are ignored.
    pub fn set_pose(&mut self, idx: u32, pose: CardPose) {
        self.replace_pose(idx, Some(pose));
    }

    /// Returns every card to its unanimated state.
    pub fn clear_poses(&mut self) {
        for idx in 0..self.poses.len() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "card counts fit in u32"
            )]
            self.replace_pose(idx as u32, None);
        }
    }

    fn replace_pose(&mut self, idx: u32, pose: Option<CardPose>) {
        let Some(slot) = self.poses.get_mut(idx as usize) else {
            return;
        };
        if *slot != pose {
            *slot = pose;
            self.dirty.mark(idx, dirty::CARD);
        }
    }

    /// Returns the color stacked cards blend towards.
    #[must_use]
    pub fn active_color(&self) -> Rgba {
        self.active_color
    }

    /// Sets the color stacked cards blend towards, re-presenting every posed
    /// card if it changed.
    pub fn set_active_color(&mut self, color: Rgba) {
        if self.active_color == color {
            return;
        }
        self.active_color = color;
        for (idx, pose) in self.poses.iter().enumerate() {
            if pose.is_some() {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "card counts fit in u32"
                )]
                self.dirty.mark(idx as u32, dirty::CARD);
            }
        }
    }

    /// Returns the enhancement flag (`None` when the attribute is absent).
    #[must_use]
    pub fn enhanced(&self) -> Option<bool> {
        self.enhanced
    }

    /// Returns the pin mode attribute (`None` when absent).
    #[must_use]
    pub fn pin_mode(&self) -> Option<PinMode> {
        self.pin_mode
    }

    /// Sets both root marker attributes.
    pub fn set_markers(&mut self, enhanced: Option<bool>, pin_mode: Option<PinMode>) {
        if self.enhanced != enhanced || self.pin_mode != pin_mode {
            self.enhanced = enhanced;
            self.pin_mode = pin_mode;
            self.dirty.mark(dirty::ROOT_KEY, dirty::MARKERS);
        }
    }

    /// Returns the pin styling, if any.
    #[must_use]
    pub fn pin(&self) -> Option<PinStyle> {
        self.pin
    }

    /// Sets or clears the pin styling.
    pub fn set_pin(&mut self, pin: Option<PinStyle>) {
        if self.pin != pin {
            self.pin = pin;
            self.dirty.mark(dirty::ROOT_KEY, dirty::PIN);
        }
    }

    /// Drains all dirty channels and returns what changed.
    pub fn evaluate(&mut self) -> StageChanges {
        let cards: Vec<u32> = self
            .dirty
            .drain(dirty::CARD)
            .affected()
            .deterministic()
            .run()
            .collect();
        let markers: Vec<u32> = self
            .dirty
            .drain(dirty::MARKERS)
            .affected()
            .deterministic()
            .run()
            .collect();
        let pin: Vec<u32> = self
            .dirty
            .drain(dirty::PIN)
            .affected()
            .deterministic()
            .run()
            .collect();
        StageChanges {
            cards,
            markers: !markers.is_empty(),
            pin: !pin.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(y: f64) -> CardPose {
        CardPose {
            y,
            scale: 1.0,
            z_index: 1,
            highlight: 0.0,
        }
    }

    #[test]
    fn new_stage_has_no_changes() {
        let mut stage = CardStage::new(3);
        assert!(stage.evaluate().is_empty());
        assert_eq!(stage.poses(), &[None, None, None]);
    }

    #[test]
    fn set_pose_marks_only_on_change() {
        let mut stage = CardStage::new(3);
        stage.set_pose(1, pose(10.0));
        let changes = stage.evaluate();
        assert_eq!(changes.cards, &[1]);

        stage.set_pose(1, pose(10.0));
        assert!(stage.evaluate().is_empty(), "same pose is not a change");

        stage.set_pose(7, pose(10.0));
        assert!(stage.evaluate().is_empty(), "out of range is ignored");
    }

    #[test]
    fn evaluate_reports_each_card_once_and_drains() {
        let mut stage = CardStage::new(3);
        stage.set_pose(2, pose(10.0));
        stage.set_pose(0, pose(0.0));
        stage.set_pose(2, pose(20.0));
        stage.set_active_color(Rgba::new(1, 2, 3, 1.0));

        let mut cards = stage.evaluate().cards;
        cards.sort_unstable();
        assert_eq!(cards, &[0, 2]);
        assert!(stage.evaluate().is_empty());
    }

    #[test]
    fn clear_poses_marks_previously_posed_cards() {
        let mut stage = CardStage::new(3);
        stage.set_pose(0, pose(0.0));
        stage.set_pose(2, pose(40.0));
        let _ = stage.evaluate();

        stage.clear_poses();
        let mut cards = stage.evaluate().cards;
        cards.sort_unstable();
        assert_eq!(cards, &[0, 2]);
        assert_eq!(stage.pose(0), None);
    }

    #[test]
    fn markers_and_pin_are_tracked_separately() {
        let mut stage = CardStage::new(1);
        stage.set_markers(Some(true), Some(PinMode::Gsap));
        let changes = stage.evaluate();
        assert!(changes.markers);
        assert!(!changes.pin);

        stage.set_pin(Some(PinStyle {
            offset: 5.0,
            spacing: 100.0,
        }));
        let changes = stage.evaluate();
        assert!(!changes.markers);
        assert!(changes.pin);

        stage.set_markers(Some(true), Some(PinMode::Gsap));
        assert!(stage.evaluate().is_empty());
    }

    #[test]
    fn active_color_change_repaints_posed_cards() {
        let mut stage = CardStage::new(2);
        stage.set_pose(0, pose(0.0));
        let _ = stage.evaluate();

        stage.set_active_color(Rgba::new(1, 2, 3, 1.0));
        assert_eq!(stage.evaluate().cards, &[0]);
    }
}
