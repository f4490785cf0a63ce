// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-range trigger that pins a root.
//!
//! A [`PinTrigger`] watches the document scroll offset against a
//! [`TriggerBounds`] range and reports boundary crossings as [`PinEvent`]s.
//! Those events are what enable and disable a root's
//! [`GestureObserver`](crate::gesture::GestureObserver).
//!
//! # Position syntax
//!
//! Bounds are written the way the options attribute carries them:
//!
//! - `"<element edge> <viewport edge>"`, where each edge is `top`, `center`,
//!   `bottom`, a percentage of the respective height (`20%`), or a pixel
//!   amount (`80px` or `80`). The range starts when the element edge meets
//!   the viewport edge.
//! - A single number is an absolute scroll offset.
//! - For the end only, `"+=N"` or `"+=N%"` (percent of the viewport height)
//!   is relative to the start.
//!
//! Strings that do not parse fall back to the defaults in
//! [`AnimationOptions`](crate::config::AnimationOptions).

use kurbo::Rect;

use crate::config::{AnimationOptions, PinMode};
use crate::stage::PinStyle;

/// A boundary crossing of the trigger range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PinEvent {
    /// Scrolled forward into the range.
    Enter,
    /// Scrolled forward past the end.
    Leave,
    /// Scrolled backward into the range from past the end.
    EnterBack,
    /// Scrolled backward before the start.
    LeaveBack,
}

impl PinEvent {
    /// Returns `true` for events that put the scroll offset inside the range.
    #[must_use]
    pub const fn is_entering(self) -> bool {
        matches!(self, Self::Enter | Self::EnterBack)
    }
}

/// Absolute scroll offsets delimiting the pinned range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerBounds {
    /// Scroll offset where the range begins.
    pub start: f64,
    /// Scroll offset where the range ends (never before `start`).
    pub end: f64,
}

impl TriggerBounds {
    /// Resolves `start`/`end` against the root's document-space box and the
    /// viewport height.
    #[must_use]
    pub fn resolve(start: &str, end: &str, root: Rect, viewport_height: f64) -> Self {
        let start = parse_absolute(start, root, viewport_height)
            .or_else(|| parse_absolute(AnimationOptions::DEFAULT_START, root, viewport_height))
            .unwrap_or(root.y0);
        let end = parse_end(end, start, root, viewport_height)
            .or_else(|| parse_end(AnimationOptions::DEFAULT_END, start, root, viewport_height))
            .unwrap_or(start);
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Returns the pinned scroll distance.
    #[must_use]
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    /// Returns `true` if the range has no extent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() <= 0.0
    }
}

fn parse_end(s: &str, start: f64, root: Rect, viewport_height: f64) -> Option<f64> {
    match s.trim().strip_prefix("+=") {
        Some(rel) => Some(start + parse_length(rel, viewport_height)?),
        None => parse_absolute(s, root, viewport_height),
    }
}

fn parse_absolute(s: &str, root: Rect, viewport_height: f64) -> Option<f64> {
    let mut tokens = s.split_whitespace();
    let first = tokens.next()?;
    match (tokens.next(), tokens.next()) {
        (None, _) => parse_length(first, 0.0).filter(|_| !first.ends_with('%')),
        (Some(second), None) => {
            let element = parse_edge(first, root.height())?;
            let viewport = parse_edge(second, viewport_height)?;
            Some(root.y0 + element - viewport)
        }
        (Some(_), Some(_)) => None,
    }
}

fn parse_edge(token: &str, extent: f64) -> Option<f64> {
    match token {
        "top" => Some(0.0),
        "center" => Some(extent / 2.0),
        "bottom" => Some(extent),
        _ => parse_length(token, extent),
    }
}

/// Parses `N`, `Npx`, or `N%` (of `extent`).
fn parse_length(token: &str, extent: f64) -> Option<f64> {
    let token = token.trim();
    let value = if let Some(pct) = token.strip_suffix('%') {
        pct.parse::<f64>().ok()? / 100.0 * extent
    } else {
        token
            .strip_suffix("px")
            .unwrap_or(token)
            .parse::<f64>()
            .ok()?
    };
    value.is_finite().then_some(value)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Zone {
    Before,
    Active,
    After,
}

/// Scroll-driven pin trigger for one root.
#[derive(Clone, Debug)]
pub struct PinTrigger {
    bounds: TriggerBounds,
    mode: PinMode,
    zone: Option<Zone>,
    killed: bool,
}

impl PinTrigger {
    /// Creates a trigger. No event fires until the first
    /// [`update`](Self::update).
    #[must_use]
    pub fn new(bounds: TriggerBounds, mode: PinMode) -> Self {
        Self {
            bounds,
            mode,
            zone: None,
            killed: false,
        }
    }

    /// Returns the resolved bounds.
    #[must_use]
    pub fn bounds(&self) -> TriggerBounds {
        self.bounds
    }

    /// Replaces the bounds after a layout change.
    ///
    /// The last seen zone is kept, so the next [`update`](Self::update)
    /// reports whatever boundary the new bounds put between it and the new
    /// offset.
    pub fn set_bounds(&mut self, bounds: TriggerBounds) {
        self.bounds = bounds;
    }

    /// Returns the pin mode.
    #[must_use]
    pub fn mode(&self) -> PinMode {
        self.mode
    }

    /// Returns `true` while the last seen scroll offset is inside the range.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.zone == Some(Zone::Active)
    }

    /// Returns `true` once [`kill`](Self::kill) has been called.
    #[must_use]
    pub fn is_killed(&self) -> bool {
        self.killed
    }

    fn zone_of(&self, scroll_y: f64) -> Zone {
        if scroll_y < self.bounds.start {
            Zone::Before
        } else if scroll_y > self.bounds.end {
            Zone::After
        } else {
            Zone::Active
        }
    }

    /// Feeds a scroll offset and reports the boundary crossed, if any.
    ///
    /// The first update reports [`PinEvent::Enter`] if it lands inside the
    /// range. Jumping over the whole range reports only the final side.
    pub fn update(&mut self, scroll_y: f64) -> Option<PinEvent> {
        if self.killed || !scroll_y.is_finite() {
            return None;
        }
        let next = self.zone_of(scroll_y);
        let prev = self.zone.replace(next);
        match (prev, next) {
            (None, Zone::Active) | (Some(Zone::Before), Zone::Active) => Some(PinEvent::Enter),
            (Some(Zone::After), Zone::Active) => Some(PinEvent::EnterBack),
            (Some(Zone::Before | Zone::Active), Zone::After) => Some(PinEvent::Leave),
            (Some(Zone::After | Zone::Active), Zone::Before) => Some(PinEvent::LeaveBack),
            _ => None,
        }
    }

    /// Returns the root styling for `scroll_y`.
    ///
    /// In [`PinMode::Gsap`] the root is translated by how far the range has
    /// been scrolled (clamped to the range) and the range length is reserved
    /// after it. [`PinMode::Sticky`] leaves pinning to host CSS.
    #[must_use]
    pub fn pin_style(&self, scroll_y: f64) -> Option<PinStyle> {
        if self.killed || self.mode != PinMode::Gsap {
            return None;
        }
        let len = self.bounds.len().max(0.0);
        Some(PinStyle {
            offset: (scroll_y - self.bounds.start).clamp(0.0, len),
            spacing: len,
        })
    }

    /// Stops reporting events and styling.
    pub fn kill(&mut self) {
        self.killed = true;
        self.zone = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 600px tall root whose top sits 2000px down the document.
    fn root() -> Rect {
        Rect::new(0.0, 2000.0, 1280.0, 2600.0)
    }

    #[test]
    fn default_bounds() {
        let b = TriggerBounds::resolve("top 20%", "+=100", root(), 900.0);
        assert_eq!(b.start, 2000.0 - 180.0);
        assert_eq!(b.end, b.start + 100.0);
        assert_eq!(b.len(), 100.0);
    }

    #[test]
    fn edge_keywords_and_units() {
        let b = TriggerBounds::resolve("center center", "bottom top", root(), 900.0);
        assert_eq!(b.start, 2000.0 + 300.0 - 450.0);
        assert_eq!(b.end, 2600.0);

        let b = TriggerBounds::resolve("top 80px", "+=50%", root(), 900.0);
        assert_eq!(b.start, 1920.0);
        assert_eq!(b.end, 1920.0 + 450.0);

        let b = TriggerBounds::resolve("1500", "+=10px", root(), 900.0);
        assert_eq!(b.start, 1500.0);
        assert_eq!(b.end, 1510.0);
    }

    #[test]
    fn unparsable_positions_use_defaults() {
        let fallback = TriggerBounds::resolve("top 20%", "+=100", root(), 900.0);
        assert_eq!(
            TriggerBounds::resolve("sideways", "+=lots", root(), 900.0),
            fallback
        );
        assert_eq!(
            TriggerBounds::resolve("top 20% extra", "", root(), 900.0),
            fallback
        );
    }

    #[test]
    fn end_never_precedes_start() {
        let b = TriggerBounds::resolve("top top", "+=-400", root(), 900.0);
        assert_eq!(b.end, b.start);
        assert!(b.is_empty());
    }

    #[test]
    fn events_follow_scroll_direction() {
        let bounds = TriggerBounds {
            start: 100.0,
            end: 200.0,
        };
        let mut t = PinTrigger::new(bounds, PinMode::Gsap);
        assert_eq!(t.update(0.0), None);
        assert_eq!(t.update(150.0), Some(PinEvent::Enter));
        assert!(t.is_active());
        assert_eq!(t.update(160.0), None);
        assert_eq!(t.update(250.0), Some(PinEvent::Leave));
        assert_eq!(t.update(199.0), Some(PinEvent::EnterBack));
        assert_eq!(t.update(50.0), Some(PinEvent::LeaveBack));
        assert_eq!(t.update(500.0), Some(PinEvent::Leave), "jump over the range");
    }

    #[test]
    fn first_update_inside_range_enters() {
        let bounds = TriggerBounds {
            start: 100.0,
            end: 200.0,
        };
        let mut t = PinTrigger::new(bounds, PinMode::Sticky);
        assert_eq!(t.update(120.0), Some(PinEvent::Enter));
    }

    #[test]
    fn gsap_pin_keeps_root_in_place_through_the_range() {
        let bounds = TriggerBounds {
            start: 100.0,
            end: 200.0,
        };
        let t = PinTrigger::new(bounds, PinMode::Gsap);
        // Root top on screen = document top - scroll + offset.
        let doc_top = 300.0;
        let on_screen = |scroll: f64| doc_top - scroll + t.pin_style(scroll).unwrap().offset;
        let pinned = on_screen(100.0);
        for scroll in [110.0, 137.5, 160.0, 199.9, 200.0] {
            assert!((on_screen(scroll) - pinned).abs() < 1.0);
        }
        assert_eq!(t.pin_style(50.0).unwrap().offset, 0.0);
        assert_eq!(t.pin_style(900.0).unwrap().offset, 100.0);
        assert_eq!(t.pin_style(900.0).unwrap().spacing, 100.0);
    }

    #[test]
    fn sticky_and_killed_triggers_do_not_style() {
        let bounds = TriggerBounds {
            start: 0.0,
            end: 100.0,
        };
        assert_eq!(PinTrigger::new(bounds, PinMode::Sticky).pin_style(50.0), None);

        let mut t = PinTrigger::new(bounds, PinMode::Gsap);
        t.kill();
        assert_eq!(t.pin_style(50.0), None);
        assert_eq!(t.update(50.0), None);
    }
}
