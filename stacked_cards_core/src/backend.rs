// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for host integrations.
//!
//! The core never touches a document directly. A backend crate provides the
//! following pieces:
//!
//! - **Environment**: Implements [`Environment`] to report the viewport
//!   size, the document scroll offset, and the media queries that force static
//!   mode.
//!
//! - **Presenter**: Implements the [`Presenter`] trait to write a
//!   [`CardStage`]'s changes to the host tree (card transforms, stacking order,
//!   background blend, root markers, pin styling).
//!
//! - **Document**: Implements [`Document`] to enumerate roots, read their
//!   markers and options attribute, describe their structure, and create
//!   presenters and the shared [`VisibilityObserver`].
//!
//! - **Event loop**: Routes wheel, touch, and scroll events plus frame ticks
//!   to the [`BootManager`](crate::boot::BootManager). This is not abstracted
//!   by a trait because listener setup differs fundamentally across hosts.
//!
//! # Crate boundaries
//!
//! `stacked_cards_core` owns the data model, the state machine, the lifecycle,
//! and this contract module. Backend crates depend on `stacked_cards_core` and
//! provide host glue.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::config::MOBILE_MAX_WIDTH;
use crate::stage::{CardStage, StageChanges};

/// Applies evaluated stage changes to a host presentation tree.
///
/// DOM presenters and in-memory test doubles both implement this trait.
///
/// # Frame loop pseudocode
///
/// ```rust,ignore
/// fn on_frame(dt: f64) {
///     // Animate: move the playhead of every in-flight tween
///     let running = boot.tick(dt, tracer);
///
///     // Each controller evaluates its stage and calls
///     // presenter.apply(&stage, &changes) for whatever changed.
///
///     if !running {
///         frame_loop.stop();
///     }
/// }
/// ```
pub trait Presenter {
    /// Applies the given [`StageChanges`] to the backing tree, reading current
    /// values from `stage` as needed.
    fn apply(&mut self, stage: &CardStage, changes: &StageChanges);
}

/// Viewport facts the controller consults.
pub trait Environment {
    /// Returns the viewport width in CSS pixels.
    fn viewport_width(&self) -> f64;

    /// Returns the viewport height in CSS pixels.
    fn viewport_height(&self) -> f64;

    /// Returns the document's vertical scroll offset.
    fn scroll_y(&self) -> f64;

    /// Returns `true` if the user prefers reduced motion.
    fn prefers_reduced_motion(&self) -> bool;

    /// Returns `true` if the mobile breakpoint matches.
    ///
    /// The default compares the viewport width against
    /// [`MOBILE_MAX_WIDTH`]; hosts with real media queries should override it.
    fn is_mobile(&self) -> bool {
        self.viewport_width() <= MOBILE_MAX_WIDTH
    }
}

/// What a root contains, as far as activation is concerned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootStructure {
    /// Whether the pinned region exists.
    pub has_pinned: bool,
    /// Whether the card track exists.
    pub has_track: bool,
    /// Number of cards inside the track.
    pub card_count: usize,
    /// The root's box in document coordinates.
    pub bounds: Rect,
}

impl RootStructure {
    /// Returns `true` if the pinned region and track are both present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.has_pinned && self.has_track
    }
}

/// One visibility change reported by a [`VisibilityObserver`].
#[derive(Clone, Debug, PartialEq)]
pub struct Intersection<R> {
    /// The observed root.
    pub root: R,
    /// Whether the root is within the observer's margin.
    pub is_intersecting: bool,
}

/// Shared observer that reports when roots approach the viewport.
///
/// The host delivers its callbacks to
/// [`BootManager::on_intersections`](crate::boot::BootManager::on_intersections).
pub trait VisibilityObserver<R> {
    /// Starts observing `root`.
    fn observe(&mut self, root: &R);

    /// Stops observing `root`.
    fn unobserve(&mut self, root: &R);

    /// Stops observing everything.
    fn disconnect(&mut self);
}

/// The host document a [`BootManager`](crate::boot::BootManager) manages.
pub trait Document {
    /// Identity of a root element.
    type Root: Clone + PartialEq;
    /// Presenter created per activated root.
    type Presenter: Presenter;
    /// Shared visibility observer.
    type Observer: VisibilityObserver<Self::Root>;

    /// Returns every root in document order.
    fn roots(&self) -> Vec<Self::Root>;

    /// Reads the root's enhancement flag (`None` when absent or unrecognized).
    fn enhanced_marker(&self, root: &Self::Root) -> Option<bool>;

    /// Reads the root's raw options attribute.
    fn options_attribute(&self, root: &Self::Root) -> Option<String>;

    /// Inspects the root's structure.
    fn structure(&self, root: &Self::Root) -> RootStructure;

    /// Creates a presenter that writes to `root` and its cards.
    fn presenter(&self, root: &Self::Root) -> Self::Presenter;

    /// Creates the shared visibility observer with a vertical pre-entry margin.
    ///
    /// Returns `None` if the host has no way to observe visibility, in which
    /// case roots activate as soon as they are discovered.
    fn create_observer(&mut self, margin_px: f64) -> Option<Self::Observer>;
}
