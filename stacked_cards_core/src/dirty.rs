// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! [`CardStage`](crate::stage::CardStage) uses multi-channel dirty tracking
//! (via [`understory_dirty`]) so that presenters only touch the elements whose
//! render state actually changed since the last
//! [`evaluate`](crate::stage::CardStage::evaluate).
//!
//! All channels are local-only: cards do not inherit from one another, so no
//! dependency edges are registered and marking a key never propagates.
//!
//! # Keys
//!
//! - [`CARD`] is keyed by card index.
//! - [`MARKERS`] and [`PIN`] describe the root element itself and always use
//!   [`ROOT_KEY`].

use understory_dirty::Channel;

/// Key used for root-level channels.
pub const ROOT_KEY: u32 = 0;

/// A card's pose changed or was cleared.
pub const CARD: Channel = Channel::new(0);

/// The root's enhancement or pin-mode attributes changed.
pub const MARKERS: Channel = Channel::new(1);

/// The root's pin translation or spacing changed.
pub const PIN: Channel = Channel::new(2);
