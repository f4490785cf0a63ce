// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction core for scroll-driven stacked cards.
//!
//! `stacked_cards_core` owns everything about a stacked-cards widget that does
//! not touch a browser: option parsing, the step timeline, tweens between
//! timeline labels, the gesture observer, the scroll-pin trigger, the
//! direction state machine, and the per-document lifecycle. It is `no_std`
//! compatible (with `alloc`); platform backends implement the traits in
//! [`backend`] and drive the types here from their event loop.
//!
//! # Architecture
//!
//! ```text
//!   Document::roots() ──► BootManager::refresh() ──► VisibilityObserver
//!                                                          │ (intersecting)
//!                 ┌────────────────────────────────────────┘
//!                 ▼
//!   Registry::activate() ──► StackedCards (static | enhanced)
//!                                 │
//!        wheel / touch / scroll ──┤──► StepMachine ──► Tween ──► StepTimeline
//!                                 │                                   │
//!                                 ▼                                   ▼
//!                         Presenter::apply() ◄── StageChanges ◄── CardStage
//! ```
//!
//! **[`controller`]**: The instance controller. Decides between static and
//! enhanced mode, owns the timeline, tween, gesture observer, and pin
//! trigger of one root, and tears them down idempotently.
//!
//! **[`machine`]**: The direction state machine (`idle` / `animating`)
//! with same-direction queueing and instant reversal.
//!
//! **[`timeline`]** / **[`tween`]**: The labelled step timeline and the
//! cancellable tweens that move its playhead between labels.
//!
//! **[`gesture`]** / **[`pin`]**: Wheel and touch intent detection with a
//! tolerance, and the scroll range that enables it.
//!
//! **[`stage`]**: Per-card render state with dirty tracking, consumed by a
//! [`Presenter`](backend::Presenter).
//!
//! **[`registry`]** / **[`boot`]**: The root-to-controller side-table and
//! the lazy, visibility-driven lifecycle manager.
//!
//! **[`config`]**: Options, defaults, and tolerant override parsing.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod boot;
pub mod color;
pub mod config;
pub mod controller;
pub mod dirty;
pub mod gesture;
pub mod machine;
pub mod pin;
pub mod pose;
pub mod registry;
pub mod stage;
pub mod timeline;
pub mod trace;
pub mod tween;
