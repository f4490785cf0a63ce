// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for stacked cards.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`StackedCardsBoot`]: `#[wasm_bindgen]` entry object that boots every
//!   root in the document and wires navigation, resize, and input events
//! - [`DomDocument`] / [`DomEnvironment`] / [`DomObserver`]: the core host
//!   traits over the live DOM and `IntersectionObserver`
//! - [`DomPresenter`]: inline-style presentation of one root
//! - [`FrameLoop`]: on-demand `requestAnimationFrame` tick source
//!
//! # Crate features
//!
//! - `console-trace`: logs lifecycle events with `console.debug`.

#![no_std]

extern crate alloc;

mod boot;
#[cfg(feature = "console-trace")]
mod console;
mod dom;
mod presenter;
mod raf;

pub use boot::StackedCardsBoot;
#[cfg(feature = "console-trace")]
pub use console::ConsoleSink;
pub use dom::{DomDocument, DomEnvironment, DomObserver};
pub use presenter::DomPresenter;
pub use raf::FrameLoop;
pub use stacked_cards_core::backend::Presenter;
