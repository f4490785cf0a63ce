// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM presentation of one root.
//!
//! Translates [`CardStage`] state into inline styles and attributes on a root
//! and its card elements by applying incremental updates from
//! [`StageChanges`].

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Affine;
use stacked_cards_core::backend::Presenter;
use stacked_cards_core::color::Rgba;
use stacked_cards_core::config::{ENHANCED_ATTRIBUTE, PIN_MODE_ATTRIBUTE};
use stacked_cards_core::stage::{CardStage, StageChanges};
use web_sys::HtmlElement;

/// Inline properties a posed card owns and removes again when cleared.
const CARD_PROPERTIES: [&str; 4] = ["transform", "transform-origin", "z-index", "background-color"];

/// Inline properties the root owns while pinned.
const PIN_PROPERTIES: [&str; 2] = ["transform", "margin-bottom"];

/// Writes a [`CardStage`] to a root element and its cards.
///
/// Card background colors blend from the color each card had before it was
/// first presented towards the stage's active color.
pub struct DomPresenter {
    root: HtmlElement,
    cards: Vec<HtmlElement>,
    base_colors: Vec<Rgba>,
}

impl core::fmt::Debug for DomPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomPresenter")
            .field("root", &"HtmlElement")
            .field("cards_len", &self.cards.len())
            .field("base_colors", &self.base_colors)
            .finish()
    }
}

impl DomPresenter {
    /// Creates a presenter for `root` and its `cards` in index order.
    ///
    /// `base_colors` are the cards' unanimated background colors; missing
    /// entries are treated as transparent.
    #[must_use]
    pub fn new(root: HtmlElement, cards: Vec<HtmlElement>, base_colors: Vec<Rgba>) -> Self {
        Self {
            root,
            cards,
            base_colors,
        }
    }

    /// Returns the root element.
    #[must_use]
    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    /// Returns the card element at `idx`, if it exists.
    #[must_use]
    pub fn card(&self, idx: u32) -> Option<&HtmlElement> {
        self.cards.get(idx as usize)
    }

    fn base_color(&self, idx: u32) -> Rgba {
        self.base_colors
            .get(idx as usize)
            .copied()
            .unwrap_or(Rgba::TRANSPARENT)
    }
}

impl Presenter for DomPresenter {
    fn apply(&mut self, stage: &CardStage, changes: &StageChanges) {
        // 1. Root markers
        if changes.markers {
            let _ = match stage.enhanced() {
                Some(flag) => self
                    .root
                    .set_attribute(ENHANCED_ATTRIBUTE, if flag { "true" } else { "false" }),
                None => self.root.remove_attribute(ENHANCED_ATTRIBUTE),
            };
            let _ = match stage.pin_mode() {
                Some(mode) => self.root.set_attribute(PIN_MODE_ATTRIBUTE, mode.as_str()),
                None => self.root.remove_attribute(PIN_MODE_ATTRIBUTE),
            };
        }

        // 2. Cards
        for &idx in &changes.cards {
            let Some(el) = self.card(idx) else {
                continue;
            };
            let style = el.style();
            let Some(pose) = stage.pose(idx) else {
                for property in CARD_PROPERTIES {
                    let _ = style.remove_property(property);
                }
                continue;
            };
            let _ = style.set_property("transform", &css_matrix(pose.transform()));
            let _ = style.set_property("transform-origin", "center top");
            let _ = style.set_property("z-index", &format!("{}", pose.z_index));
            if pose.highlight > 0.0 {
                let color = self
                    .base_color(idx)
                    .lerp(stage.active_color(), pose.highlight);
                let _ = style.set_property("background-color", &color.to_css());
            } else {
                let _ = style.remove_property("background-color");
            }
        }

        // 3. Pin
        if changes.pin {
            let style = self.root.style();
            match stage.pin() {
                Some(pin) => {
                    let _ = style.set_property(
                        "transform",
                        &format!("translate3d(0px, {}px, 0px)", pin.offset),
                    );
                    let _ = style.set_property("margin-bottom", &format!("{}px", pin.spacing));
                }
                None => {
                    for property in PIN_PROPERTIES {
                        let _ = style.remove_property(property);
                    }
                }
            }
        }
    }
}

/// Formats a 2D affine transform as a CSS `matrix()` value.
fn css_matrix(t: Affine) -> String {
    let [a, b, c, d, e, f] = t.as_coeffs();
    format!("matrix({a}, {b}, {c}, {d}, {e}, {f})")
}
