// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser implementations of the core host traits.
//!
//! [`DomDocument`] enumerates roots with `querySelectorAll`, reads their
//! marker attributes, and owns nothing per root: every call goes back to the
//! live DOM. [`DomObserver`] wraps one `IntersectionObserver` whose callback
//! forwards entries to a handler supplied by the boot object.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use stacked_cards_core::backend::{
    Document, Environment, Intersection, RootStructure, VisibilityObserver,
};
use stacked_cards_core::color::Rgba;
use stacked_cards_core::config::{
    CARD_SELECTOR, ENHANCED_ATTRIBUTE, MOBILE_MAX_WIDTH, MOBILE_QUERY, OPTIONS_ATTRIBUTE,
    PINNED_SELECTOR, REDUCED_MOTION_QUERY, ROOT_SELECTOR, TRACK_SELECTOR,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MediaQueryList, NodeList, Window,
};

/// Receives batches of visibility changes from a [`DomObserver`].
pub(crate) type IntersectionHandler = Rc<dyn Fn(Vec<Intersection<HtmlElement>>)>;

type ObserverClosure = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// Viewport facts read from a [`Window`].
///
/// Media query lists are created once and re-read on every call, so a resize
/// across the mobile breakpoint is seen by the next refresh.
pub struct DomEnvironment {
    window: Window,
    reduced_motion: Option<MediaQueryList>,
    mobile: Option<MediaQueryList>,
}

impl core::fmt::Debug for DomEnvironment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomEnvironment")
            .field("reduced_motion", &self.reduced_motion.is_some())
            .field("mobile", &self.mobile.is_some())
            .finish_non_exhaustive()
    }
}

impl DomEnvironment {
    /// Creates an environment for `window`.
    #[must_use]
    pub fn new(window: Window) -> Self {
        let reduced_motion = window.match_media(REDUCED_MOTION_QUERY).ok().flatten();
        let mobile = window.match_media(MOBILE_QUERY).ok().flatten();
        Self {
            window,
            reduced_motion,
            mobile,
        }
    }

    /// Returns the horizontal scroll offset.
    #[must_use]
    pub fn scroll_x(&self) -> f64 {
        self.window.scroll_x().unwrap_or(0.0)
    }
}

impl Environment for DomEnvironment {
    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion.as_ref().is_some_and(MediaQueryList::matches)
    }

    fn is_mobile(&self) -> bool {
        match &self.mobile {
            Some(query) => query.matches(),
            None => self.viewport_width() <= MOBILE_MAX_WIDTH,
        }
    }
}

/// The live browser document.
pub struct DomDocument {
    window: Window,
    document: web_sys::Document,
    on_intersect: IntersectionHandler,
}

impl core::fmt::Debug for DomDocument {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomDocument")
            .field("url", &self.document.url().ok())
            .finish_non_exhaustive()
    }
}

impl DomDocument {
    /// Creates a document view; observers it creates deliver to `on_intersect`.
    pub(crate) fn new(
        window: Window,
        document: web_sys::Document,
        on_intersect: IntersectionHandler,
    ) -> Self {
        Self {
            window,
            document,
            on_intersect,
        }
    }

    /// Cards anywhere under `root`, in document order.
    fn cards(root: &HtmlElement) -> Vec<HtmlElement> {
        root.query_selector_all(CARD_SELECTOR)
            .map(|list| html_elements(&list))
            .unwrap_or_default()
    }

    fn background_color(&self, el: &HtmlElement) -> Rgba {
        self.window
            .get_computed_style(el)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value("background-color").ok())
            .and_then(|value| Rgba::parse(&value))
            .unwrap_or(Rgba::TRANSPARENT)
    }
}

impl Document for DomDocument {
    type Root = HtmlElement;
    type Presenter = crate::DomPresenter;
    type Observer = DomObserver;

    fn roots(&self) -> Vec<HtmlElement> {
        self.document
            .query_selector_all(ROOT_SELECTOR)
            .map(|list| html_elements(&list))
            .unwrap_or_default()
    }

    fn enhanced_marker(&self, root: &HtmlElement) -> Option<bool> {
        parse_marker(root.get_attribute(ENHANCED_ATTRIBUTE).as_deref())
    }

    fn options_attribute(&self, root: &HtmlElement) -> Option<String> {
        root.get_attribute(OPTIONS_ATTRIBUTE)
    }

    fn structure(&self, root: &HtmlElement) -> RootStructure {
        let has_pinned = root.query_selector(PINNED_SELECTOR).ok().flatten().is_some();
        let has_track = root.query_selector(TRACK_SELECTOR).ok().flatten().is_some();
        let rect = root.get_bounding_client_rect();
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        RootStructure {
            has_pinned,
            has_track,
            card_count: Self::cards(root).len(),
            bounds: Rect::new(
                rect.left(),
                rect.top() + scroll_y,
                rect.right(),
                rect.bottom() + scroll_y,
            ),
        }
    }

    fn presenter(&self, root: &HtmlElement) -> crate::DomPresenter {
        let cards = Self::cards(root);
        let base_colors = cards.iter().map(|c| self.background_color(c)).collect();
        crate::DomPresenter::new(root.clone(), cards, base_colors)
    }

    fn create_observer(&mut self, margin_px: f64) -> Option<DomObserver> {
        DomObserver::new(margin_px, self.on_intersect.clone())
    }
}

/// A shared `IntersectionObserver`.
///
/// Disconnects when dropped.
pub struct DomObserver {
    observer: IntersectionObserver,
    _callback: ObserverClosure,
}

impl core::fmt::Debug for DomObserver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomObserver").finish_non_exhaustive()
    }
}

impl DomObserver {
    fn new(margin_px: f64, handler: IntersectionHandler) -> Option<Self> {
        let callback: ObserverClosure = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                let batch = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .filter_map(|entry| {
                        let is_intersecting = entry.is_intersecting();
                        entry
                            .target()
                            .dyn_into::<HtmlElement>()
                            .ok()
                            .map(|root| Intersection {
                                root,
                                is_intersecting,
                            })
                    })
                    .collect::<Vec<_>>();
                handler(batch);
            },
        )
            as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&root_margin(margin_px));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .ok()?;
        Some(Self {
            observer,
            _callback: callback,
        })
    }
}

impl VisibilityObserver<HtmlElement> for DomObserver {
    fn observe(&mut self, root: &HtmlElement) {
        self.observer.observe(root);
    }

    fn unobserve(&mut self, root: &HtmlElement) {
        self.observer.unobserve(root);
    }

    fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}

impl Drop for DomObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

fn html_elements(list: &NodeList) -> Vec<HtmlElement> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// Parses the `data-enhanced` marker. Anything but `"true"`/`"false"` reads
/// as absent.
fn parse_marker(value: Option<&str>) -> Option<bool> {
    match value? {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Vertical-only margin in CSS shorthand.
fn root_margin(margin_px: f64) -> String {
    format!("{margin_px}px 0px")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_values() {
        assert_eq!(parse_marker(Some("true")), Some(true));
        assert_eq!(parse_marker(Some("false")), Some(false));
        assert_eq!(parse_marker(Some("")), None);
        assert_eq!(parse_marker(Some("False")), None);
        assert_eq!(parse_marker(None), None);
    }

    #[test]
    fn margin_is_vertical_only() {
        assert_eq!(
            root_margin(stacked_cards_core::boot::OBSERVER_MARGIN_PX),
            "240px 0px"
        );
    }
}
