// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-document lifecycle: discovery, lazy activation, and bulk teardown.
//!
//! A [`BootManager`] is owned by whatever owns the document's lifetime. The
//! host calls:
//!
//! - [`refresh`](BootManager::refresh) on boot, after each navigation load,
//!   and on viewport resize,
//! - [`on_intersections`](BootManager::on_intersections) from its visibility
//!   observer callback,
//! - [`destroy_all`](BootManager::destroy_all) before a navigation swaps the
//!   document out,
//! - the input methods and [`tick`](BootManager::tick) from its event
//!   listeners and frame loop.
//!
//! Roots are activated one-shot: each is observed until it first comes
//! within [`OBSERVER_MARGIN_PX`] of the viewport, activated, then unobserved.

use crate::backend::{Document, Environment, Intersection, VisibilityObserver};
use crate::config::{OptionOverrides, StackedCardsOptions};
use crate::controller::StackedCards;
use crate::registry::Registry;
use crate::trace::{RefreshEvent, Tracer};

/// Vertical distance ahead of the viewport at which roots activate.
pub const OBSERVER_MARGIN_PX: f64 = 240.0;

/// Lifecycle state for one document.
pub struct BootManager<D: Document> {
    registry: Registry<D::Root, D::Presenter>,
    observer: Option<D::Observer>,
}

impl<D: Document> core::fmt::Debug for BootManager<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootManager")
            .field("registry", &self.registry)
            .field("observing", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl<D: Document> Default for BootManager<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Document> BootManager<D> {
    /// Creates a manager with no observer and no active roots.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            observer: None,
        }
    }

    /// Returns the active controllers.
    #[must_use]
    pub fn registry(&self) -> &Registry<D::Root, D::Presenter> {
        &self.registry
    }

    /// Returns the active controllers mutably.
    pub fn registry_mut(&mut self) -> &mut Registry<D::Root, D::Presenter> {
        &mut self.registry
    }

    /// Returns `true` while the shared visibility observer exists.
    #[must_use]
    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    /// Discovers roots and hands untracked ones to the visibility observer.
    ///
    /// Tracked enhanced roots keep their controller and are re-measured
    /// against the current layout. Tracked roots that carry
    /// `enhanced="false"` are destroyed and observed again so the static
    /// decision is re-made. The observer is created on first need; if the
    /// host cannot create one, roots are activated immediately.
    pub fn refresh(
        &mut self,
        doc: &mut D,
        env: &impl Environment,
        tracer: &mut Tracer<'_>,
    ) -> RefreshEvent {
        let mut report = RefreshEvent::default();
        for root in doc.roots() {
            report.roots += 1;
            if self.registry.contains(&root) {
                if doc.enhanced_marker(&root) != Some(false) {
                    if let Some(cards) = self.registry.get_mut(&root) {
                        cards.relayout(doc.structure(&root).bounds, env, tracer);
                    }
                    report.skipped += 1;
                    continue;
                }
                self.registry.destroy(&root, tracer);
                report.evicted += 1;
            }

            if self.observer.is_none() {
                self.observer = doc.create_observer(OBSERVER_MARGIN_PX);
            }
            if let Some(observer) = self.observer.as_mut() {
                observer.observe(&root);
                report.observed += 1;
                continue;
            }
            self.activate(doc, env, root, tracer);
            report.activated += 1;
        }
        tracer.refresh(&report);
        report
    }

    /// Handles a batch of visibility changes.
    ///
    /// Each intersecting root is activated unless already tracked, then
    /// unobserved. Non-intersecting entries are ignored.
    pub fn on_intersections(
        &mut self,
        doc: &D,
        env: &impl Environment,
        entries: &[Intersection<D::Root>],
        tracer: &mut Tracer<'_>,
    ) {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            if !self.registry.contains(&entry.root) {
                self.activate(doc, env, entry.root.clone(), tracer);
            }
            if let Some(observer) = self.observer.as_mut() {
                observer.unobserve(&entry.root);
            }
        }
    }

    /// Activates `root` now, returning its controller.
    ///
    /// Options are read from the root's attribute; if the root is already
    /// tracked its existing controller is returned.
    pub fn activate(
        &mut self,
        doc: &D,
        env: &impl Environment,
        root: D::Root,
        tracer: &mut Tracer<'_>,
    ) -> &mut StackedCards<D::Presenter> {
        let target = root.clone();
        self.registry.activate(root, tracer, |id, tracer| {
            let overrides = OptionOverrides::parse(doc.options_attribute(&target).as_deref());
            let options = StackedCardsOptions::resolve(&overrides, env.prefers_reduced_motion());
            StackedCards::activate(
                id,
                options,
                doc.structure(&target),
                env,
                doc.presenter(&target),
                tracer,
            )
        })
    }

    /// Disconnects the observer and destroys every controller.
    pub fn destroy_all(&mut self, tracer: &mut Tracer<'_>) {
        if let Some(mut observer) = self.observer.take() {
            observer.disconnect();
        }
        self.registry.destroy_all(tracer);
    }

    /// Routes a native scroll to every controller.
    ///
    /// Returns the offset to restore if a controller is holding the page.
    pub fn on_scroll(&mut self, scroll_y: f64, tracer: &mut Tracer<'_>) -> Option<f64> {
        let mut restore = None;
        for (_, controller) in self.registry.iter_mut() {
            restore = restore.or(controller.on_scroll(scroll_y, tracer));
        }
        restore
    }

    /// Routes a wheel event. Returns `true` if its default must be prevented.
    pub fn on_wheel(&mut self, delta_y: f64, tracer: &mut Tracer<'_>) -> bool {
        let mut prevent = false;
        for (_, controller) in self.registry.iter_mut() {
            prevent |= controller.on_wheel(delta_y, tracer).prevents_default();
        }
        prevent
    }

    /// Routes the start of a touch.
    pub fn on_touch_start(&mut self, y: f64) {
        for (_, controller) in self.registry.iter_mut() {
            controller.on_touch_start(y);
        }
    }

    /// Routes a touch move. Returns `true` if its default must be prevented.
    pub fn on_touch_move(&mut self, y: f64, tracer: &mut Tracer<'_>) -> bool {
        let mut prevent = false;
        for (_, controller) in self.registry.iter_mut() {
            prevent |= controller.on_touch_move(y, tracer).prevents_default();
        }
        prevent
    }

    /// Routes the end of a touch.
    pub fn on_touch_end(&mut self) {
        for (_, controller) in self.registry.iter_mut() {
            controller.on_touch_end();
        }
    }

    /// Advances every in-flight tween. Returns `true` while any is running.
    pub fn tick(&mut self, dt: f64, tracer: &mut Tracer<'_>) -> bool {
        self.registry.tick(dt, tracer)
    }

    /// Returns `true` if any controller has a tween in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.registry.is_animating()
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::rc::Rc;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::Rect;

    use super::*;
    use crate::backend::{Presenter, RootStructure};
    use crate::stage::{CardStage, StageChanges};

    #[derive(Default)]
    struct Host {
        markers: BTreeMap<u32, bool>,
        observed: Vec<u32>,
        margins: Vec<f64>,
        disconnects: usize,
    }

    type SharedHost = Rc<RefCell<Host>>;

    struct FakeEnv {
        width: f64,
        height: f64,
        scroll: f64,
    }

    impl Environment for FakeEnv {
        fn viewport_width(&self) -> f64 {
            self.width
        }
        fn viewport_height(&self) -> f64 {
            self.height
        }
        fn scroll_y(&self) -> f64 {
            self.scroll
        }
        fn prefers_reduced_motion(&self) -> bool {
            false
        }
    }

    fn desktop() -> FakeEnv {
        FakeEnv {
            width: 1280.0,
            height: 900.0,
            scroll: 0.0,
        }
    }

    struct FakePresenter {
        root: u32,
        host: SharedHost,
    }

    impl Presenter for FakePresenter {
        fn apply(&mut self, stage: &CardStage, changes: &StageChanges) {
            if !changes.markers {
                return;
            }
            let mut host = self.host.borrow_mut();
            match stage.enhanced() {
                Some(flag) => host.markers.insert(self.root, flag),
                None => host.markers.remove(&self.root),
            };
        }
    }

    struct FakeObserver {
        host: SharedHost,
    }

    impl VisibilityObserver<u32> for FakeObserver {
        fn observe(&mut self, root: &u32) {
            let mut host = self.host.borrow_mut();
            if !host.observed.contains(root) {
                host.observed.push(*root);
            }
        }
        fn unobserve(&mut self, root: &u32) {
            self.host.borrow_mut().observed.retain(|r| r != root);
        }
        fn disconnect(&mut self) {
            let mut host = self.host.borrow_mut();
            host.observed.clear();
            host.disconnects += 1;
        }
    }

    struct FakeDoc {
        /// `(root, card count)` in document order.
        roots: Vec<(u32, usize)>,
        options: BTreeMap<u32, String>,
        can_observe: bool,
        host: SharedHost,
    }

    impl FakeDoc {
        fn new(roots: &[(u32, usize)]) -> Self {
            Self {
                roots: roots.to_vec(),
                options: BTreeMap::new(),
                can_observe: true,
                host: SharedHost::default(),
            }
        }

        fn observed(&self) -> Vec<u32> {
            self.host.borrow().observed.clone()
        }

        fn marker(&self, root: u32) -> Option<bool> {
            self.host.borrow().markers.get(&root).copied()
        }
    }

    impl Document for FakeDoc {
        type Root = u32;
        type Presenter = FakePresenter;
        type Observer = FakeObserver;

        fn roots(&self) -> Vec<u32> {
            self.roots.iter().map(|(r, _)| *r).collect()
        }

        fn enhanced_marker(&self, root: &u32) -> Option<bool> {
            self.marker(*root)
        }

        fn options_attribute(&self, root: &u32) -> Option<String> {
            self.options.get(root).cloned()
        }

        fn structure(&self, root: &u32) -> RootStructure {
            let cards = self
                .roots
                .iter()
                .find(|(r, _)| r == root)
                .map_or(0, |(_, n)| *n);
            RootStructure {
                has_pinned: true,
                has_track: true,
                card_count: cards,
                bounds: Rect::new(0.0, 2000.0, 1280.0, 2600.0),
            }
        }

        fn presenter(&self, root: &u32) -> FakePresenter {
            FakePresenter {
                root: *root,
                host: Rc::clone(&self.host),
            }
        }

        fn create_observer(&mut self, margin_px: f64) -> Option<FakeObserver> {
            self.host.borrow_mut().margins.push(margin_px);
            self.can_observe.then(|| FakeObserver {
                host: Rc::clone(&self.host),
            })
        }
    }

    fn visible(roots: &[u32]) -> Vec<Intersection<u32>> {
        roots
            .iter()
            .map(|r| Intersection {
                root: *r,
                is_intersecting: true,
            })
            .collect()
    }

    #[test]
    fn refresh_observes_without_activating() {
        let mut doc = FakeDoc::new(&[(1, 4), (2, 3)]);
        let mut boot = BootManager::new();
        let report = boot.refresh(&mut doc, &desktop(), &mut Tracer::none());

        assert_eq!(report.observed, 2);
        assert!(boot.registry().is_empty(), "nothing built before visibility");
        assert_eq!(doc.observed(), [1, 2]);
        assert_eq!(doc.host.borrow().margins, [OBSERVER_MARGIN_PX]);
        assert_eq!(doc.marker(1), None);
    }

    #[test]
    fn intersection_activates_exactly_once() {
        let mut doc = FakeDoc::new(&[(1, 4), (2, 3)]);
        let env = desktop();
        let t = &mut Tracer::none();
        let mut boot = BootManager::new();
        boot.refresh(&mut doc, &env, t);

        boot.on_intersections(&doc, &env, &visible(&[1]), t);
        assert_eq!(boot.registry().len(), 1);
        assert_eq!(doc.marker(1), Some(true));
        assert_eq!(doc.observed(), [2], "one-shot: root 1 unobserved");

        let id = boot.registry().get(&1).unwrap().id();
        boot.on_intersections(&doc, &env, &visible(&[1]), t);
        assert_eq!(boot.registry().get(&1).unwrap().id(), id);
        assert_eq!(boot.registry().len(), 1);
    }

    #[test]
    fn non_intersecting_entries_are_ignored() {
        let mut doc = FakeDoc::new(&[(1, 4)]);
        let env = desktop();
        let t = &mut Tracer::none();
        let mut boot = BootManager::new();
        boot.refresh(&mut doc, &env, t);

        let far = [Intersection {
            root: 1,
            is_intersecting: false,
        }];
        boot.on_intersections(&doc, &env, &far, t);
        assert!(boot.registry().is_empty());
        assert_eq!(doc.observed(), [1]);
    }

    #[test]
    fn refresh_skips_enhanced_and_re_evaluates_static_roots() {
        let mut doc = FakeDoc::new(&[(1, 4), (2, 1)]);
        let env = desktop();
        let t = &mut Tracer::none();
        let mut boot = BootManager::new();
        boot.refresh(&mut doc, &env, t);
        boot.on_intersections(&doc, &env, &visible(&[1, 2]), t);
        assert_eq!(doc.marker(2), Some(false));
        let enhanced_id = boot.registry().get(&1).unwrap().id();

        // Root 2 gains cards; a refresh re-evaluates it.
        doc.roots[1].1 = 3;
        let report = boot.refresh(&mut doc, &env, t);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.evicted, 1);
        assert_eq!(report.observed, 1);
        assert_eq!(boot.registry().get(&1).unwrap().id(), enhanced_id);
        assert!(!boot.registry().contains(&2));
        assert_eq!(doc.observed(), [2]);

        boot.on_intersections(&doc, &env, &visible(&[2]), t);
        assert_eq!(doc.marker(2), Some(true));
    }

    #[test]
    fn refresh_re_measures_enhanced_roots() {
        let mut doc = FakeDoc::new(&[(1, 4)]);
        let mut env = desktop();
        let t = &mut Tracer::none();
        let mut boot = BootManager::new();
        boot.refresh(&mut doc, &env, t);
        boot.on_intersections(&doc, &env, &visible(&[1]), t);
        let start = |boot: &BootManager<FakeDoc>| {
            boot.registry().get(&1).unwrap().pin_trigger().unwrap().bounds().start
        };
        assert_eq!(start(&boot), 1820.0);
        let id = boot.registry().get(&1).unwrap().id();

        env.height = 600.0;
        let report = boot.refresh(&mut doc, &env, t);
        assert_eq!(report.skipped, 1);
        assert_eq!(start(&boot), 1880.0);
        let cards = boot.registry().get(&1).unwrap();
        assert_eq!(cards.id(), id, "controller is kept");
        assert_eq!(cards.stage().pose(1).unwrap().y, 600.0);
    }

    #[test]
    fn destroy_all_tears_everything_down() {
        let mut doc = FakeDoc::new(&[(1, 4), (2, 4)]);
        let env = desktop();
        let t = &mut Tracer::none();
        let mut boot = BootManager::new();
        boot.refresh(&mut doc, &env, t);
        boot.on_intersections(&doc, &env, &visible(&[1]), t);

        boot.destroy_all(t);
        assert!(!boot.has_observer());
        assert!(boot.registry().is_empty());
        assert_eq!(doc.host.borrow().disconnects, 1);
        assert_eq!(doc.marker(1), None, "markers removed");

        boot.destroy_all(t);
        assert_eq!(doc.host.borrow().disconnects, 1);

        boot.refresh(&mut doc, &env, t);
        assert!(boot.has_observer());
        assert_eq!(doc.host.borrow().margins.len(), 2, "fresh observer");
    }

    #[test]
    fn without_an_observer_roots_activate_immediately() {
        let mut doc = FakeDoc::new(&[(1, 4)]);
        doc.can_observe = false;
        let report = BootManager::new().refresh(&mut doc, &desktop(), &mut Tracer::none());
        assert_eq!(report.activated, 1);
        assert_eq!(doc.marker(1), Some(true));
    }

    #[test]
    fn options_attribute_is_parsed_tolerantly() {
        let mut doc = FakeDoc::new(&[(1, 4), (2, 4)]);
        doc.options.insert(1, "{ not json".to_string());
        doc.options
            .insert(2, r#"{"reducedMotion": true}"#.to_string());
        let env = desktop();
        let t = &mut Tracer::none();
        let mut boot = BootManager::new();
        boot.refresh(&mut doc, &env, t);
        boot.on_intersections(&doc, &env, &visible(&[1, 2]), t);

        let first = boot.registry().get(&1).unwrap();
        assert!(first.is_enhanced());
        assert_eq!(first.options().animation.step_duration, 0.5);
        assert_eq!(doc.marker(2), Some(false));
    }

    #[test]
    fn mobile_viewport_activates_static() {
        let mut doc = FakeDoc::new(&[(1, 4)]);
        let env = FakeEnv {
            width: 800.0,
            ..desktop()
        };
        let t = &mut Tracer::none();
        let mut boot = BootManager::new();
        boot.refresh(&mut doc, &env, t);
        boot.on_intersections(&doc, &env, &visible(&[1]), t);
        assert_eq!(doc.marker(1), Some(false));
    }

    #[test]
    fn input_routes_to_active_controllers() {
        let mut doc = FakeDoc::new(&[(1, 4)]);
        let env = FakeEnv {
            scroll: 1850.0,
            ..desktop()
        };
        let t = &mut Tracer::none();
        let mut boot = BootManager::new();
        boot.refresh(&mut doc, &env, t);
        assert!(!boot.on_wheel(700.0, t), "nothing active yet");

        boot.on_intersections(&doc, &env, &visible(&[1]), t);
        assert!(boot.on_wheel(700.0, t));
        assert!(boot.is_animating());
        assert_eq!(boot.on_scroll(1880.0, t), Some(1850.0));

        while boot.tick(0.1, t) {}
        assert!(!boot.is_animating());
    }
}
