// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Side-table from root identity to its controller.
//!
//! The registry does not own roots; it maps a root key (any `PartialEq`
//! handle, e.g. a DOM element) to the [`StackedCards`] built for it. Entries
//! are evicted only by [`destroy`](Registry::destroy) or
//! [`destroy_all`](Registry::destroy_all), which tear the controller down
//! first. At most one controller exists per key.

use alloc::vec::Vec;

use crate::backend::Presenter;
use crate::controller::{InstanceId, StackedCards};
use crate::trace::{ActivationEvent, ActivationMode, Tracer};

/// Root-to-controller lookup table.
pub struct Registry<K, P> {
    entries: Vec<(K, StackedCards<P>)>,
    next_id: u32,
}

impl<K, P> core::fmt::Debug for Registry<K, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.entries.len())
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl<K, P> Default for Registry<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, P> Registry<K, P> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Returns the number of tracked roots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no root is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over tracked roots in activation order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Iterates over all controllers in activation order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut StackedCards<P>)> {
        self.entries.iter_mut().map(|(k, c)| (&*k, c))
    }
}

impl<K: PartialEq, P: Presenter> Registry<K, P> {
    fn position(&self, key: &K) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Returns `true` if `key` has a controller.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    /// Returns the controller for `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&StackedCards<P>> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// Returns the controller for `key` mutably.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut StackedCards<P>> {
        self.position(key).map(|i| &mut self.entries[i].1)
    }

    /// Returns the controller for `key`, building it with `build` if there is
    /// none yet.
    ///
    /// `build` receives the identity to give the new controller. When the
    /// key is already tracked it is not called and the existing controller is
    /// returned.
    pub fn activate(
        &mut self,
        key: K,
        tracer: &mut Tracer<'_>,
        build: impl FnOnce(InstanceId, &mut Tracer<'_>) -> StackedCards<P>,
    ) -> &mut StackedCards<P> {
        let idx = match self.position(&key) {
            Some(idx) => {
                tracer.activation(&ActivationEvent {
                    instance: self.entries[idx].1.id(),
                    mode: ActivationMode::Existing,
                });
                idx
            }
            None => {
                let id = InstanceId(self.next_id);
                self.next_id = self.next_id.wrapping_add(1);
                let controller = build(id, tracer);
                self.entries.push((key, controller));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    /// Destroys and evicts the controller for `key`.
    ///
    /// Returns `false` if `key` was not tracked.
    pub fn destroy(&mut self, key: &K, tracer: &mut Tracer<'_>) -> bool {
        let Some(idx) = self.position(key) else {
            return false;
        };
        let (_, mut controller) = self.entries.remove(idx);
        controller.destroy(tracer);
        true
    }

    /// Destroys and evicts every controller.
    pub fn destroy_all(&mut self, tracer: &mut Tracer<'_>) {
        for (_, mut controller) in self.entries.drain(..) {
            controller.destroy(tracer);
        }
    }

    /// Advances every in-flight tween. Returns `true` if any is still
    /// running afterwards.
    pub fn tick(&mut self, dt: f64, tracer: &mut Tracer<'_>) -> bool {
        let mut running = false;
        for (_, controller) in &mut self.entries {
            running |= controller.tick(dt, tracer);
        }
        running
    }

    /// Returns `true` if any controller has a tween in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.entries.iter().any(|(_, c)| c.is_animating())
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::backend::{Environment, RootStructure};
    use crate::config::{OptionOverrides, StackedCardsOptions};
    use crate::machine::Direction;
    use crate::stage::{CardStage, StageChanges};

    struct Desktop;

    impl Environment for Desktop {
        fn viewport_width(&self) -> f64 {
            1440.0
        }
        fn viewport_height(&self) -> f64 {
            900.0
        }
        fn scroll_y(&self) -> f64 {
            0.0
        }
        fn prefers_reduced_motion(&self) -> bool {
            false
        }
    }

    struct NullPresenter;

    impl Presenter for NullPresenter {
        fn apply(&mut self, _stage: &CardStage, _changes: &StageChanges) {}
    }

    fn make_controller(id: InstanceId, cards: usize) -> StackedCards<NullPresenter> {
        StackedCards::activate(
            id,
            StackedCardsOptions::resolve(&OptionOverrides::default(), false),
            RootStructure {
                has_pinned: true,
                has_track: true,
                card_count: cards,
                bounds: Rect::new(0.0, 1000.0, 1440.0, 1600.0),
            },
            &Desktop,
            NullPresenter,
            &mut Tracer::none(),
        )
    }

    #[test]
    fn activate_returns_existing_controller() {
        let mut reg: Registry<&str, NullPresenter> = Registry::new();
        let t = &mut Tracer::none();
        let first = reg.activate("a", t, |id, _| make_controller(id, 3)).id();
        let mut built = false;
        let second = reg
            .activate("a", t, |id, _| {
                built = true;
                make_controller(id, 3)
            })
            .id();
        assert_eq!(first, second);
        assert!(!built);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn ids_are_unique_per_activation() {
        let mut reg: Registry<&str, NullPresenter> = Registry::new();
        let t = &mut Tracer::none();
        let a = reg.activate("a", t, |id, _| make_controller(id, 3)).id();
        assert!(reg.destroy(&"a", t));
        let again = reg.activate("a", t, |id, _| make_controller(id, 3)).id();
        assert_ne!(a, again, "re-activation builds from scratch");
    }

    #[test]
    fn destroy_evicts_and_is_a_no_op_when_untracked() {
        let mut reg: Registry<&str, NullPresenter> = Registry::new();
        let t = &mut Tracer::none();
        reg.activate("a", t, |id, _| make_controller(id, 3));
        assert!(reg.destroy(&"a", t));
        assert!(!reg.contains(&"a"));
        assert!(!reg.destroy(&"a", t));
    }

    #[test]
    fn destroy_all_clears_everything() {
        let mut reg: Registry<u8, NullPresenter> = Registry::new();
        let t = &mut Tracer::none();
        for key in 0..3 {
            reg.activate(key, t, |id, _| make_controller(id, 4));
        }
        assert_eq!(reg.keys().copied().collect::<alloc::vec::Vec<_>>(), [0, 1, 2]);
        reg.destroy_all(t);
        assert!(reg.is_empty());
    }

    #[test]
    fn tick_reports_running_tweens() {
        let mut reg: Registry<u8, NullPresenter> = Registry::new();
        let t = &mut Tracer::none();
        reg.activate(0, t, |id, _| make_controller(id, 4));
        reg.activate(1, t, |id, _| make_controller(id, 4));
        assert!(!reg.is_animating());

        reg.get_mut(&1).unwrap().request(Direction::Down, t);
        assert!(reg.is_animating());
        assert!(reg.tick(0.25, t));
        assert!(!reg.tick(0.25, t));
        assert!(!reg.is_animating());
    }
}
