// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the controller's state machine and stacking invariants.

use kurbo::Rect;
use proptest::prelude::*;
use stacked_cards_core::backend::{Environment, Presenter, RootStructure};
use stacked_cards_core::config::{OptionOverrides, StackedCardsOptions};
use stacked_cards_core::controller::{InstanceId, StackedCards};
use stacked_cards_core::machine::{Direction, Phase};
use stacked_cards_core::stage::{CardStage, StageChanges};
use stacked_cards_core::trace::Tracer;

struct Desktop;

impl Environment for Desktop {
    fn viewport_width(&self) -> f64 {
        1280.0
    }
    fn viewport_height(&self) -> f64 {
        900.0
    }
    fn scroll_y(&self) -> f64 {
        1850.0
    }
    fn prefers_reduced_motion(&self) -> bool {
        false
    }
}

struct NullPresenter;

impl Presenter for NullPresenter {
    fn apply(&mut self, _stage: &CardStage, _changes: &StageChanges) {}
}

#[derive(Clone, Copy, Debug)]
enum Input {
    Request(Direction),
    Tick(f64),
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        Just(Input::Request(Direction::Down)),
        Just(Input::Request(Direction::Up)),
        (0.0f64..0.6).prop_map(Input::Tick),
    ]
}

fn make_cards(cards: usize) -> StackedCards<NullPresenter> {
    StackedCards::activate(
        InstanceId(1),
        StackedCardsOptions::resolve(&OptionOverrides::default(), false),
        RootStructure {
            has_pinned: true,
            has_track: true,
            card_count: cards,
            bounds: Rect::new(0.0, 2000.0, 1280.0, 2600.0),
        },
        &Desktop,
        NullPresenter,
        &mut Tracer::none(),
    )
}

fn settle(c: &mut StackedCards<NullPresenter>) {
    let t = &mut Tracer::none();
    // Bounded: every queued step takes at most one step duration.
    for _ in 0..1000 {
        if !c.tick(0.05, t) {
            return;
        }
    }
}

proptest! {
    #[test]
    fn stacking_order_is_index_plus_one(
        cards in 2usize..8,
        inputs in prop::collection::vec(input(), 0..64),
    ) {
        let mut c = make_cards(cards);
        let t = &mut Tracer::none();
        for input in inputs {
            match input {
                Input::Request(d) => c.request(d, t),
                Input::Tick(dt) => { c.tick(dt, t); }
            }
            for (i, pose) in c.stage().poses().iter().enumerate() {
                let pose = pose.expect("enhanced cards are always posed");
                prop_assert_eq!(pose.z_index, i32::try_from(i).unwrap() + 1);
            }
        }
    }

    #[test]
    fn queue_only_holds_the_animating_direction(
        cards in 2usize..8,
        inputs in prop::collection::vec(input(), 0..64),
    ) {
        let mut c = make_cards(cards);
        let t = &mut Tracer::none();
        for input in inputs {
            match input {
                Input::Request(d) => c.request(d, t),
                Input::Tick(dt) => { c.tick(dt, t); }
            }
            if let Some(queued) = c.queued() {
                prop_assert_eq!(c.phase(), Phase::Animating(queued));
            }
            prop_assert_eq!(c.is_animating(), c.phase() != Phase::Idle);
        }
    }

    #[test]
    fn settled_playhead_rests_on_a_label(
        cards in 2usize..8,
        inputs in prop::collection::vec(input(), 0..64),
    ) {
        let mut c = make_cards(cards);
        let t = &mut Tracer::none();
        for input in inputs {
            match input {
                Input::Request(d) => c.request(d, t),
                Input::Tick(dt) => { c.tick(dt, t); }
            }
        }
        // A redirect that finds no label leaves the playhead within the
        // lookup epsilon of one.
        settle(&mut c);
        let timeline = c.timeline().unwrap();
        let playhead = timeline.playhead();
        prop_assert!(
            timeline.labels().iter().any(|l| (l.time - playhead).abs() < 2e-6),
            "playhead {} not on a label", playhead
        );
    }

    #[test]
    fn forward_then_back_returns_to_rest(cards in 2usize..8, steps in 0usize..8) {
        let mut c = make_cards(cards);
        let t = &mut Tracer::none();
        for _ in 0..steps {
            c.request(Direction::Down, t);
            settle(&mut c);
        }
        for _ in 0..steps {
            c.request(Direction::Up, t);
            settle(&mut c);
        }
        for pose in c.stage().poses() {
            prop_assert!((pose.unwrap().scale - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn destroy_twice_matches_destroy_once(
        cards in 0usize..8,
        inputs in prop::collection::vec(input(), 0..16),
    ) {
        let mut c = make_cards(cards);
        let t = &mut Tracer::none();
        for input in inputs {
            match input {
                Input::Request(d) => c.request(d, t),
                Input::Tick(dt) => { c.tick(dt, t); }
            }
        }
        c.destroy(t);
        let once = (c.stage().poses().to_vec(), c.stage().enhanced(), c.stage().pin());
        c.destroy(t);
        let twice = (c.stage().poses().to_vec(), c.stage().enhanced(), c.stage().pin());
        prop_assert_eq!(once, twice);
        prop_assert!(c.stage().poses().iter().all(Option::is_none));
        prop_assert_eq!(c.stage().pin_mode(), None);
    }
}
