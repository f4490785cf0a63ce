// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-root instance controller.
//!
//! [`StackedCards`] owns one root's lifecycle. At activation it decides
//! between **static** mode (markers only, no interaction) and **enhanced**
//! mode, in which it builds:
//!
//! - a paused [`StepTimeline`] rendered into a [`CardStage`],
//! - a [`PinTrigger`] over the root's scroll range,
//! - a disabled [`GestureObserver`] that the trigger enables while the range
//!   is active,
//! - a [`StepMachine`] plus at most one in-flight [`Tween`].
//!
//! Host events enter through [`on_scroll`](StackedCards::on_scroll),
//! [`on_wheel`](StackedCards::on_wheel), the touch methods, and
//! [`tick`](StackedCards::tick). Every entry point that changes visual state
//! evaluates the stage and hands the changes to the controller's
//! [`Presenter`].
//!
//! [`destroy`](StackedCards::destroy) is idempotent. An enhanced controller
//! resets its cards and removes both root markers; a static one leaves
//! `enhanced="false"` in place.

use alloc::boxed::Box;

use kurbo::{Rect, Vec2};

use crate::backend::{Environment, Presenter, RootStructure};
use crate::config::StackedCardsOptions;
use crate::gesture::{GestureObserver, GestureResponse};
use crate::machine::{Decision, Direction, Phase, StepMachine};
use crate::pin::{PinTrigger, TriggerBounds};
use crate::stage::CardStage;
use crate::timeline::StepTimeline;
use crate::trace::{
    ActivationEvent, ActivationMode, BoundaryEvent, GestureToggleEvent, RequestEvent,
    TeardownEvent, TweenEndEvent, TweenStartEvent, Tracer,
};
use crate::tween::{Tween, TweenId, TweenStatus};

/// Identity of a controller, assigned by its [`Registry`](crate::registry::Registry).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u32);

/// Why a root was left static.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StaticReason {
    /// The pinned region, the track, or every card is missing.
    MissingStructure,
    /// Reduced motion was requested by options or by the system.
    ReducedMotion,
    /// Only one card exists.
    TooFewCards,
    /// The mobile breakpoint matches.
    Mobile,
}

/// Returns why `structure` must stay static under `options` and `env`, or
/// `None` if it can be enhanced.
#[must_use]
pub fn static_reason(
    options: &StackedCardsOptions,
    structure: &RootStructure,
    env: &impl Environment,
) -> Option<StaticReason> {
    if !structure.is_complete() || structure.card_count == 0 {
        Some(StaticReason::MissingStructure)
    } else if options.reduced_motion {
        Some(StaticReason::ReducedMotion)
    } else if structure.card_count <= 1 {
        Some(StaticReason::TooFewCards)
    } else if env.is_mobile() {
        Some(StaticReason::Mobile)
    } else {
        None
    }
}

/// Returns `true` if the root must be left static.
#[must_use]
pub fn should_use_static_mode(
    options: &StackedCardsOptions,
    structure: &RootStructure,
    env: &impl Environment,
) -> bool {
    static_reason(options, structure, env).is_some()
}

/// Interactive state of an enhanced controller.
#[derive(Debug)]
struct Interactive {
    timeline: StepTimeline,
    machine: StepMachine,
    tween: Option<Tween>,
    next_tween: u32,
    gesture: GestureObserver,
    trigger: PinTrigger,
    scroll_y: f64,
}

impl Interactive {
    /// Starts a tween towards the neighbouring label in `direction`.
    ///
    /// Returns `false` and stays idle if there is no such label.
    fn start(&mut self, instance: InstanceId, direction: Direction, tracer: &mut Tracer<'_>) -> bool {
        let from = self.timeline.playhead();
        let label = match direction {
            Direction::Down => self.timeline.next_label(),
            Direction::Up => self.timeline.previous_label(),
        };
        let Some(label) = label else {
            tracer.boundary(&BoundaryEvent {
                instance,
                direction,
                playhead: from,
            });
            return false;
        };
        let tween = Tween::new(TweenId(self.next_tween), label.name.clone(), from, label.time);
        self.next_tween = self.next_tween.wrapping_add(1);
        tracer.tween_start(&TweenStartEvent {
            instance,
            tween: tween.id(),
            direction,
            from,
            to: tween.target(),
        });
        self.tween = Some(tween);
        self.machine.started(direction);
        true
    }

    /// Drops the in-flight tween, leaving the playhead where it is.
    fn cancel(&mut self, instance: InstanceId, tracer: &mut Tracer<'_>) {
        if let Some(tween) = self.tween.take() {
            tracer.tween_cancel(&TweenEndEvent {
                instance,
                tween: tween.id(),
                position: self.timeline.playhead(),
            });
        }
    }
}

#[derive(Debug)]
enum Mode {
    Static(StaticReason),
    Enhanced(Box<Interactive>),
    Destroyed,
}

/// Controller for one stacked-cards root.
pub struct StackedCards<P> {
    id: InstanceId,
    options: StackedCardsOptions,
    stage: CardStage,
    presenter: P,
    mode: Mode,
}

impl<P> core::fmt::Debug for StackedCards<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StackedCards")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("stage", &self.stage)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl<P: Presenter> StackedCards<P> {
    /// Activates a root and presents its initial state.
    ///
    /// In enhanced mode the pin trigger is synchronized with the current
    /// scroll offset right away, so a root activated inside its range starts
    /// with the gesture observer enabled.
    pub fn activate(
        id: InstanceId,
        options: StackedCardsOptions,
        structure: RootStructure,
        env: &impl Environment,
        presenter: P,
        tracer: &mut Tracer<'_>,
    ) -> Self {
        let mut stage = CardStage::new(structure.card_count);
        let mode = if let Some(reason) = static_reason(&options, &structure, env) {
            stage.set_markers(Some(false), None);
            tracer.activation(&ActivationEvent {
                instance: id,
                mode: ActivationMode::Static(reason),
            });
            Mode::Static(reason)
        } else {
            let anim = &options.animation;
            let viewport_height = env.viewport_height();
            stage.set_markers(Some(true), Some(options.pin_mode));
            stage.set_active_color(anim.active_color);
            let timeline = StepTimeline::new(
                structure.card_count,
                anim.step_duration,
                anim.y_offset_step,
                viewport_height,
            );
            let bounds =
                TriggerBounds::resolve(&anim.start, &anim.end, structure.bounds, viewport_height);
            tracer.activation(&ActivationEvent {
                instance: id,
                mode: ActivationMode::Enhanced {
                    card_count: structure.card_count,
                    pin_mode: options.pin_mode,
                },
            });
            Mode::Enhanced(Box::new(Interactive {
                timeline,
                machine: StepMachine::new(),
                tween: None,
                next_tween: 1,
                gesture: GestureObserver::default(),
                trigger: PinTrigger::new(bounds, options.pin_mode),
                scroll_y: env.scroll_y(),
            }))
        };

        let mut this = Self {
            id,
            options,
            stage,
            presenter,
            mode,
        };
        if this.is_enhanced() {
            let _ = this.on_scroll(env.scroll_y(), tracer);
        }
        this.present();
        this
    }

    /// Returns the controller's identity.
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Returns the options the controller was built with.
    #[must_use]
    pub fn options(&self) -> &StackedCardsOptions {
        &self.options
    }

    /// Returns the render state last handed to the presenter.
    #[must_use]
    pub fn stage(&self) -> &CardStage {
        &self.stage
    }

    /// Returns the presenter.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Returns `true` if interactive stacking is running.
    #[must_use]
    pub fn is_enhanced(&self) -> bool {
        matches!(self.mode, Mode::Enhanced(_))
    }

    /// Returns why the root was left static, if it was.
    #[must_use]
    pub fn static_reason(&self) -> Option<StaticReason> {
        match self.mode {
            Mode::Static(reason) => Some(reason),
            _ => None,
        }
    }

    /// Returns `true` once [`destroy`](Self::destroy) has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        matches!(self.mode, Mode::Destroyed)
    }

    fn interactive(&self) -> Option<&Interactive> {
        match &self.mode {
            Mode::Enhanced(run) => Some(run),
            _ => None,
        }
    }

    /// Returns the state machine phase (`Idle` unless enhanced).
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.interactive()
            .map_or(Phase::Idle, |run| run.machine.phase())
    }

    /// Returns the queued direction, if any.
    #[must_use]
    pub fn queued(&self) -> Option<Direction> {
        self.interactive().and_then(|run| run.machine.queued())
    }

    /// Returns `true` while a tween is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.interactive().is_some_and(|run| run.tween.is_some())
    }

    /// Returns the step timeline of an enhanced controller.
    #[must_use]
    pub fn timeline(&self) -> Option<&StepTimeline> {
        self.interactive().map(|run| &run.timeline)
    }

    /// Returns the in-flight tween, if any.
    #[must_use]
    pub fn tween(&self) -> Option<&Tween> {
        self.interactive().and_then(|run| run.tween.as_ref())
    }

    /// Returns the gesture observer of an enhanced controller.
    #[must_use]
    pub fn gesture(&self) -> Option<&GestureObserver> {
        self.interactive().map(|run| &run.gesture)
    }

    /// Returns the pin trigger of an enhanced controller.
    #[must_use]
    pub fn pin_trigger(&self) -> Option<&PinTrigger> {
        self.interactive().map(|run| &run.trigger)
    }

    /// Requests one step in `direction`.
    ///
    /// Idle controllers start a tween, a same-direction request while
    /// animating is queued, and an opposite request cancels the in-flight
    /// tween and starts towards the new direction at once. Requests past the
    /// first or last label are ignored. Static and destroyed controllers
    /// ignore every request.
    pub fn request(&mut self, direction: Direction, tracer: &mut Tracer<'_>) {
        let instance = self.id;
        let Mode::Enhanced(run) = &mut self.mode else {
            return;
        };
        let decision = run.machine.request(direction);
        tracer.request(&RequestEvent {
            instance,
            direction,
            decision,
        });
        match decision {
            Decision::Queue(_) => {}
            Decision::Start(d) => {
                run.start(instance, d, tracer);
            }
            Decision::Redirect(d) => {
                run.cancel(instance, tracer);
                run.start(instance, d, tracer);
            }
        }
    }

    /// Advances the in-flight tween by `dt` seconds and presents the result.
    ///
    /// On completion a queued direction, if any, starts immediately. Returns
    /// `true` while a tween is still in flight.
    pub fn tick(&mut self, dt: f64, tracer: &mut Tracer<'_>) -> bool {
        let instance = self.id;
        let Mode::Enhanced(run) = &mut self.mode else {
            return false;
        };
        let Some(tween) = run.tween.as_mut() else {
            return false;
        };
        match tween.advance(dt) {
            TweenStatus::Running(position) => run.timeline.seek(position),
            TweenStatus::Complete(position) => {
                run.timeline.seek(position);
                if let Some(done) = run.tween.take() {
                    tracer.tween_complete(&TweenEndEvent {
                        instance,
                        tween: done.id(),
                        position,
                    });
                }
                if let Some(next) = run.machine.completed() {
                    run.start(instance, next, tracer);
                }
            }
        }
        let running = run.tween.is_some();
        self.present();
        running
    }

    /// Handles a native scroll to `scroll_y`.
    ///
    /// Updates the pin trigger, toggling the gesture observer on boundary
    /// crossings, and returns the offset the host must scroll back to while
    /// the observer holds the page.
    pub fn on_scroll(&mut self, scroll_y: f64, tracer: &mut Tracer<'_>) -> Option<f64> {
        let instance = self.id;
        let Mode::Enhanced(run) = &mut self.mode else {
            return None;
        };
        run.scroll_y = scroll_y;
        if let Some(cause) = run.trigger.update(scroll_y) {
            let enabled = cause.is_entering();
            let toggled = if enabled {
                run.gesture.enable(scroll_y)
            } else {
                run.gesture.disable()
            };
            if toggled {
                tracer.gesture_toggle(&GestureToggleEvent {
                    instance,
                    cause,
                    enabled,
                    scroll_y,
                });
            }
        }
        let restore = run.gesture.restore_target(scroll_y);
        self.present();
        restore
    }

    /// Re-measures an enhanced controller after a layout change.
    ///
    /// `bounds` is the root's box as measured now, in document coordinates,
    /// including any pin translation this controller currently applies. The
    /// trigger range and the entering-card offset are resolved again against
    /// the current viewport, then the current scroll offset is re-applied.
    /// The static or enhanced decision made at activation is kept.
    pub fn relayout(&mut self, bounds: Rect, env: &impl Environment, tracer: &mut Tracer<'_>) {
        let applied = self.stage.pin().map_or(0.0, |pin| pin.offset);
        let Mode::Enhanced(run) = &mut self.mode else {
            return;
        };
        let anim = &self.options.animation;
        let viewport_height = env.viewport_height();
        run.trigger.set_bounds(TriggerBounds::resolve(
            &anim.start,
            &anim.end,
            bounds - Vec2::new(0.0, applied),
            viewport_height,
        ));
        run.timeline.set_entry_offset(viewport_height);
        let _ = self.on_scroll(env.scroll_y(), tracer);
    }

    /// Handles a wheel event. Positive `delta_y` requests the next card.
    pub fn on_wheel(&mut self, delta_y: f64, tracer: &mut Tracer<'_>) -> GestureResponse {
        let Mode::Enhanced(run) = &mut self.mode else {
            return GestureResponse::Ignored;
        };
        let response = run.gesture.on_wheel(delta_y);
        if let Some(direction) = response.direction() {
            self.request(direction, tracer);
        }
        response
    }

    /// Handles the start of a touch at vertical position `y`.
    pub fn on_touch_start(&mut self, y: f64) {
        if let Mode::Enhanced(run) = &mut self.mode {
            run.gesture.on_touch_start(y);
        }
    }

    /// Handles a touch moving to vertical position `y`.
    pub fn on_touch_move(&mut self, y: f64, tracer: &mut Tracer<'_>) -> GestureResponse {
        let Mode::Enhanced(run) = &mut self.mode else {
            return GestureResponse::Ignored;
        };
        let response = run.gesture.on_touch_move(y);
        if let Some(direction) = response.direction() {
            self.request(direction, tracer);
        }
        response
    }

    /// Handles the end of a touch.
    pub fn on_touch_end(&mut self) {
        if let Mode::Enhanced(run) = &mut self.mode {
            run.gesture.on_touch_end();
        }
    }

    /// Tears the controller down. Calling it again does nothing.
    pub fn destroy(&mut self, tracer: &mut Tracer<'_>) {
        let was_enhanced = match core::mem::replace(&mut self.mode, Mode::Destroyed) {
            Mode::Destroyed => return,
            Mode::Static(_) => false,
            Mode::Enhanced(mut run) => {
                run.machine.reset();
                run.cancel(self.id, tracer);
                run.gesture.kill();
                run.trigger.kill();
                self.stage.clear_poses();
                self.stage.set_pin(None);
                self.stage.set_markers(None, None);
                true
            }
        };
        tracer.teardown(&TeardownEvent {
            instance: self.id,
            was_enhanced,
        });
        self.present();
    }

    fn present(&mut self) {
        if let Mode::Enhanced(run) = &self.mode {
            for (idx, pose) in run.timeline.poses().enumerate() {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "card counts fit in u32"
                )]
                self.stage.set_pose(idx as u32, pose);
            }
            self.stage.set_pin(run.trigger.pin_style(run.scroll_y));
        }
        let changes = self.stage.evaluate();
        if !changes.is_empty() {
            self.presenter.apply(&self.stage, &changes);
        }
    }
}
