// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gesture state machine.
//!
//! ## States
//!
//! - [`DangleState::Idle`]: at rest. A press starts provisional tracking,
//!   which still reports `Idle` until the drag threshold is crossed.
//! - [`DangleState::Holding`]: the pointer drives the value directly.
//! - [`DangleState::Dangling`]: released; a settle animation runs frame by
//!   frame towards a step.
//!
//! ## Transitions
//!
//! ```text
//!           press            move > holding_threshold
//!   Idle ───────────▶ Idle(tracking) ─────────────────────▶ Holding
//!    ▲                  │ move > orthogonal threshold,         │
//!    │                  │ or release (tap)                     │ release
//!    │◀─────────────────┘                                      ▼
//!    │◀──────────────── last frame ─────────────────────── Dangling
//!                                                              │ press
//!                                              Holding ◀───────┘
//! ```

use core::{fmt, mem};

use kurbo::Point;

use crate::anchor::{Anchor, ThresholdOutcome};
use crate::animation::{AnimationPlan, FrameStep, SettleAnimation};
use crate::host::{DangleHost, Listener};
use crate::mapping::StepRange;
use crate::notify::{ChangeNotifier, StepChanged, Subscription, ValueChanged};
use crate::options::{DangleOptions, DangleOptionsUpdate, OptionsError};
use crate::sampler::{Sample, VelocitySampler};
use crate::settle::{SettleDecision, SettleInput};

/// Publicly observable interaction state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DangleState {
    /// At rest, or pressed without having crossed a threshold yet.
    Idle,
    /// The pointer is dragging the value.
    Holding,
    /// A settle animation is running.
    Dangling,
}

#[derive(Debug)]
enum Phase<F> {
    Idle {
        tracking: Option<Anchor>,
    },
    Holding {
        start_value: f64,
        anchor: Anchor,
        sampler: VelocitySampler,
    },
    Dangling {
        animation: SettleAnimation,
        frame: F,
    },
}

enum MoveOutcome {
    Abandon,
    Promote,
    Drag(f64),
}

/// Drag-to-step engine bound to a host.
///
/// The host forwards input while the engine is listening for it and delivers
/// requested frames. All timestamps share one clock, in milliseconds by
/// convention.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use kurbo::Point;
/// use understory_dangle::{Dangle, DangleOptions, DangleState, PollingHost};
///
/// let options = DangleOptions {
///     stretch: 100.0,
///     max_step: 4,
///     dangling_duration: 100.0,
///     ..DangleOptions::default()
/// };
/// let mut dangle = Dangle::new(PollingHost::new(), options).unwrap();
///
/// let step = Rc::new(Cell::new(0));
/// let seen = Rc::clone(&step);
/// dangle.subscribe_step_changed(move |c| seen.set(c.step));
///
/// // Press, cross the threshold, then drag 150 px to the left.
/// dangle.press(&Point::new(500.0, 0.0));
/// dangle.pointer_move(&Point::new(480.0, 0.0), 0.0);
/// dangle.pointer_move(&Point::new(330.0, 0.0), 10.0);
/// assert_eq!(dangle.state(), DangleState::Holding);
/// assert_eq!(dangle.normalized_value(), 1.5);
///
/// // Release after resting: no flick, so settle on the nearest step.
/// dangle.release(500.0);
/// let mut now = 1000.0;
/// while let Some(frame) = dangle.host_mut().take_frame() {
///     dangle.frame(frame, now);
///     now += 16.0;
/// }
/// assert_eq!(dangle.state(), DangleState::Idle);
/// assert_eq!(dangle.normalized_value(), 2.0);
/// assert_eq!(step.get(), 2);
/// ```
pub struct Dangle<H: DangleHost, E = Point> {
    host: H,
    options: DangleOptions<E>,
    range: StepRange,
    notifier: ChangeNotifier,
    phase: Phase<H::FrameHandle>,
}

impl<H: DangleHost + fmt::Debug, E> fmt::Debug for Dangle<H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dangle")
            .field("host", &self.host)
            .field("options", &self.options)
            .field("range", &self.range)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl<H: DangleHost, E> Dangle<H, E> {
    /// Creates an engine resting at value `0` (clamped into the bounds) and
    /// attaches the press listener.
    pub fn new(mut host: H, options: DangleOptions<E>) -> Result<Self, OptionsError> {
        options.validate()?;
        let range = StepRange::new(options.bounds(), &*options.map_value_to_step);
        host.listen(Listener::Press);
        log::debug!("dangle: created at step {} within {:?}", range.step(), range.bounds());
        Ok(Self {
            host,
            options,
            range,
            notifier: ChangeNotifier::new(),
            phase: Phase::Idle { tracking: None },
        })
    }

    /// Shallow-merges `update` into the current options.
    ///
    /// Invalid results are rejected and leave the options untouched. When the
    /// bounds or mapper change, the current value and step are re-clamped and
    /// the usual notifications fire.
    pub fn set_options(&mut self, update: DangleOptionsUpdate<E>) -> Result<(), OptionsError> {
        let mut next = self.options.clone();
        next.merge(update);
        next.validate()?;
        self.options = next;
        let change = self
            .range
            .set_bounds(self.options.bounds(), &*self.options.map_value_to_step);
        self.notifier.emit(change, self.options.stretch);
        Ok(())
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &DangleOptions<E> {
        &self.options
    }

    /// Current value, scaled by `stretch` (event units).
    #[must_use]
    pub fn value(&self) -> f64 {
        self.range.value() * self.options.stretch
    }

    /// Current value in step units.
    #[must_use]
    pub fn normalized_value(&self) -> f64 {
        self.range.value()
    }

    /// Current step.
    #[must_use]
    pub fn step(&self) -> i32 {
        self.range.step()
    }

    /// Current interaction state.
    #[must_use]
    pub fn state(&self) -> DangleState {
        match self.phase {
            Phase::Idle { .. } => DangleState::Idle,
            Phase::Holding { .. } => DangleState::Holding,
            Phase::Dangling { .. } => DangleState::Dangling,
        }
    }

    /// The settle being animated, if any.
    #[must_use]
    pub fn animation_plan(&self) -> Option<&AnimationPlan> {
        match &self.phase {
            Phase::Dangling { animation, .. } => Some(animation.plan()),
            _ => None,
        }
    }

    /// Normalized value at which `step` rests, per the configured mapper.
    #[must_use]
    pub fn step_to_value(&self, step: i32) -> f64 {
        self.options.map_value_to_step.step_to_value(step)
    }

    /// Step nearest to a normalized `value`, per the configured mapper.
    #[must_use]
    pub fn value_to_step(&self, value: f64) -> i32 {
        self.options.map_value_to_step.value_to_step(value)
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Calls `callback` whenever the value strictly changes.
    pub fn subscribe_value_changed(
        &mut self,
        callback: impl FnMut(ValueChanged) + 'static,
    ) -> Subscription {
        self.notifier.subscribe_value(callback)
    }

    /// Calls `callback` whenever the step strictly changes.
    ///
    /// For one update, value subscribers always run first.
    pub fn subscribe_step_changed(
        &mut self,
        callback: impl FnMut(StepChanged) + 'static,
    ) -> Subscription {
        self.notifier.subscribe_step(callback)
    }

    /// Removes a subscription. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.notifier.unsubscribe(subscription)
    }

    /// Handles a press.
    ///
    /// From rest this starts provisional tracking. While dangling, the settle
    /// is interrupted and the engine holds at the value reached so far.
    /// Ignored when not interactable or while a gesture is already active.
    pub fn press(&mut self, event: &E) {
        if !self.options.interactable {
            log::trace!("dangle: press ignored, not interactable");
            return;
        }
        let position = self.options.position_of(event);
        match self.phase {
            Phase::Idle { tracking: None } => {
                self.phase = Phase::Idle {
                    tracking: Some(Anchor::new(position)),
                };
                self.attach_gesture_listeners();
            }
            Phase::Dangling { frame, .. } => {
                self.host.cancel_frame(frame);
                log::debug!("dangle: settle interrupted at value {}", self.range.value());
                self.enter_holding(Anchor::new(position));
                self.attach_gesture_listeners();
            }
            Phase::Idle { tracking: Some(_) } | Phase::Holding { .. } => {
                log::trace!("dangle: press ignored, gesture already active");
            }
        }
    }

    /// Handles pointer movement at time `now`.
    pub fn pointer_move(&mut self, event: &E, now: f64) {
        let position = self.options.position_of(event);
        let thresholds = self.options.hold_thresholds();
        let outcome = match &mut self.phase {
            Phase::Idle {
                tracking: Some(anchor),
            } => match thresholds.classify(anchor.displacement(position)) {
                ThresholdOutcome::Pending => return,
                ThresholdOutcome::Abandon => MoveOutcome::Abandon,
                ThresholdOutcome::Promote => MoveOutcome::Promote,
            },
            Phase::Holding {
                start_value,
                anchor,
                sampler,
            } => {
                let displacement = anchor.displacement(position).primary;
                sampler.push(Sample {
                    timestamp: now,
                    displacement,
                });
                MoveOutcome::Drag(*start_value + displacement / self.options.stretch)
            }
            Phase::Idle { tracking: None } | Phase::Dangling { .. } => {
                log::trace!("dangle: move ignored outside a gesture");
                return;
            }
        };

        match outcome {
            MoveOutcome::Abandon => {
                log::debug!("dangle: gesture abandoned for orthogonal travel");
                self.phase = Phase::Idle { tracking: None };
                self.detach_gesture_listeners();
            }
            MoveOutcome::Promote => {
                log::debug!("dangle: holding from value {}", self.range.value());
                self.enter_holding(Anchor::new(position));
            }
            MoveOutcome::Drag(next) => self.apply_value(next),
        }
    }

    /// Handles a release at time `now`.
    ///
    /// A tap returns to rest without changes. Releasing a drag asks the
    /// settle policy for a target and starts dangling towards it.
    pub fn release(&mut self, now: f64) {
        match mem::replace(&mut self.phase, Phase::Idle { tracking: None }) {
            Phase::Idle { tracking: Some(_) } => {
                log::trace!("dangle: tap released without a drag");
                self.detach_gesture_listeners();
            }
            Phase::Holding { sampler, .. } => {
                self.detach_gesture_listeners();
                let input = SettleInput {
                    velocity_proxy: sampler.velocity_proxy(now),
                    nearest_step: self.range.step(),
                    current_value: self.range.value(),
                };
                let decision = self.options.decide_settle(input);
                log::debug!("dangle: released with velocity proxy {}", input.velocity_proxy);
                self.start_settle(decision);
            }
            other => {
                log::trace!("dangle: release ignored outside a gesture");
                self.phase = other;
            }
        }
    }

    /// Delivers the frame identified by `handle` at time `now`.
    ///
    /// Frames that were cancelled or superseded, or that arrive while not
    /// dangling, are ignored.
    pub fn frame(&mut self, handle: H::FrameHandle, now: f64) {
        let step = match &mut self.phase {
            Phase::Dangling { animation, frame } if *frame == handle => animation.advance(now),
            _ => {
                log::trace!("dangle: stale frame {handle:?} ignored");
                return;
            }
        };
        match step {
            FrameStep::Started => self.request_next_frame(),
            FrameStep::Progress { value, progress } => {
                log::trace!("dangle: frame at progress {progress}");
                self.apply_value(value);
                self.request_next_frame();
            }
            FrameStep::Finished { value } => {
                self.phase = Phase::Idle { tracking: None };
                self.apply_value(value);
                log::debug!("dangle: settled on step {}", self.range.step());
            }
        }
    }

    /// Moves straight to `step` (clamped), cancelling any running settle.
    ///
    /// Ignored while holding.
    pub fn jump_to_step(&mut self, step: i32) {
        match self.phase {
            Phase::Holding { .. } => {
                log::trace!("dangle: jump ignored while holding");
                return;
            }
            Phase::Dangling { frame, .. } => {
                self.host.cancel_frame(frame);
                self.phase = Phase::Idle { tracking: None };
            }
            Phase::Idle { .. } => {}
        }
        let target = self.range.bounds().clamp_step(step);
        let value = self.step_to_value(target);
        self.apply_value(value);
    }

    /// Animates to `step` (clamped) with the configured duration and easing.
    ///
    /// Replaces a running settle and cancels a provisional press. Ignored
    /// while holding.
    pub fn settle_to_step(&mut self, step: i32) {
        match self.phase {
            Phase::Holding { .. } => {
                log::trace!("dangle: settle ignored while holding");
                return;
            }
            Phase::Dangling { frame, .. } => self.host.cancel_frame(frame),
            Phase::Idle { tracking: Some(_) } => self.detach_gesture_listeners(),
            Phase::Idle { tracking: None } => {}
        }
        self.start_settle(SettleDecision {
            target_step: step,
            duration: self.options.dangling_duration,
            easing: self.options.dangling_easing,
        });
    }

    /// Detaches every listener, cancels any pending frame, drops all
    /// subscribers and returns the host.
    pub fn dispose(mut self) -> H {
        match self.phase {
            Phase::Idle { tracking: Some(_) } | Phase::Holding { .. } => {
                self.detach_gesture_listeners();
            }
            Phase::Dangling { frame, .. } => self.host.cancel_frame(frame),
            Phase::Idle { tracking: None } => {}
        }
        self.host.unlisten(Listener::Press);
        self.notifier.clear();
        log::debug!("dangle: disposed at step {}", self.range.step());
        self.host
    }

    fn enter_holding(&mut self, anchor: Anchor) {
        self.phase = Phase::Holding {
            start_value: self.range.value(),
            anchor,
            sampler: VelocitySampler::new(),
        };
    }

    fn start_settle(&mut self, decision: SettleDecision) {
        let target_step = self.range.bounds().clamp_step(decision.target_step);
        let plan = AnimationPlan {
            start_value: self.range.value(),
            end_value: self.step_to_value(target_step),
            target_step,
            duration: decision.duration,
            easing: decision.easing,
        };
        log::debug!("dangle: settling from {} to step {target_step}", plan.start_value);
        let frame = self.host.request_frame();
        self.phase = Phase::Dangling {
            animation: SettleAnimation::new(plan),
            frame,
        };
    }

    fn request_next_frame(&mut self) {
        if let Phase::Dangling { frame, .. } = &mut self.phase {
            *frame = self.host.request_frame();
        }
    }

    fn apply_value(&mut self, raw: f64) {
        let change = self.range.set_value(raw, &*self.options.map_value_to_step);
        self.notifier.emit(change, self.options.stretch);
    }

    fn attach_gesture_listeners(&mut self) {
        self.host.listen(Listener::Move);
        self.host.listen(Listener::Release);
    }

    fn detach_gesture_listeners(&mut self) {
        self.host.unlisten(Listener::Move);
        self.host.unlisten(Listener::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use crate::easing::Easing;
    use crate::host::{FrameId, PollingHost};
    use crate::mapping::ScaledSteps;

    fn options() -> DangleOptions {
        DangleOptions {
            stretch: 100.0,
            min_step: 0,
            max_step: 4,
            dangling_duration: 100.0,
            ..DangleOptions::default()
        }
    }

    fn engine() -> Dangle<PollingHost> {
        Dangle::new(PollingHost::new(), options()).unwrap()
    }

    fn at(x: f64) -> Point {
        Point::new(x, 0.0)
    }

    /// Presses at 500 and promotes at 480, so later moves are relative to 480.
    fn hold(dangle: &mut Dangle<PollingHost>) {
        dangle.press(&at(500.0));
        dangle.pointer_move(&at(480.0), 0.0);
        assert_eq!(dangle.state(), DangleState::Holding);
    }

    fn run_frames(dangle: &mut Dangle<PollingHost>, mut now: f64, dt: f64) {
        while let Some(frame) = dangle.host_mut().take_frame() {
            dangle.frame(frame, now);
            now += dt;
        }
    }

    #[test]
    fn new_attaches_press_only() {
        let dangle = engine();
        assert!(dangle.host().is_listening(Listener::Press));
        assert!(!dangle.host().is_listening(Listener::Move));
        assert!(!dangle.host().is_listening(Listener::Release));
        assert_eq!(dangle.state(), DangleState::Idle);
        assert_eq!(dangle.step(), 0);
    }

    #[test]
    fn new_rejects_invalid_options() {
        let bad = DangleOptions {
            stretch: -1.0,
            ..options()
        };
        assert_eq!(
            Dangle::new(PollingHost::new(), bad).unwrap_err(),
            OptionsError::InvalidStretch(-1.0)
        );
    }

    #[test]
    fn new_clamps_initial_value_into_bounds() {
        let dangle = Dangle::new(
            PollingHost::new(),
            DangleOptions {
                min_step: 2,
                ..options()
            },
        )
        .unwrap();
        assert_eq!(dangle.normalized_value(), 2.0);
        assert_eq!(dangle.step(), 2);
    }

    #[test]
    fn press_attaches_gesture_listeners() {
        let mut dangle = engine();
        dangle.press(&at(10.0));
        assert!(dangle.host().is_listening(Listener::Move));
        assert!(dangle.host().is_listening(Listener::Release));
        assert_eq!(dangle.state(), DangleState::Idle);
    }

    #[test]
    fn press_is_ignored_when_not_interactable() {
        let mut dangle = engine();
        dangle
            .set_options(DangleOptionsUpdate::default().with_interactable(false))
            .unwrap();
        dangle.press(&at(10.0));
        assert!(!dangle.host().is_listening(Listener::Move));
    }

    #[test]
    fn small_moves_do_not_promote() {
        let mut dangle = engine();
        dangle.press(&at(500.0));
        dangle.pointer_move(&at(491.0), 0.0);
        dangle.pointer_move(&at(509.0), 1.0);
        assert_eq!(dangle.state(), DangleState::Idle);
        assert_eq!(dangle.normalized_value(), 0.0);
    }

    #[test]
    fn orthogonal_travel_abandons() {
        let mut dangle = engine();
        dangle.press(&Point::new(500.0, 100.0));
        dangle.pointer_move(&Point::new(470.0, 120.0), 0.0);
        assert_eq!(dangle.state(), DangleState::Idle);
        assert!(!dangle.host().is_listening(Listener::Move));
        assert!(!dangle.host().is_listening(Listener::Release));

        // Further moves are no-ops.
        dangle.pointer_move(&at(0.0), 1.0);
        assert_eq!(dangle.normalized_value(), 0.0);
    }

    #[test]
    fn holding_maps_displacement_through_stretch() {
        let mut dangle = engine();
        hold(&mut dangle);
        assert_eq!(dangle.normalized_value(), 0.0);

        dangle.pointer_move(&at(430.0), 5.0);
        assert_eq!(dangle.normalized_value(), 0.5);
        assert_eq!(dangle.value(), 50.0);
        assert_eq!(dangle.step(), 1);

        // Dragging the other way clamps at the lower bound.
        dangle.pointer_move(&at(900.0), 6.0);
        assert_eq!(dangle.normalized_value(), 0.0);
        assert_eq!(dangle.step(), 0);
    }

    #[test]
    fn second_press_while_holding_is_ignored() {
        let mut dangle = engine();
        hold(&mut dangle);
        dangle.pointer_move(&at(430.0), 5.0);
        dangle.press(&at(0.0));
        assert_eq!(dangle.state(), DangleState::Holding);
        dangle.pointer_move(&at(380.0), 6.0);
        assert_eq!(dangle.normalized_value(), 1.0);
    }

    #[test]
    fn release_starts_dangling_and_detaches() {
        let mut dangle = engine();
        hold(&mut dangle);
        dangle.pointer_move(&at(330.0), 10.0);
        dangle.release(500.0);

        assert_eq!(dangle.state(), DangleState::Dangling);
        assert!(!dangle.host().is_listening(Listener::Move));
        assert!(dangle.host().is_listening(Listener::Press));
        assert!(dangle.host().pending_frame().is_some());
        let plan = dangle.animation_plan().unwrap();
        assert_eq!(plan.start_value, 1.5);
        assert_eq!(plan.target_step, 2);
        assert_eq!(plan.end_value, 2.0);
    }

    #[test]
    fn first_frame_does_not_move() {
        let mut dangle = engine();
        hold(&mut dangle);
        dangle.pointer_move(&at(330.0), 10.0);
        dangle.release(500.0);

        let first = dangle.host_mut().take_frame().unwrap();
        dangle.frame(first, 1000.0);
        assert_eq!(dangle.normalized_value(), 1.5);

        let second = dangle.host_mut().take_frame().unwrap();
        dangle.frame(second, 1050.0);
        assert_eq!(dangle.normalized_value(), 1.75);

        let third = dangle.host_mut().take_frame().unwrap();
        dangle.frame(third, 1100.0);
        assert_eq!(dangle.normalized_value(), 2.0);
        assert_eq!(dangle.state(), DangleState::Idle);
        assert_eq!(dangle.host().pending_frame(), None);
    }

    #[test]
    fn stale_frames_are_ignored() {
        let mut dangle = engine();
        hold(&mut dangle);
        dangle.pointer_move(&at(330.0), 10.0);
        dangle.release(500.0);

        let first = dangle.host_mut().take_frame().unwrap();
        dangle.frame(first, 1000.0);
        // Re-delivering an already consumed handle does nothing.
        dangle.frame(first, 1050.0);
        assert_eq!(dangle.normalized_value(), 1.5);
    }

    #[test]
    fn frames_while_idle_are_ignored() {
        let mut dangle = engine();
        let mut host = PollingHost::new();
        let foreign: FrameId = host.request_frame();
        dangle.frame(foreign, 0.0);
        assert_eq!(dangle.state(), DangleState::Idle);
        assert_eq!(dangle.host().pending_frame(), None);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut dangle = engine();
        dangle.release(0.0);
        assert_eq!(dangle.state(), DangleState::Idle);
        assert!(!dangle.host().is_listening(Listener::Release));
    }

    #[test]
    fn tap_leaves_everything_untouched() {
        let mut dangle = engine();
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        dangle.subscribe_value_changed(move |_| *h.borrow_mut() += 1);

        dangle.press(&at(100.0));
        dangle.pointer_move(&at(95.0), 1.0);
        dangle.release(2.0);

        assert_eq!(*hits.borrow(), 0);
        assert_eq!(dangle.state(), DangleState::Idle);
        assert!(!dangle.host().is_listening(Listener::Move));
        assert_eq!(dangle.host().pending_frame(), None);
    }

    #[test]
    fn custom_settle_policy_is_used() {
        let mut dangle = engine();
        dangle
            .set_options(DangleOptionsUpdate::default().with_settle_policy(
                |input: SettleInput| SettleDecision {
                    target_step: input.nearest_step + 100,
                    duration: 0.0,
                    easing: Easing::Linear,
                },
            ))
            .unwrap();
        hold(&mut dangle);
        dangle.pointer_move(&at(430.0), 5.0);
        dangle.release(6.0);

        // The target is clamped to the bounds.
        assert_eq!(dangle.animation_plan().unwrap().target_step, 4);
        run_frames(&mut dangle, 10.0, 1.0);
        assert_eq!(dangle.step(), 4);
        assert_eq!(dangle.state(), DangleState::Idle);
    }

    #[test]
    fn jump_to_step_sets_value_immediately() {
        let mut dangle = engine();
        let steps = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&steps);
        dangle.subscribe_step_changed(move |c| s.borrow_mut().push(c.step));

        dangle.jump_to_step(3);
        assert_eq!(dangle.normalized_value(), 3.0);
        dangle.jump_to_step(99);
        assert_eq!(dangle.step(), 4);
        assert_eq!(*steps.borrow(), [3, 4]);
    }

    #[test]
    fn jump_cancels_a_running_settle() {
        let mut dangle = engine();
        dangle.settle_to_step(4);
        assert_eq!(dangle.state(), DangleState::Dangling);
        dangle.jump_to_step(1);
        assert_eq!(dangle.state(), DangleState::Idle);
        assert_eq!(dangle.host().pending_frame(), None);
        assert_eq!(dangle.step(), 1);
    }

    #[test]
    fn settle_to_step_animates() {
        let mut dangle = engine();
        dangle.settle_to_step(2);
        run_frames(&mut dangle, 0.0, 25.0);
        assert_eq!(dangle.normalized_value(), 2.0);
        assert_eq!(dangle.state(), DangleState::Idle);
    }

    #[test]
    fn programmatic_stepping_is_ignored_while_holding() {
        let mut dangle = engine();
        hold(&mut dangle);
        dangle.jump_to_step(3);
        dangle.settle_to_step(3);
        assert_eq!(dangle.state(), DangleState::Holding);
        assert_eq!(dangle.normalized_value(), 0.0);
    }

    #[test]
    fn settle_to_step_cancels_a_provisional_press() {
        let mut dangle = engine();
        dangle.press(&at(10.0));
        dangle.settle_to_step(1);
        assert!(!dangle.host().is_listening(Listener::Move));
        assert_eq!(dangle.state(), DangleState::Dangling);
    }

    #[test]
    fn shrinking_bounds_reclamps_and_notifies() {
        let mut dangle = engine();
        dangle.jump_to_step(4);
        let steps = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&steps);
        dangle.subscribe_step_changed(move |c| s.borrow_mut().push((c.previous, c.step)));

        dangle
            .set_options(DangleOptionsUpdate::default().with_steps(0, 2))
            .unwrap();
        assert_eq!(dangle.normalized_value(), 2.0);
        assert_eq!(*steps.borrow(), [(4, 2)]);
    }

    #[test]
    fn changing_mapper_reclamps() {
        let mut dangle = engine();
        dangle.jump_to_step(2);
        dangle
            .set_options(DangleOptionsUpdate::default().with_step_mapper(ScaledSteps::new(0.5)))
            .unwrap();
        // Value 2.0 exceeds the new maximum of 4 * 0.5.
        assert_eq!(dangle.normalized_value(), 2.0);
        assert_eq!(dangle.step(), 4);
        assert_eq!(dangle.step_to_value(1), 0.5);
        assert_eq!(dangle.value_to_step(1.0), 2);
    }

    #[test]
    fn rejected_update_leaves_options_untouched() {
        let mut dangle = engine();
        let err = dangle
            .set_options(
                DangleOptionsUpdate::default()
                    .with_flick_threshold(1.0)
                    .with_steps(5, 1),
            )
            .unwrap_err();
        assert!(matches!(err, OptionsError::InvertedSteps { .. }));
        assert_eq!(dangle.options().flick_threshold, 50.0);
        assert_eq!(dangle.options().max_step, 4);
    }

    #[test]
    fn mapper_with_non_finite_bounds_is_rejected() {
        let mut dangle = engine();
        dangle.jump_to_step(2);
        let err = dangle
            .set_options(
                DangleOptionsUpdate::default().with_step_mapper(ScaledSteps::new(f64::INFINITY)),
            )
            .unwrap_err();
        assert!(
            matches!(err, OptionsError::NonFiniteStepValues { .. }),
            "got {err:?}"
        );
        assert_eq!(dangle.step_to_value(3), 3.0);
        assert_eq!(dangle.normalized_value(), 2.0);
        assert_eq!(dangle.step(), 2);
    }

    #[test]
    fn set_options_mid_hold_keeps_phase() {
        let mut dangle = engine();
        hold(&mut dangle);
        dangle.pointer_move(&at(430.0), 10.0);
        assert_eq!(dangle.normalized_value(), 0.5);

        dangle
            .set_options(DangleOptionsUpdate::default().with_flick_threshold(80.0))
            .unwrap();
        assert_eq!(dangle.state(), DangleState::Holding);
        assert_eq!(dangle.normalized_value(), 0.5);
        assert!(dangle.host().is_listening(Listener::Move));

        // Still measured from the promotion point at 480.
        dangle.pointer_move(&at(380.0), 20.0);
        assert_eq!(dangle.normalized_value(), 1.0);
        assert_eq!(dangle.step(), 1);
    }

    #[test]
    fn set_options_mid_settle_keeps_animating() {
        let mut dangle = engine();
        hold(&mut dangle);
        dangle.pointer_move(&at(330.0), 10.0);
        dangle.release(500.0);
        let first = dangle.host_mut().take_frame().unwrap();
        dangle.frame(first, 1000.0);
        let pending = dangle.host().pending_frame();
        assert!(pending.is_some(), "the settle asks for a second frame");

        dangle
            .set_options(DangleOptionsUpdate::default().with_steps(0, 1))
            .unwrap();
        assert_eq!(dangle.state(), DangleState::Dangling);
        assert_eq!(dangle.normalized_value(), 1.0);
        assert_eq!(dangle.step(), 1);
        assert_eq!(dangle.host().pending_frame(), pending);
        assert_eq!(dangle.animation_plan().unwrap().target_step, 2);

        // The animation heads for 2.0 but every frame lands on the new maximum.
        let second = dangle.host_mut().take_frame().unwrap();
        dangle.frame(second, 1050.0);
        assert_eq!(dangle.normalized_value(), 1.0);
        assert_eq!(dangle.state(), DangleState::Dangling);

        let third = dangle.host_mut().take_frame().unwrap();
        dangle.frame(third, 1100.0);
        assert_eq!(dangle.state(), DangleState::Idle);
        assert_eq!(dangle.normalized_value(), 1.0);
        assert_eq!(dangle.step(), 1);
        assert_eq!(dangle.host().pending_frame(), None);
    }

    #[test]
    fn unsubscribed_callbacks_stop_firing() {
        let mut dangle = engine();
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        let sub = dangle.subscribe_value_changed(move |_| *h.borrow_mut() += 1);

        dangle.jump_to_step(1);
        assert!(dangle.unsubscribe(sub));
        dangle.jump_to_step(2);

        assert_eq!(*hits.borrow(), 1);
        assert!(!dangle.unsubscribe(sub));
    }

    #[test]
    fn dispose_while_holding_detaches_everything() {
        let mut dangle = engine();
        hold(&mut dangle);
        let host = dangle.dispose();
        assert!(!host.has_listeners());
    }

    #[test]
    fn dispose_while_dangling_cancels_the_frame() {
        let mut dangle = engine();
        dangle.settle_to_step(3);
        let host = dangle.dispose();
        assert!(!host.has_listeners());
        assert_eq!(host.pending_frame(), None);
    }

    #[test]
    fn vertical_options_drive_from_y() {
        let mut dangle = Dangle::new(
            PollingHost::new(),
            DangleOptions {
                stretch: 100.0,
                max_step: 4,
                ..DangleOptions::vertical()
            },
        )
        .unwrap();
        dangle.press(&Point::new(0.0, 500.0));
        dangle.pointer_move(&Point::new(0.0, 480.0), 0.0);
        dangle.pointer_move(&Point::new(0.0, 380.0), 1.0);
        assert_eq!(dangle.normalized_value(), 1.0);
    }
}
