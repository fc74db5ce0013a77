// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Settle policies: decide where a released drag comes to rest.

use crate::easing::Easing;

/// What a [`SettlePolicy`] sees when the pointer is released.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SettleInput {
    /// Windowed sum of recent displacements (see [`VelocitySampler`](crate::VelocitySampler)).
    pub velocity_proxy: f64,
    /// Step nearest to the current value, already clamped to the bounds.
    pub nearest_step: i32,
    /// Current normalized value.
    pub current_value: f64,
}

/// Where and how to settle.
///
/// The engine clamps `target_step` to the configured bounds before building
/// the animation plan.
#[derive(Copy, Clone, Debug)]
pub struct SettleDecision {
    /// Step to come to rest on.
    pub target_step: i32,
    /// Animation duration, in the same units as event timestamps.
    pub duration: f64,
    /// Curve used to interpolate towards the target.
    pub easing: Easing,
}

/// Trait for release policies.
///
/// Closures of the form `Fn(SettleInput) -> SettleDecision` implement this
/// trait, so a one-off policy does not need a named type:
///
/// ```
/// use understory_dangle::{Easing, SettleDecision, SettleInput, SettlePolicy};
///
/// // Always return to the nearest step, quickly.
/// let snap = |input: SettleInput| SettleDecision {
///     target_step: input.nearest_step,
///     duration: 120.0,
///     easing: Easing::EaseOutCubic,
/// };
/// let decision = snap.decide(SettleInput {
///     velocity_proxy: 900.0,
///     nearest_step: 2,
///     current_value: 2.2,
/// });
/// assert_eq!(decision.target_step, 2);
/// ```
pub trait SettlePolicy {
    /// Decides the settle target for a release.
    fn decide(&self, input: SettleInput) -> SettleDecision;
}

impl<F> SettlePolicy for F
where
    F: Fn(SettleInput) -> SettleDecision,
{
    fn decide(&self, input: SettleInput) -> SettleDecision {
        self(input)
    }
}

/// Default policy: snap to the nearest step, or one past it on a flick.
///
/// A release is a flick when `|velocity_proxy| > flick_threshold`; the target
/// then moves one step in the direction of the proxy.
#[derive(Copy, Clone, Debug)]
pub struct FlickPolicy {
    /// Minimum absolute velocity proxy that counts as a flick.
    pub flick_threshold: f64,
    /// Duration of the settle animation.
    pub duration: f64,
    /// Easing of the settle animation.
    pub easing: Easing,
}

impl SettlePolicy for FlickPolicy {
    fn decide(&self, input: SettleInput) -> SettleDecision {
        let velocity = input.velocity_proxy;
        let direction = if velocity.abs() > self.flick_threshold {
            if velocity > 0.0 { 1 } else { -1 }
        } else {
            0
        };
        SettleDecision {
            target_step: input.nearest_step.saturating_add(direction),
            duration: self.duration,
            easing: self.easing,
        }
    }
}
