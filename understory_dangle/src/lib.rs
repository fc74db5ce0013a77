// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_dangle --heading-base-level=0

//! Understory Dangle: drag-to-step gestures with momentum settling.
//!
//! This crate turns continuous pointer movement into a bounded integer step,
//! such as the active slide of a carousel or the page of a pager. While the
//! pointer is down the value follows it; on release the value "dangles" into
//! the nearest step, or one step further when the release was a flick.
//!
//! The engine is a host-agnostic state machine. It never renders and never
//! talks to a windowing system. The host:
//!
//! - forwards press, move and release events while the engine listens for
//!   them (see [`DangleHost`] and [`Listener`]),
//! - delivers the frames the engine requests,
//! - reads [`Dangle::value`] / [`Dangle::step`] or subscribes to change
//!   notifications to lay out its content.
//!
//! ## Gesture lifecycle
//!
//! 1. **Press**: provisional tracking starts. Nothing moves yet.
//! 2. **Threshold**: once the pointer travels past `holding_threshold` along
//!    the primary axis the engine starts *holding*. Travel past
//!    `holding_orthogonal_threshold` across the axis abandons the gesture so
//!    the host can scroll instead.
//! 3. **Holding**: the value tracks `start_value + displacement / stretch`,
//!    clamped to the step bounds. Recent moves are sampled for momentum.
//! 4. **Release**: a [`SettlePolicy`] picks a target step from the velocity
//!    proxy and the nearest step, and the engine starts *dangling*.
//! 5. **Dangling**: the value animates frame by frame towards the target.
//!    A press interrupts the animation and holds at the value reached so far.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_dangle::{Dangle, DangleOptions, DangleState, PollingHost};
//!
//! let options = DangleOptions {
//!     // 320 px per slide, five slides.
//!     stretch: 320.0,
//!     max_step: 4,
//!     ..DangleOptions::default()
//! };
//! let mut carousel = Dangle::new(PollingHost::new(), options).unwrap();
//!
//! carousel.press(&Point::new(600.0, 200.0));
//! carousel.pointer_move(&Point::new(580.0, 200.0), 0.0);
//! carousel.pointer_move(&Point::new(100.0, 205.0), 40.0);
//! assert_eq!(carousel.state(), DangleState::Holding);
//! assert_eq!(carousel.step(), 2);
//!
//! // A quick release flicks one step further.
//! carousel.release(60.0);
//! let mut now = 60.0;
//! while let Some(frame) = carousel.host_mut().take_frame() {
//!     carousel.frame(frame, now);
//!     now += 16.0;
//! }
//! assert_eq!(carousel.step(), 3);
//! ```
//!
//! ## Building blocks
//!
//! The pieces the engine is made of are public so hosts can reuse them:
//!
//! - [`StepMapper`], [`StepBounds`] and [`StepRange`] for value/step mapping
//!   and clamping,
//! - [`VelocitySampler`] for the windowed velocity proxy,
//! - [`SettlePolicy`] and [`FlickPolicy`] for release decisions,
//! - [`SettleAnimation`] and [`Easing`] for frame-driven interpolation,
//! - [`Anchor`] and [`HoldThresholds`] for gesture disambiguation.
//!
//! ## Features
//!
//! - `std` (default): compile against the standard library.
//! - `libm`: float math through `libm` for `no_std` targets.
//!
//! This crate is `no_std` compatible (with `alloc`). Diagnostics go through
//! the [`log`] facade; no logger is installed.

#![no_std]

extern crate alloc;

mod anchor;
mod animation;
mod easing;
mod engine;
mod host;
mod mapping;
mod notify;
mod options;
mod sampler;
mod settle;

pub use anchor::{Anchor, Displacement, HoldThresholds, Position, ThresholdOutcome};
pub use animation::{AnimationPlan, FrameStep, SettleAnimation};
pub use easing::Easing;
pub use engine::{Dangle, DangleState};
pub use host::{DangleHost, FrameId, Listener, PollingHost};
pub use mapping::{
    Change, FnStepMapper, ScaledSteps, StepBounds, StepMapper, StepRange, UniformSteps,
    round_half_up_magnitude,
};
pub use notify::{
    ChangeNotifier, Notifier, StepChanged, SubscriberId, Subscription, Topic, ValueChanged,
};
pub use options::{AxisExtractor, DangleOptions, DangleOptionsUpdate, OptionsError};
pub use sampler::{SAMPLE_CAPACITY, Sample, VELOCITY_WINDOW, VelocitySampler};
pub use settle::{FlickPolicy, SettleDecision, SettleInput, SettlePolicy};
