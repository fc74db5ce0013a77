// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-driven settle animation.
//!
//! An [`AnimationPlan`] is fixed when the pointer is released. A
//! [`SettleAnimation`] walks that plan one frame at a time:
//!
//! 1. The first frame only records its timestamp as the start time. When the
//!    first frame is delivered depends on the host scheduler, so it must not
//!    count as elapsed progress.
//! 2. Every later frame computes `progress = min(1, elapsed / duration)` and
//!    interpolates between the start and end values with the plan's easing.
//! 3. At `progress >= 1` the animation reports [`FrameStep::Finished`] with the
//!    exact end value.
//!
//! ```
//! use understory_dangle::{AnimationPlan, Easing, FrameStep, SettleAnimation};
//!
//! let mut anim = SettleAnimation::new(AnimationPlan {
//!     start_value: 1.5,
//!     end_value: 2.0,
//!     target_step: 2,
//!     duration: 100.0,
//!     easing: Easing::Linear,
//! });
//!
//! assert_eq!(anim.advance(1000.0), FrameStep::Started);
//! assert_eq!(anim.advance(1050.0), FrameStep::Progress { value: 1.75, progress: 0.5 });
//! assert_eq!(anim.advance(1100.0), FrameStep::Finished { value: 2.0 });
//! ```

use crate::easing::Easing;

/// Immutable description of one settle.
#[derive(Copy, Clone, Debug)]
pub struct AnimationPlan {
    /// Value when the settle began.
    pub start_value: f64,
    /// Value of the target step.
    pub end_value: f64,
    /// Step the settle comes to rest on.
    pub target_step: i32,
    /// Duration in timestamp units. Non-positive durations finish on the
    /// first progress frame.
    pub duration: f64,
    /// Interpolation curve.
    pub easing: Easing,
}

impl AnimationPlan {
    /// Interpolated value at linear `progress`.
    ///
    /// Progress at or beyond `1` yields exactly [`end_value`](Self::end_value).
    #[must_use]
    pub fn value_at(&self, progress: f64) -> f64 {
        if progress >= 1.0 {
            return self.end_value;
        }
        self.start_value + (self.end_value - self.start_value) * self.easing.apply(progress)
    }

    /// Linear progress after `elapsed` time units, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, elapsed: f64) -> f64 {
        if self.duration > 0.0 {
            (elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Outcome of one animation frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FrameStep {
    /// First frame: the start time was recorded and nothing moved.
    Started,
    /// The animation moved and needs another frame.
    Progress {
        /// Value to apply.
        value: f64,
        /// Linear progress in `[0, 1)`.
        progress: f64,
    },
    /// The animation reached its end value.
    Finished {
        /// Final value to apply.
        value: f64,
    },
}

/// A settle in flight.
#[derive(Copy, Clone, Debug)]
pub struct SettleAnimation {
    plan: AnimationPlan,
    start_time: Option<f64>,
}

impl SettleAnimation {
    /// Creates an animation that has not seen a frame yet.
    #[must_use]
    pub fn new(plan: AnimationPlan) -> Self {
        Self {
            plan,
            start_time: None,
        }
    }

    /// The plan being executed.
    #[must_use]
    pub fn plan(&self) -> &AnimationPlan {
        &self.plan
    }

    /// Timestamp of the first frame, once one has been seen.
    #[must_use]
    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    /// Advances the animation to the frame at `now`.
    pub fn advance(&mut self, now: f64) -> FrameStep {
        let Some(start) = self.start_time else {
            self.start_time = Some(now);
            return FrameStep::Started;
        };
        let progress = self.plan.progress(now - start);
        if progress >= 1.0 {
            FrameStep::Finished {
                value: self.plan.end_value,
            }
        } else {
            FrameStep::Progress {
                value: self.plan.value_at(progress),
                progress,
            }
        }
    }
}
