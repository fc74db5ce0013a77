// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves for settle animations.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Maps linear progress in `[0, 1]` to eased progress.
///
/// Built-in curves clamp their input to `[0, 1]` and satisfy
/// `apply(0) == 0` and `apply(1) == 1`. [`Easing::Custom`] is called as-is.
#[derive(Copy, Clone, Debug, Default)]
pub enum Easing {
    /// No easing.
    #[default]
    Linear,
    /// Quadratic deceleration.
    EaseOutQuad,
    /// Cubic deceleration.
    EaseOutCubic,
    /// Cubic acceleration then deceleration.
    EaseInOutCubic,
    /// Exponential deceleration with a long tail.
    EaseOutExpo,
    /// Caller-supplied curve.
    Custom(fn(f64) -> f64),
}

impl Easing {
    /// Applies the curve to `t`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let c = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => c,
            Self::EaseOutQuad => {
                let inv = 1.0 - c;
                1.0 - inv * inv
            }
            Self::EaseOutCubic => {
                let inv = 1.0 - c;
                1.0 - inv * inv * inv
            }
            Self::EaseInOutCubic => {
                if c < 0.5 {
                    4.0 * c * c * c
                } else {
                    let u = -2.0 * c + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            Self::EaseOutExpo => {
                if c >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f64.powf(-10.0 * c)
                }
            }
            Self::Custom(f) => f(t),
        }
    }
}
