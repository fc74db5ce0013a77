// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping between continuous value space and discrete step space.
//!
//! A [`StepMapper`] converts steps to values and back. [`StepBounds`] clamps
//! both quantities to a configured step range, and [`StepRange`] holds the
//! current value/step pair and is the only place either of them is mutated.
//!
//! ## Minimal example
//!
//! ```
//! use understory_dangle::{StepBounds, StepRange, UniformSteps};
//!
//! let mut range = StepRange::new(StepBounds::new(0, 4), &UniformSteps);
//!
//! let change = range.set_value(1.5, &UniformSteps);
//! assert_eq!(change.value, Some(1.5));
//! assert_eq!(change.step, Some((0, 2)));
//!
//! // Out-of-range values clamp to the last step.
//! range.set_value(9.0, &UniformSteps);
//! assert_eq!(range.value(), 4.0);
//! assert_eq!(range.step(), 4);
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Converts between step space and value space.
///
/// Implementations should be monotonic so that clamping in value space and
/// clamping in step space agree.
pub trait StepMapper {
    /// Returns the value at which `step` rests.
    fn step_to_value(&self, step: i32) -> f64;

    /// Returns the step nearest to `value`.
    fn value_to_step(&self, value: f64) -> i32;
}

/// Rounds the magnitude of `value` half up and re-applies its sign.
///
/// `1.5` rounds to `2` and `-1.5` rounds to `-2`. Non-finite inputs saturate
/// (`NaN` maps to `0`).
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "float to int casts saturate, which is the documented behavior"
)]
pub fn round_half_up_magnitude(value: f64) -> i32 {
    let magnitude = (value.abs() + 0.5).floor();
    let signed = if value < 0.0 { -magnitude } else { magnitude };
    signed as i32
}

/// One step per unit of value: `step_to_value(n) == n`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct UniformSteps;

impl StepMapper for UniformSteps {
    fn step_to_value(&self, step: i32) -> f64 {
        f64::from(step)
    }

    fn value_to_step(&self, value: f64) -> i32 {
        round_half_up_magnitude(value)
    }
}

/// Evenly spaced steps, `scale` value units apart.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScaledSteps {
    /// Distance in value space between two neighboring steps.
    pub scale: f64,
}

impl ScaledSteps {
    /// Creates a mapper with the given spacing between steps.
    #[must_use]
    pub const fn new(scale: f64) -> Self {
        Self { scale }
    }
}

impl StepMapper for ScaledSteps {
    fn step_to_value(&self, step: i32) -> f64 {
        f64::from(step) * self.scale
    }

    fn value_to_step(&self, value: f64) -> i32 {
        round_half_up_magnitude(value / self.scale)
    }
}

/// A [`StepMapper`] assembled from a pair of closures.
///
/// Useful for non-uniform layouts (for example slides of varying width):
///
/// ```
/// use understory_dangle::{FnStepMapper, StepMapper};
///
/// // Steps get twice as far apart as the index grows.
/// let mapper = FnStepMapper::new(
///     |step: i32| f64::from(step * step),
///     |value: f64| value.max(0.0).sqrt().round() as i32,
/// );
/// assert_eq!(mapper.step_to_value(3), 9.0);
/// assert_eq!(mapper.value_to_step(8.0), 3);
/// ```
#[derive(Clone, Copy)]
pub struct FnStepMapper<S, V> {
    to_value: S,
    to_step: V,
}

impl<S, V> FnStepMapper<S, V>
where
    S: Fn(i32) -> f64,
    V: Fn(f64) -> i32,
{
    /// Creates a mapper from `step -> value` and `value -> step` functions.
    pub const fn new(to_value: S, to_step: V) -> Self {
        Self { to_value, to_step }
    }
}

impl<S, V> core::fmt::Debug for FnStepMapper<S, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnStepMapper").finish_non_exhaustive()
    }
}

impl<S, V> StepMapper for FnStepMapper<S, V>
where
    S: Fn(i32) -> f64,
    V: Fn(f64) -> i32,
{
    fn step_to_value(&self, step: i32) -> f64 {
        (self.to_value)(step)
    }

    fn value_to_step(&self, value: f64) -> i32 {
        (self.to_step)(value)
    }
}

/// Inclusive range of permitted steps.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StepBounds {
    min_step: i32,
    max_step: i32,
}

impl StepBounds {
    /// Creates bounds covering `min_step..=max_step`.
    ///
    /// The pair is normalized so that `min_step <= max_step`.
    #[must_use]
    pub const fn new(min_step: i32, max_step: i32) -> Self {
        if min_step <= max_step {
            Self { min_step, max_step }
        } else {
            Self {
                min_step: max_step,
                max_step: min_step,
            }
        }
    }

    /// Lowest permitted step.
    #[must_use]
    pub const fn min_step(&self) -> i32 {
        self.min_step
    }

    /// Highest permitted step.
    #[must_use]
    pub const fn max_step(&self) -> i32 {
        self.max_step
    }

    /// Clamps `step` into `[min_step, max_step]`.
    #[must_use]
    pub fn clamp_step(&self, step: i32) -> i32 {
        step.clamp(self.min_step, self.max_step)
    }

    /// Returns the permitted value interval as `(low, high)`.
    ///
    /// The endpoints are the mapped bounds, ordered so that a decreasing
    /// mapper still yields a valid interval.
    #[must_use]
    pub fn value_bounds<M: StepMapper + ?Sized>(&self, mapper: &M) -> (f64, f64) {
        let a = mapper.step_to_value(self.min_step);
        let b = mapper.step_to_value(self.max_step);
        if a <= b { (a, b) } else { (b, a) }
    }

    /// Clamps `value` into `[step_to_value(min_step), step_to_value(max_step)]`.
    #[must_use]
    pub fn clamp_value<M: StepMapper + ?Sized>(&self, value: f64, mapper: &M) -> f64 {
        let (low, high) = self.value_bounds(mapper);
        // Not `f64::clamp`, which panics on NaN bounds.
        value.max(low).min(high)
    }
}

/// What a [`StepRange::set_value`] call changed.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Change {
    /// The new value, if it differs from the previous one.
    pub value: Option<f64>,
    /// `(previous, current)` step, if the step changed.
    pub step: Option<(i32, i32)>,
}

impl Change {
    /// Returns `true` if neither quantity changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.step.is_none()
    }
}

/// The current value/step pair, always within its bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepRange {
    bounds: StepBounds,
    value: f64,
    step: i32,
}

impl StepRange {
    /// Creates a range resting at value `0.0`, clamped into `bounds`.
    #[must_use]
    pub fn new<M: StepMapper + ?Sized>(bounds: StepBounds, mapper: &M) -> Self {
        let value = bounds.clamp_value(0.0, mapper);
        let step = bounds.clamp_step(mapper.value_to_step(value));
        Self {
            bounds,
            value,
            step,
        }
    }

    /// Current (normalized) value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Current step.
    #[must_use]
    pub fn step(&self) -> i32 {
        self.step
    }

    /// Current bounds.
    #[must_use]
    pub fn bounds(&self) -> StepBounds {
        self.bounds
    }

    /// Replaces the bounds and re-clamps the current value against them.
    pub fn set_bounds<M: StepMapper + ?Sized>(&mut self, bounds: StepBounds, mapper: &M) -> Change {
        self.bounds = bounds;
        self.set_value(self.value, mapper)
    }

    /// Sets the value, deriving the step from it.
    ///
    /// The value is clamped, the step is computed from the clamped value and
    /// clamped as well. The returned [`Change`] only reports quantities that
    /// strictly differ from before. `NaN` is ignored.
    pub fn set_value<M: StepMapper + ?Sized>(&mut self, raw: f64, mapper: &M) -> Change {
        if raw.is_nan() {
            return Change::default();
        }
        let value = self.bounds.clamp_value(raw, mapper);
        let step = self.bounds.clamp_step(mapper.value_to_step(value));

        let mut change = Change::default();
        if value != self.value {
            self.value = value;
            change.value = Some(value);
        }
        if step != self.step {
            change.step = Some((self.step, step));
            self.step = step;
        }
        change
    }
}
