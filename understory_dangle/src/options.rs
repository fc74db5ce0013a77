// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.
//!
//! [`DangleOptions`] is the full configuration of a [`Dangle`](crate::Dangle).
//! Every field has a default. Later changes go through
//! [`DangleOptionsUpdate`], whose fields are all optional: unset fields keep
//! their previous value (a shallow merge).
//!
//! ```
//! use understory_dangle::{DangleOptions, DangleOptionsUpdate, Easing};
//!
//! let mut options = DangleOptions::default();
//! options.merge(
//!     DangleOptionsUpdate::default()
//!         .with_stretch(320.0)
//!         .with_steps(0, 9)
//!         .with_dangling_easing(Easing::EaseOutCubic),
//! );
//! assert_eq!(options.stretch, 320.0);
//! assert_eq!(options.max_step, 9);
//! // Untouched fields keep their defaults.
//! assert_eq!(options.holding_threshold, 10.0);
//! assert!(options.validate().is_ok());
//! ```

use alloc::rc::Rc;
use core::fmt;

use kurbo::Point;

use crate::anchor::{HoldThresholds, Position};
use crate::easing::Easing;
use crate::mapping::{StepBounds, StepMapper, UniformSteps};
use crate::settle::{FlickPolicy, SettleDecision, SettleInput, SettlePolicy};

/// Extracts one axis coordinate from a host event.
pub type AxisExtractor<E> = Rc<dyn Fn(&E) -> f64>;

/// Configuration of a [`Dangle`](crate::Dangle) engine.
///
/// Distances are in event coordinate units, durations in timestamp units
/// (milliseconds by convention).
pub struct DangleOptions<E = Point> {
    /// Primary-axis travel that promotes a press into a drag.
    pub holding_threshold: f64,
    /// Orthogonal travel that abandons a press as a scroll.
    pub holding_orthogonal_threshold: f64,
    /// Velocity proxy above which a release advances one extra step.
    pub flick_threshold: f64,
    /// Event units per value unit. Must be finite and positive.
    pub stretch: f64,
    /// Lowest reachable step.
    pub min_step: i32,
    /// Highest reachable step.
    pub max_step: i32,
    /// Offset reserved for the host's rendered transform. The engine stores
    /// it but does not use it.
    pub padding: f64,
    /// When `false`, presses are ignored.
    pub interactable: bool,
    /// Duration of the default settle animation.
    pub dangling_duration: f64,
    /// Easing of the default settle animation.
    pub dangling_easing: Easing,
    /// Primary-axis coordinate of an event.
    pub map_event_to_position: AxisExtractor<E>,
    /// Orthogonal-axis coordinate of an event.
    pub map_event_to_orthogonal_position: AxisExtractor<E>,
    /// Custom release policy. `None` uses a [`FlickPolicy`] built from
    /// `flick_threshold`, `dangling_duration` and `dangling_easing`.
    pub map_position_to_settle_plan: Option<Rc<dyn SettlePolicy>>,
    /// Conversion between values and steps.
    pub map_value_to_step: Rc<dyn StepMapper>,
}

impl<E> DangleOptions<E> {
    /// Default options for an event type with the given axis extractors.
    pub fn with_extractors(
        primary: impl Fn(&E) -> f64 + 'static,
        orthogonal: impl Fn(&E) -> f64 + 'static,
    ) -> Self {
        Self {
            holding_threshold: 10.0,
            holding_orthogonal_threshold: 10.0,
            flick_threshold: 50.0,
            stretch: 1.0,
            min_step: 0,
            max_step: i32::MAX,
            padding: 0.0,
            interactable: true,
            dangling_duration: 300.0,
            dangling_easing: Easing::Linear,
            map_event_to_position: Rc::new(primary),
            map_event_to_orthogonal_position: Rc::new(orthogonal),
            map_position_to_settle_plan: None,
            map_value_to_step: Rc::new(UniformSteps),
        }
    }

    /// The configured step bounds.
    #[must_use]
    pub fn bounds(&self) -> StepBounds {
        StepBounds::new(self.min_step, self.max_step)
    }

    /// The thresholds used to classify a provisional gesture.
    #[must_use]
    pub fn hold_thresholds(&self) -> HoldThresholds {
        HoldThresholds {
            primary: self.holding_threshold,
            orthogonal: self.holding_orthogonal_threshold,
        }
    }

    /// The policy used when no custom settle policy is configured.
    #[must_use]
    pub fn flick_policy(&self) -> FlickPolicy {
        FlickPolicy {
            flick_threshold: self.flick_threshold,
            duration: self.dangling_duration,
            easing: self.dangling_easing,
        }
    }

    /// Runs the configured settle policy.
    pub(crate) fn decide_settle(&self, input: SettleInput) -> SettleDecision {
        match &self.map_position_to_settle_plan {
            Some(policy) => policy.decide(input),
            None => self.flick_policy().decide(input),
        }
    }

    /// Splits `event` into its axis coordinates.
    pub fn position_of(&self, event: &E) -> Position {
        Position::new(
            (self.map_event_to_position)(event),
            (self.map_event_to_orthogonal_position)(event),
        )
    }

    /// Checks that the options describe a usable engine.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.min_step > self.max_step {
            return Err(OptionsError::InvertedSteps {
                min_step: self.min_step,
                max_step: self.max_step,
            });
        }
        let (low, high) = self.bounds().value_bounds(&*self.map_value_to_step);
        if !(low.is_finite() && high.is_finite()) {
            return Err(OptionsError::NonFiniteStepValues { low, high });
        }
        if !(self.stretch.is_finite() && self.stretch > 0.0) {
            return Err(OptionsError::InvalidStretch(self.stretch));
        }
        for (name, value) in [
            ("holding_threshold", self.holding_threshold),
            ("holding_orthogonal_threshold", self.holding_orthogonal_threshold),
            ("flick_threshold", self.flick_threshold),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(OptionsError::InvalidThreshold { name, value });
            }
        }
        if !(self.dangling_duration.is_finite() && self.dangling_duration >= 0.0) {
            return Err(OptionsError::InvalidDuration(self.dangling_duration));
        }
        Ok(())
    }

    /// Applies every field set in `update`, leaving the rest as they are.
    ///
    /// No validation happens here; see [`validate`](Self::validate).
    pub fn merge(&mut self, update: DangleOptionsUpdate<E>) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        let DangleOptionsUpdate {
            holding_threshold,
            holding_orthogonal_threshold,
            flick_threshold,
            stretch,
            min_step,
            max_step,
            padding,
            interactable,
            dangling_duration,
            dangling_easing,
            map_event_to_position,
            map_event_to_orthogonal_position,
            map_position_to_settle_plan,
            map_value_to_step,
        } = update;

        set(&mut self.holding_threshold, holding_threshold);
        set(
            &mut self.holding_orthogonal_threshold,
            holding_orthogonal_threshold,
        );
        set(&mut self.flick_threshold, flick_threshold);
        set(&mut self.stretch, stretch);
        set(&mut self.min_step, min_step);
        set(&mut self.max_step, max_step);
        set(&mut self.padding, padding);
        set(&mut self.interactable, interactable);
        set(&mut self.dangling_duration, dangling_duration);
        set(&mut self.dangling_easing, dangling_easing);
        set(&mut self.map_event_to_position, map_event_to_position);
        set(
            &mut self.map_event_to_orthogonal_position,
            map_event_to_orthogonal_position,
        );
        set(
            &mut self.map_position_to_settle_plan,
            map_position_to_settle_plan,
        );
        set(&mut self.map_value_to_step, map_value_to_step);
    }
}

impl DangleOptions<Point> {
    /// Default options for a vertical gesture: `y` is primary, `x` orthogonal.
    #[must_use]
    pub fn vertical() -> Self {
        Self::with_extractors(|p: &Point| p.y, |p: &Point| p.x)
    }
}

impl Default for DangleOptions<Point> {
    /// Horizontal gesture: `x` is primary, `y` orthogonal.
    fn default() -> Self {
        Self::with_extractors(|p: &Point| p.x, |p: &Point| p.y)
    }
}

impl<E> Clone for DangleOptions<E> {
    fn clone(&self) -> Self {
        Self {
            holding_threshold: self.holding_threshold,
            holding_orthogonal_threshold: self.holding_orthogonal_threshold,
            flick_threshold: self.flick_threshold,
            stretch: self.stretch,
            min_step: self.min_step,
            max_step: self.max_step,
            padding: self.padding,
            interactable: self.interactable,
            dangling_duration: self.dangling_duration,
            dangling_easing: self.dangling_easing,
            map_event_to_position: Rc::clone(&self.map_event_to_position),
            map_event_to_orthogonal_position: Rc::clone(&self.map_event_to_orthogonal_position),
            map_position_to_settle_plan: self.map_position_to_settle_plan.clone(),
            map_value_to_step: Rc::clone(&self.map_value_to_step),
        }
    }
}

impl<E> fmt::Debug for DangleOptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DangleOptions")
            .field("holding_threshold", &self.holding_threshold)
            .field(
                "holding_orthogonal_threshold",
                &self.holding_orthogonal_threshold,
            )
            .field("flick_threshold", &self.flick_threshold)
            .field("stretch", &self.stretch)
            .field("min_step", &self.min_step)
            .field("max_step", &self.max_step)
            .field("padding", &self.padding)
            .field("interactable", &self.interactable)
            .field("dangling_duration", &self.dangling_duration)
            .field("dangling_easing", &self.dangling_easing)
            .field(
                "custom_settle_policy",
                &self.map_position_to_settle_plan.is_some(),
            )
            .finish_non_exhaustive()
    }
}

/// A partial [`DangleOptions`]: `None` fields are left unchanged by
/// [`DangleOptions::merge`].
pub struct DangleOptionsUpdate<E = Point> {
    /// See [`DangleOptions::holding_threshold`].
    pub holding_threshold: Option<f64>,
    /// See [`DangleOptions::holding_orthogonal_threshold`].
    pub holding_orthogonal_threshold: Option<f64>,
    /// See [`DangleOptions::flick_threshold`].
    pub flick_threshold: Option<f64>,
    /// See [`DangleOptions::stretch`].
    pub stretch: Option<f64>,
    /// See [`DangleOptions::min_step`].
    pub min_step: Option<i32>,
    /// See [`DangleOptions::max_step`].
    pub max_step: Option<i32>,
    /// See [`DangleOptions::padding`].
    pub padding: Option<f64>,
    /// See [`DangleOptions::interactable`].
    pub interactable: Option<bool>,
    /// See [`DangleOptions::dangling_duration`].
    pub dangling_duration: Option<f64>,
    /// See [`DangleOptions::dangling_easing`].
    pub dangling_easing: Option<Easing>,
    /// See [`DangleOptions::map_event_to_position`].
    pub map_event_to_position: Option<AxisExtractor<E>>,
    /// See [`DangleOptions::map_event_to_orthogonal_position`].
    pub map_event_to_orthogonal_position: Option<AxisExtractor<E>>,
    /// See [`DangleOptions::map_position_to_settle_plan`]. `Some(None)`
    /// restores the default flick policy.
    pub map_position_to_settle_plan: Option<Option<Rc<dyn SettlePolicy>>>,
    /// See [`DangleOptions::map_value_to_step`].
    pub map_value_to_step: Option<Rc<dyn StepMapper>>,
}

impl<E> Default for DangleOptionsUpdate<E> {
    fn default() -> Self {
        Self {
            holding_threshold: None,
            holding_orthogonal_threshold: None,
            flick_threshold: None,
            stretch: None,
            min_step: None,
            max_step: None,
            padding: None,
            interactable: None,
            dangling_duration: None,
            dangling_easing: None,
            map_event_to_position: None,
            map_event_to_orthogonal_position: None,
            map_position_to_settle_plan: None,
            map_value_to_step: None,
        }
    }
}

impl<E> fmt::Debug for DangleOptionsUpdate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DangleOptionsUpdate")
            .field("holding_threshold", &self.holding_threshold)
            .field(
                "holding_orthogonal_threshold",
                &self.holding_orthogonal_threshold,
            )
            .field("flick_threshold", &self.flick_threshold)
            .field("stretch", &self.stretch)
            .field("min_step", &self.min_step)
            .field("max_step", &self.max_step)
            .field("padding", &self.padding)
            .field("interactable", &self.interactable)
            .field("dangling_duration", &self.dangling_duration)
            .field("dangling_easing", &self.dangling_easing)
            .finish_non_exhaustive()
    }
}

impl<E> DangleOptionsUpdate<E> {
    /// Sets [`DangleOptions::holding_threshold`].
    #[must_use]
    pub fn with_holding_threshold(mut self, value: f64) -> Self {
        self.holding_threshold = Some(value);
        self
    }

    /// Sets [`DangleOptions::holding_orthogonal_threshold`].
    #[must_use]
    pub fn with_holding_orthogonal_threshold(mut self, value: f64) -> Self {
        self.holding_orthogonal_threshold = Some(value);
        self
    }

    /// Sets [`DangleOptions::flick_threshold`].
    #[must_use]
    pub fn with_flick_threshold(mut self, value: f64) -> Self {
        self.flick_threshold = Some(value);
        self
    }

    /// Sets [`DangleOptions::stretch`].
    #[must_use]
    pub fn with_stretch(mut self, value: f64) -> Self {
        self.stretch = Some(value);
        self
    }

    /// Sets both step bounds.
    #[must_use]
    pub fn with_steps(mut self, min_step: i32, max_step: i32) -> Self {
        self.min_step = Some(min_step);
        self.max_step = Some(max_step);
        self
    }

    /// Sets [`DangleOptions::padding`].
    #[must_use]
    pub fn with_padding(mut self, value: f64) -> Self {
        self.padding = Some(value);
        self
    }

    /// Sets [`DangleOptions::interactable`].
    #[must_use]
    pub fn with_interactable(mut self, value: bool) -> Self {
        self.interactable = Some(value);
        self
    }

    /// Sets [`DangleOptions::dangling_duration`].
    #[must_use]
    pub fn with_dangling_duration(mut self, value: f64) -> Self {
        self.dangling_duration = Some(value);
        self
    }

    /// Sets [`DangleOptions::dangling_easing`].
    #[must_use]
    pub fn with_dangling_easing(mut self, value: Easing) -> Self {
        self.dangling_easing = Some(value);
        self
    }

    /// Sets both axis extractors.
    #[must_use]
    pub fn with_extractors(
        mut self,
        primary: impl Fn(&E) -> f64 + 'static,
        orthogonal: impl Fn(&E) -> f64 + 'static,
    ) -> Self {
        let primary: AxisExtractor<E> = Rc::new(primary);
        let orthogonal: AxisExtractor<E> = Rc::new(orthogonal);
        self.map_event_to_position = Some(primary);
        self.map_event_to_orthogonal_position = Some(orthogonal);
        self
    }

    /// Installs a custom settle policy.
    #[must_use]
    pub fn with_settle_policy(mut self, policy: impl SettlePolicy + 'static) -> Self {
        let policy: Rc<dyn SettlePolicy> = Rc::new(policy);
        self.map_position_to_settle_plan = Some(Some(policy));
        self
    }

    /// Restores the default flick policy.
    #[must_use]
    pub fn with_default_settle_policy(mut self) -> Self {
        self.map_position_to_settle_plan = Some(None);
        self
    }

    /// Installs a step mapper.
    #[must_use]
    pub fn with_step_mapper(mut self, mapper: impl StepMapper + 'static) -> Self {
        let mapper: Rc<dyn StepMapper> = Rc::new(mapper);
        self.map_value_to_step = Some(mapper);
        self
    }
}

/// Reasons options are rejected.
#[derive(Clone, Debug, PartialEq)]
pub enum OptionsError {
    /// `min_step` is greater than `max_step`.
    InvertedSteps {
        /// Configured lower bound.
        min_step: i32,
        /// Configured upper bound.
        max_step: i32,
    },
    /// The step mapper sends `min_step` or `max_step` to a non-finite value.
    NonFiniteStepValues {
        /// Lower end of the mapped value interval.
        low: f64,
        /// Upper end of the mapped value interval.
        high: f64,
    },
    /// `stretch` is not finite and positive.
    InvalidStretch(f64),
    /// A distance threshold is negative or not finite.
    InvalidThreshold {
        /// Name of the offending field.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// The settle duration is negative or not finite.
    InvalidDuration(f64),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvertedSteps { min_step, max_step } => {
                write!(f, "min_step {min_step} is greater than max_step {max_step}")
            }
            Self::NonFiniteStepValues { low, high } => {
                write!(f, "step bounds map to non-finite values {low} and {high}")
            }
            Self::InvalidStretch(stretch) => {
                write!(f, "stretch must be finite and positive, got {stretch}")
            }
            Self::InvalidThreshold { name, value } => {
                write!(f, "{name} must be finite and non-negative, got {value}")
            }
            Self::InvalidDuration(duration) => {
                write!(f, "dangling_duration must be finite and non-negative, got {duration}")
            }
        }
    }
}

impl core::error::Error for OptionsError {}
