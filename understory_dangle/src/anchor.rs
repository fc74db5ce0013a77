// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture anchor: remember where a gesture started and measure how far the
//! pointer has travelled along the primary and orthogonal axes.
//!
//! ## Usage
//!
//! 1) Create an [`Anchor`] at the press position.
//! 2) On each move, call [`Anchor::displacement`] with the current position.
//! 3) While the gesture is still provisional, feed the displacement to
//!    [`HoldThresholds::classify`] to tell a drag from a scroll.
//!
//! Displacement is measured as `anchor - current`: moving the pointer towards
//! smaller coordinates yields a positive displacement, so dragging content
//! "forward" (for example to the left in a horizontal carousel) increases the
//! value.
//!
//! ## Minimal example
//!
//! ```
//! use understory_dangle::{Anchor, HoldThresholds, Position, ThresholdOutcome};
//!
//! let anchor = Anchor::new(Position::new(100.0, 50.0));
//! let thresholds = HoldThresholds { primary: 10.0, orthogonal: 10.0 };
//!
//! // Small wobble: undecided.
//! let d = anchor.displacement(Position::new(96.0, 52.0));
//! assert_eq!(thresholds.classify(d), ThresholdOutcome::Pending);
//!
//! // Clear horizontal travel: this is a drag.
//! let d = anchor.displacement(Position::new(80.0, 52.0));
//! assert_eq!(d.primary, 20.0);
//! assert_eq!(thresholds.classify(d), ThresholdOutcome::Promote);
//! ```

/// A pointer position split into the gesture's primary and orthogonal axes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Position {
    /// Coordinate along the drag axis.
    pub primary: f64,
    /// Coordinate across the drag axis.
    pub orthogonal: f64,
}

impl Position {
    /// Creates a position from its axis coordinates.
    #[must_use]
    pub const fn new(primary: f64, orthogonal: f64) -> Self {
        Self {
            primary,
            orthogonal,
        }
    }
}

/// Travel relative to an [`Anchor`], per axis.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Displacement {
    /// Travel along the drag axis.
    pub primary: f64,
    /// Travel across the drag axis.
    pub orthogonal: f64,
}

/// The position a gesture (or gesture phase) started from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Anchor {
    origin: Position,
}

impl Anchor {
    /// Anchors a gesture at `origin`.
    #[must_use]
    pub const fn new(origin: Position) -> Self {
        Self { origin }
    }

    /// The anchored position.
    #[must_use]
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Displacement of `current` from the anchor, as `anchor - current`.
    #[must_use]
    pub fn displacement(&self, current: Position) -> Displacement {
        Displacement {
            primary: self.origin.primary - current.primary,
            orthogonal: self.origin.orthogonal - current.orthogonal,
        }
    }
}

/// Result of checking a provisional gesture against [`HoldThresholds`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ThresholdOutcome {
    /// Neither threshold was exceeded yet.
    Pending,
    /// Travel across the drag axis won: treat the gesture as a scroll.
    Abandon,
    /// Travel along the drag axis won: start holding.
    Promote,
}

/// Distances a provisional gesture must exceed before it is classified.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HoldThresholds {
    /// Primary-axis distance that starts a drag.
    pub primary: f64,
    /// Orthogonal-axis distance that abandons the gesture.
    pub orthogonal: f64,
}

impl HoldThresholds {
    /// Classifies a displacement.
    ///
    /// The orthogonal check takes priority: if both thresholds are exceeded by
    /// the same sample, the gesture is abandoned.
    #[must_use]
    pub fn classify(&self, displacement: Displacement) -> ThresholdOutcome {
        if displacement.orthogonal.abs() > self.orthogonal {
            ThresholdOutcome::Abandon
        } else if displacement.primary.abs() > self.primary {
            ThresholdOutcome::Promote
        } else {
            ThresholdOutcome::Pending
        }
    }
}
