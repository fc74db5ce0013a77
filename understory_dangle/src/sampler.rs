// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Velocity sampling for release momentum.
//!
//! [`VelocitySampler`] keeps the most recent [`SAMPLE_CAPACITY`] drag samples,
//! newest first. On release, [`VelocitySampler::velocity_proxy`] sums the
//! displacement of the samples taken within [`VELOCITY_WINDOW`] of the
//! release instant. The sum stands in for a true derivative: it is large when
//! the pointer was still travelling far from its anchor right before release,
//! and zero when the pointer rested for longer than the window.
//!
//! ```
//! use understory_dangle::{Sample, VelocitySampler};
//!
//! let mut sampler = VelocitySampler::new();
//! sampler.push(Sample { timestamp: 0.0, displacement: 10.0 });
//! sampler.push(Sample { timestamp: 150.0, displacement: 40.0 });
//! sampler.push(Sample { timestamp: 160.0, displacement: 60.0 });
//!
//! // The sample at t=0 is older than the window at t=200.
//! assert_eq!(sampler.velocity_proxy(200.0), 100.0);
//! ```

use smallvec::SmallVec;

/// Maximum number of samples retained.
pub const SAMPLE_CAPACITY: usize = 10;

/// Samples older than this (in timestamp units, milliseconds by convention)
/// do not contribute to the velocity proxy.
pub const VELOCITY_WINDOW: f64 = 100.0;

/// An anchor-relative drag displacement observed at one instant.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Sample {
    /// When the sample was taken.
    pub timestamp: f64,
    /// Displacement from the hold anchor along the primary axis.
    pub displacement: f64,
}

/// Fixed-capacity, newest-first buffer of drag samples.
#[derive(Clone, Debug, Default)]
pub struct VelocitySampler {
    samples: SmallVec<[Sample; SAMPLE_CAPACITY]>,
}

impl VelocitySampler {
    /// Creates an empty sampler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a sample, evicting the oldest one once full.
    pub fn push(&mut self, sample: Sample) {
        if self.samples.len() == SAMPLE_CAPACITY {
            self.samples.pop();
        }
        self.samples.insert(0, sample);
    }

    /// Sum of displacements for samples younger than [`VELOCITY_WINDOW`] at `now`.
    #[must_use]
    pub fn velocity_proxy(&self, now: f64) -> f64 {
        self.samples
            .iter()
            .filter(|s| now - s.timestamp < VELOCITY_WINDOW)
            .map(|s| s.displacement)
            .sum()
    }

    /// The most recent sample, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.first()
    }

    /// Iterates samples from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    /// Number of retained samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` when no samples are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Forgets all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
