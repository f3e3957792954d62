// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Horizontal pointer velocity estimation from recent samples.

use smallvec::SmallVec;

/// Samples older than this, relative to the newest one, are ignored.
pub const VELOCITY_HORIZON_MS: u64 = 100;

const HISTORY: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Sample {
    x: f64,
    time_ms: u64,
}

/// Bounded history of horizontal pointer positions.
///
/// The velocity is the least-squares slope of position over time across the
/// samples within [`VELOCITY_HORIZON_MS`] of the newest one.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    samples: SmallVec<[Sample; HISTORY]>,
}

impl VelocityTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the pointer at `x` at `time_ms`.
    ///
    /// A sample older than the newest recorded one restarts the history.
    pub fn add(&mut self, x: f64, time_ms: u64) {
        if self.samples.last().is_some_and(|last| time_ms < last.time_ms) {
            self.samples.clear();
        }
        if self.samples.len() == HISTORY {
            self.samples.remove(0);
        }
        self.samples.push(Sample { x, time_ms });
    }

    /// Horizontal velocity in pixels per second, `0.0` without enough distinct samples.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        let Some(newest) = self.samples.last() else {
            return 0.0;
        };
        let recent = self
            .samples
            .iter()
            .filter(|s| newest.time_ms - s.time_ms <= VELOCITY_HORIZON_MS);

        let (mut n, mut sum_t, mut sum_x) = (0.0, 0.0, 0.0);
        for s in recent.clone() {
            n += 1.0;
            sum_t += (newest.time_ms - s.time_ms) as f64;
            sum_x += s.x;
        }
        if n < 2.0 {
            return 0.0;
        }
        let (mean_t, mean_x) = (sum_t / n, sum_x / n);

        let (mut num, mut den) = (0.0, 0.0);
        for s in recent {
            // Time runs backwards from the newest sample; flip the sign below.
            let dt = (newest.time_ms - s.time_ms) as f64 - mean_t;
            num += dt * (s.x - mean_x);
            den += dt * dt;
        }
        if den == 0.0 {
            return 0.0;
        }
        -(num / den) * 1000.0
    }

    /// Forgets every sample.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Number of recorded samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
