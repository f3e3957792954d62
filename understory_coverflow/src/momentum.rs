// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Post-release deceleration that always comes to rest on a whole item.
//!
//! A release velocity `v` (items per second) would carry the offset
//! `v² / (2 · FRICTION)` further under constant friction. That landing point is
//! rounded to the nearest integer, and the launch speed is then recomputed so the
//! offset decelerates to exactly that integer:
//!
//! ```text
//! speed    = sqrt(|target - start| · 2 · FRICTION)   (signed towards target)
//! duration = |speed| / FRICTION
//! offset(t) = start ± (|speed| · t - FRICTION · t² / 2)
//! ```
//!
//! ```
//! use understory_coverflow::MomentumController;
//!
//! let mut momentum = MomentumController::new();
//! assert!(momentum.start(4.0, 0.3, 0));
//!
//! let target = momentum.target().unwrap();
//! assert_eq!(target, 1.0);
//!
//! let duration = momentum.duration().unwrap();
//! assert_eq!(momentum.offset_at(duration), Some(target));
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::util::round_half_up;

/// Deceleration in items per second squared.
pub const FRICTION: f64 = 8.0;

/// Parameters of one deceleration run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Momentum {
    /// Offset when the run started.
    pub start_offset: f64,
    /// Integer offset the run settles on.
    pub target: f64,
    /// Signed launch speed in items per second.
    pub speed: f64,
    /// Run length in seconds.
    pub duration: f64,
    /// Timestamp in milliseconds at which the run started.
    pub start_ms: u64,
}

impl Momentum {
    fn new(velocity: f64, start_offset: f64, start_ms: u64) -> Self {
        let mut travel = velocity * velocity / (FRICTION * 2.0);
        if velocity < 0.0 {
            travel = -travel;
        }
        let target = round_half_up(start_offset + travel);

        let mut speed = ((target - start_offset).abs() * FRICTION * 2.0).sqrt();
        if target < start_offset {
            speed = -speed;
        }
        let duration = (speed / FRICTION).abs();

        Self {
            start_offset,
            target,
            speed,
            duration,
            start_ms,
        }
    }

    /// Offset `elapsed` seconds into the run, clamped to the run's duration.
    #[must_use]
    pub fn offset_at(&self, elapsed: f64) -> f64 {
        if elapsed >= self.duration {
            return self.target;
        }
        let t = elapsed.max(0.0);
        let mut delta = self.speed.abs() * t - FRICTION * t * t / 2.0;
        if self.speed < 0.0 {
            delta = -delta;
        }
        self.start_offset + delta
    }

    /// Seconds elapsed at `now_ms`.
    #[must_use]
    pub fn elapsed_at(&self, now_ms: u64) -> f64 {
        now_ms.saturating_sub(self.start_ms) as f64 / 1000.0
    }
}

/// Result of advancing a [`MomentumController`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MomentumStep {
    /// No run is active.
    Idle,
    /// The run continues at this offset.
    Moving(f64),
    /// The run ended and the offset rests on this integer.
    Settled(f64),
}

/// Runs at most one deceleration at a time.
#[derive(Clone, Debug, Default)]
pub struct MomentumController {
    active: Option<Momentum>,
}

impl MomentumController {
    /// Creates an idle controller.
    #[must_use]
    pub const fn new() -> Self {
        Self { active: None }
    }

    /// Starts decelerating from `offset` with `velocity` items per second.
    ///
    /// Returns `false` and leaves the current run untouched if one is already
    /// active; callers must [`finish`](Self::finish) or [`cancel`](Self::cancel) first.
    pub fn start(&mut self, velocity: f64, offset: f64, now_ms: u64) -> bool {
        if self.active.is_some() {
            return false;
        }
        let momentum = Momentum::new(velocity, offset, now_ms);
        tracing::debug!(
            velocity,
            offset,
            target = momentum.target,
            duration = momentum.duration,
            "momentum started"
        );
        self.active = Some(momentum);
        true
    }

    /// Returns `true` while a run is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The active run, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&Momentum> {
        self.active.as_ref()
    }

    /// Integer offset of the active run.
    #[must_use]
    pub fn target(&self) -> Option<f64> {
        self.active.map(|m| m.target)
    }

    /// Duration in seconds of the active run.
    #[must_use]
    pub fn duration(&self) -> Option<f64> {
        self.active.map(|m| m.duration)
    }

    /// Offset of the active run `elapsed` seconds after it started.
    #[must_use]
    pub fn offset_at(&self, elapsed: f64) -> Option<f64> {
        self.active.map(|m| m.offset_at(elapsed))
    }

    /// Advances the active run to `now_ms`, ending it once its duration has passed.
    pub fn step(&mut self, now_ms: u64) -> MomentumStep {
        let Some(momentum) = self.active else {
            return MomentumStep::Idle;
        };
        let elapsed = momentum.elapsed_at(now_ms);
        if elapsed >= momentum.duration {
            self.active = None;
            MomentumStep::Settled(round_half_up(momentum.target))
        } else {
            MomentumStep::Moving(momentum.offset_at(elapsed))
        }
    }

    /// Ends the active run early, snapping `offset` to the nearest integer.
    ///
    /// Returns `None` if no run was active.
    pub fn finish(&mut self, offset: f64) -> Option<f64> {
        self.active.take().map(|_| round_half_up(offset))
    }

    /// Drops the active run without touching the offset.
    pub fn cancel(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn positive_velocity_moves_forward_to_an_integer() {
        let mut momentum = MomentumController::new();
        // travel = 16 / 16 = 1.0
        assert!(momentum.start(4.0, 0.0, 1_000));
        assert_eq!(momentum.target(), Some(1.0));
        let run = *momentum.current().unwrap();
        assert!((run.speed - 4.0).abs() < 1e-12);
        assert!((run.duration - 0.5).abs() < 1e-12);
    }

    #[test]
    fn negative_velocity_moves_backward() {
        let mut momentum = MomentumController::new();
        assert!(momentum.start(-8.0, 2.2, 0));
        // travel = -64 / 16 = -4.0, landing at -1.8 rounds to -2.
        assert_eq!(momentum.target(), Some(-2.0));
        assert!(momentum.current().unwrap().speed < 0.0);
    }

    #[test]
    fn zero_velocity_settles_on_the_nearest_item() {
        let mut momentum = MomentumController::new();
        assert!(momentum.start(0.0, 2.4, 0));
        assert_eq!(momentum.target(), Some(2.0));
        assert_eq!(momentum.step(10_000), MomentumStep::Settled(2.0));
        assert!(!momentum.is_active());
    }

    #[test]
    fn start_while_running_is_ignored() {
        let mut momentum = MomentumController::new();
        assert!(momentum.start(4.0, 0.0, 0));
        assert!(!momentum.start(-4.0, 5.0, 0));
        assert_eq!(momentum.target(), Some(1.0));
    }

    #[test]
    fn step_tracks_time_and_settles() {
        let mut momentum = MomentumController::new();
        momentum.start(4.0, 0.0, 1_000);
        // Quarter of a second in: 4 * 0.25 - 8 * 0.0625 / 2 = 0.75.
        assert_eq!(momentum.step(1_250), MomentumStep::Moving(0.75));
        assert_eq!(momentum.step(1_500), MomentumStep::Settled(1.0));
        assert_eq!(momentum.step(1_600), MomentumStep::Idle);
    }

    #[test]
    fn finish_snaps_to_nearest() {
        let mut momentum = MomentumController::new();
        momentum.start(4.0, 0.0, 0);
        assert_eq!(momentum.finish(0.6), Some(1.0));
        assert_eq!(momentum.finish(0.6), None);
    }

    proptest! {
        #[test]
        fn endpoints_are_start_and_integer_target(
            velocity in -10.0_f64..10.0,
            offset in -50.0_f64..50.0,
        ) {
            let mut momentum = MomentumController::new();
            prop_assert!(momentum.start(velocity, offset, 0));
            let duration = momentum.duration().unwrap();
            let target = momentum.target().unwrap();

            prop_assert_eq!(momentum.offset_at(0.0), Some(offset));
            prop_assert_eq!(momentum.offset_at(duration), Some(target));
            prop_assert_eq!(target, round_half_up(target));
            prop_assert_eq!(momentum.step(u64::MAX), MomentumStep::Settled(target));
        }
    }
}
