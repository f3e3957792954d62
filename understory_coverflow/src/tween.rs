// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear offset tween used for programmatic selection.

/// A linear move of the offset from `from` to `to` over a fixed duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionTween {
    from: f64,
    to: f64,
    start_ms: u64,
    duration_ms: u64,
}

impl SelectionTween {
    /// Creates a tween starting at `start_ms`. A zero duration jumps straight to `to`.
    #[must_use]
    pub const fn new(from: f64, to: f64, start_ms: u64, duration_ms: u64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
        }
    }

    /// Final offset.
    #[must_use]
    pub const fn target(&self) -> f64 {
        self.to
    }

    /// Duration in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Returns `true` once `now_ms` is at or past the end of the tween.
    #[must_use]
    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    /// Offset at `now_ms`. Exactly `to` once the tween is done.
    #[must_use]
    pub fn sample(&self, now_ms: u64) -> f64 {
        if self.is_done(now_ms) {
            return self.to;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms);
        let t = elapsed as f64 / self.duration_ms as f64;
        self.from + (self.to - self.from) * t
    }
}
