// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-pointer gesture recognition: tap, long press, horizontal drag, or hand-off.
//!
//! One [`GestureSession`] lives from pointer down to pointer up (or cancel). The
//! recognizer decides, from that single stream of positions, which of these the
//! user meant:
//!
//! - **Tap**: released without leaving the dead zone, on the centered item.
//! - **Long press**: held on the centered item past the timeout without moving.
//!   The following release no longer counts as a tap.
//! - **Drag**: left the dead zone horizontally. The offset follows the pointer
//!   and the release velocity is handed to momentum.
//! - **Hand-off**: the first movement out of the dead zone is more vertical than
//!   horizontal. The carousel yields the pointer to its ancestor and ignores the
//!   rest of the session.
//!
//! The recognizer does not own the offset. It returns what the offset should
//! become and the engine applies it.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_coverflow::{GestureConfig, GestureStateMachine, ReleaseOutcome};
//!
//! let mut gestures = GestureStateMachine::new(GestureConfig::default());
//! let rect = Rect::new(100.0, 0.0, 300.0, 200.0);
//!
//! gestures.press(Point::new(200.0, 100.0), 0, 0.0, false);
//! let outcome = gestures.release(Point::new(201.0, 101.0), 80, 400.0, 0.0, Some(rect), true);
//! assert_eq!(outcome, ReleaseOutcome::Tap);
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

use crate::config::GestureConfig;
use crate::util::is_integral;
use crate::velocity::VelocityTracker;

bitflags::bitflags! {
    /// What has happened so far in a gesture session.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SessionFlags: u8 {
        /// The pointer left the dead zone and the session is a drag.
        const MOVED            = 0b0000_0001;
        /// A long press will fire if the pointer is held still.
        const LONG_PRESS_ARMED = 0b0000_0010;
        /// The long press fired; the release is not a tap.
        const LONG_PRESS_FIRED = 0b0000_0100;
        /// The pointer was handed to the ancestor; the rest of the session is ignored.
        const YIELDED          = 0b0000_1000;
    }
}

/// Coarse state of the recognizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    /// No pointer is down.
    Idle,
    /// Pointer down, still inside the dead zone, no long press pending.
    Pressed,
    /// Pointer down on the centered item with a long press pending.
    LongPressArmed,
    /// The long press fired and the pointer is still down.
    LongPressFired,
    /// The pointer is dragging the carousel.
    Dragging,
    /// The session was handed to the ancestor.
    Yielded,
}

/// Per-session state created on press and dropped on release or cancel.
#[derive(Clone, Debug)]
pub struct GestureSession {
    /// Pointer position at press time.
    pub start: Point,
    /// Offset at press time.
    pub start_offset: f64,
    /// Press timestamp in milliseconds.
    pub start_ms: u64,
    /// Session progress.
    pub flags: SessionFlags,
    velocity: VelocityTracker,
}

/// Result of feeding a pointer move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveOutcome {
    /// Nothing changes (no session, inside the dead zone, or already yielded).
    Ignored,
    /// The gesture is vertical: release pointer ownership to the ancestor.
    Yield,
    /// The offset should become this value.
    Drag(f64),
}

/// Result of feeding a pointer release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReleaseOutcome {
    /// No session was active, or it had been yielded.
    Ignored,
    /// Set the offset and start momentum with `velocity` items per second.
    Fling {
        /// Final drag offset.
        offset: f64,
        /// Signed launch velocity in items per second.
        velocity: f64,
    },
    /// The centered item was tapped.
    Tap,
    /// A release that neither drags nor taps.
    None,
}

/// Maps a horizontal pointer position to drag units.
///
/// The difference between two results is how far the offset moves; one widget
/// width corresponds to `multiple / 2` items.
#[must_use]
pub fn drag_units(x: f64, width: f64, multiple: f64) -> f64 {
    ((x / width) * multiple - 5.0) / 2.0
}

/// Gesture recognizer for one pointer.
#[derive(Clone, Debug)]
pub struct GestureStateMachine {
    config: GestureConfig,
    session: Option<GestureSession>,
}

impl GestureStateMachine {
    /// Creates an idle recognizer.
    #[must_use]
    pub const fn new(config: GestureConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Thresholds in use.
    #[must_use]
    pub const fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Replaces the thresholds. Takes effect for the next session.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    /// The active session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        let Some(session) = &self.session else {
            return GesturePhase::Idle;
        };
        let flags = session.flags;
        if flags.contains(SessionFlags::YIELDED) {
            GesturePhase::Yielded
        } else if flags.contains(SessionFlags::MOVED) {
            GesturePhase::Dragging
        } else if flags.contains(SessionFlags::LONG_PRESS_FIRED) {
            GesturePhase::LongPressFired
        } else if flags.contains(SessionFlags::LONG_PRESS_ARMED) {
            GesturePhase::LongPressArmed
        } else {
            GesturePhase::Pressed
        }
    }

    /// Starts a session at `position`, replacing any previous one.
    ///
    /// `arm_long_press` should be `true` when the press landed on the centered
    /// item and long presses are wanted.
    pub fn press(&mut self, position: Point, time_ms: u64, offset: f64, arm_long_press: bool) {
        let mut velocity = VelocityTracker::new();
        velocity.add(position.x, time_ms);
        let mut flags = SessionFlags::empty();
        flags.set(SessionFlags::LONG_PRESS_ARMED, arm_long_press);
        self.session = Some(GestureSession {
            start: position,
            start_offset: offset,
            start_ms: time_ms,
            flags,
            velocity,
        });
        tracing::trace!(x = position.x, y = position.y, offset, arm_long_press, "press");
    }

    /// Feeds a pointer move for a widget `width` pixels wide.
    pub fn on_move(&mut self, position: Point, time_ms: u64, width: f64) -> MoveOutcome {
        let config = self.config;
        let Some(session) = &mut self.session else {
            return MoveOutcome::Ignored;
        };
        if session.flags.contains(SessionFlags::YIELDED) {
            return MoveOutcome::Ignored;
        }

        if !session.flags.contains(SessionFlags::MOVED) {
            let dx = (position.x - session.start.x).abs();
            let dy = (position.y - session.start.y).abs();
            if dx > config.min_move && dy > config.min_move && dx < dy {
                session.flags.insert(SessionFlags::YIELDED);
                session.flags.remove(SessionFlags::LONG_PRESS_ARMED);
                tracing::trace!(dx, dy, "vertical gesture, yielding pointer");
                return MoveOutcome::Yield;
            }
            if dx < config.min_move && dy < config.min_move {
                return MoveOutcome::Ignored;
            }
            session.flags.insert(SessionFlags::MOVED);
            session.flags.remove(SessionFlags::LONG_PRESS_ARMED);
            tracing::trace!(dx, dy, "drag started");
        }

        session.velocity.add(position.x, time_ms);
        MoveOutcome::Drag(Self::drag_offset(session, position.x, width, &config))
    }

    /// Feeds the pointer release and ends the session.
    ///
    /// `offset` is the engine's current offset, `touch_rect` the centered item's
    /// hit rectangle, and `tap_enabled` whether taps are reported at all.
    pub fn release(
        &mut self,
        position: Point,
        time_ms: u64,
        width: f64,
        offset: f64,
        touch_rect: Option<Rect>,
        tap_enabled: bool,
    ) -> ReleaseOutcome {
        let config = self.config;
        let Some(mut session) = self.session.take() else {
            return ReleaseOutcome::Ignored;
        };
        if session.flags.contains(SessionFlags::YIELDED) {
            return ReleaseOutcome::Ignored;
        }

        if session.flags.contains(SessionFlags::MOVED) || !is_integral(offset) {
            let offset = Self::drag_offset(&session, position.x, width, &config);
            session.velocity.add(position.x, time_ms);
            let speed = (session.velocity.velocity() / width * config.speed_multiple)
                .clamp(-config.max_speed, config.max_speed);
            // Dragging left moves the offset forward, hence the sign flip.
            return ReleaseOutcome::Fling {
                offset,
                velocity: -speed,
            };
        }

        let hit = touch_rect.is_some_and(|rect| rect.contains(position));
        if hit && tap_enabled && !session.flags.contains(SessionFlags::LONG_PRESS_FIRED) {
            ReleaseOutcome::Tap
        } else {
            ReleaseOutcome::None
        }
    }

    /// Fires the pending long press if it is due at `now_ms`.
    ///
    /// Returns `true` exactly once per session, at the moment it fires.
    pub fn poll_long_press(&mut self, now_ms: u64) -> bool {
        let timeout = self.config.long_press_timeout_ms;
        let Some(session) = &mut self.session else {
            return false;
        };
        if !session.flags.contains(SessionFlags::LONG_PRESS_ARMED)
            || now_ms.saturating_sub(session.start_ms) < timeout
        {
            return false;
        }
        session.flags.remove(SessionFlags::LONG_PRESS_ARMED);
        session.flags.insert(SessionFlags::LONG_PRESS_FIRED);
        tracing::trace!(held_ms = now_ms.saturating_sub(session.start_ms), "long press fired");
        true
    }

    /// Returns `true` while a long press is pending.
    #[must_use]
    pub fn long_press_pending(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.flags.contains(SessionFlags::LONG_PRESS_ARMED))
    }

    /// Aborts the session without a tap or fling.
    ///
    /// Returns `true` if a session was active.
    pub fn cancel(&mut self) -> bool {
        self.session.take().is_some()
    }

    fn drag_offset(session: &GestureSession, x: f64, width: f64, config: &GestureConfig) -> f64 {
        session.start_offset
            + (drag_units(session.start.x, width, config.drag_multiple)
                - drag_units(x, width, config.drag_multiple))
    }
}
