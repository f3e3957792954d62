// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input accepted by the engine and notifications it produces.

use kurbo::{Point, Rect};

/// Phase of a pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// The pointer went down.
    Down,
    /// The pointer moved while down.
    Move,
    /// The pointer was released.
    Up,
    /// The host took the pointer away.
    Cancel,
}

/// A single-pointer event in widget coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Event phase.
    pub kind: PointerKind,
    /// Position relative to the widget's top-left corner.
    pub position: Point,
    /// Host timestamp in milliseconds.
    pub time_ms: u64,
}

impl PointerEvent {
    /// Pointer down at `position`.
    #[must_use]
    pub const fn down(position: Point, time_ms: u64) -> Self {
        Self {
            kind: PointerKind::Down,
            position,
            time_ms,
        }
    }

    /// Pointer move to `position`.
    #[must_use]
    pub const fn moved(position: Point, time_ms: u64) -> Self {
        Self {
            kind: PointerKind::Move,
            position,
            time_ms,
        }
    }

    /// Pointer release at `position`.
    #[must_use]
    pub const fn up(position: Point, time_ms: u64) -> Self {
        Self {
            kind: PointerKind::Up,
            position,
            time_ms,
        }
    }

    /// Pointer cancel.
    #[must_use]
    pub const fn cancel(position: Point, time_ms: u64) -> Self {
        Self {
            kind: PointerKind::Cancel,
            position,
            time_ms,
        }
    }
}

/// Notification queued by the engine for the host.
///
/// Events accumulate until the host calls
/// [`drain_events`](crate::CoverFlowEngine::drain_events).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CoverFlowEvent {
    /// Claim (`true`) or give back (`false`) pointer priority over ancestor containers.
    RequestExclusive(bool),
    /// An item came to rest in the center; `rect` is its hit rectangle.
    ItemCentered {
        /// Logical index of the centered item.
        index: usize,
        /// Hit rectangle of the centered item.
        rect: Rect,
    },
    /// The centered item was tapped.
    ItemTapped(usize),
    /// The centered item was held past the long-press timeout.
    ItemLongPressed(usize),
    /// A frame was produced.
    FrameRendered,
}
