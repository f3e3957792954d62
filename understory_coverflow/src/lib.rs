// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_coverflow --heading-base-level=0

//! Understory Coverflow: a renderer-agnostic coverflow carousel engine.
//!
//! A coverflow shows a horizontal strip of images with one item centered at full
//! size and its neighbors shrinking and sliding towards the edges. Dragging
//! scrolls the strip, releasing hands the pointer velocity to a small physics
//! model that always comes to rest on a whole item, and the strip wraps around
//! so it can be scrolled forever in either direction.
//!
//! This crate is the interaction and transform core. It does not draw, decode
//! images, or know about any widget toolkit. The host supplies:
//!
//! - an [`ImageSource`] handing out cheap [`CoverImage`] handles by index,
//! - a [`ReflectionRenderer`] that builds mirrored reflections, if wanted,
//! - a [`MemoryBudget`] from which the reflection cache size is derived,
//! - the widget [`Viewport`], pointer events, and a clock.
//!
//! In return, [`CoverFlowEngine::frame`] yields a [`Frame`]: the items to draw
//! in paint order, each with a ready-to-use [`CoverTransform`], and
//! [`CoverFlowEngine::drain_events`] yields [`CoverFlowEvent`]s such as taps,
//! long presses, and requests to claim or release pointer priority.
//!
//! The building blocks are public too:
//!
//! - [`wrap_position`]: circular mapping from draw positions to data indices.
//! - [`CoverGeometry`]: per-slot scale, translation, and opacity.
//! - [`ReflectionCache`]: byte-bounded LRU of reflections keyed by image identity.
//! - [`MomentumController`]: snap-to-item deceleration.
//! - [`GestureStateMachine`]: tap, long press, drag, and vertical hand-off.
//! - [`measure`]: vertical band measurement.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_coverflow::{
//!     CoverFlowConfig, CoverFlowEngine, CoverFlowEvent, CoverImage, FixedMemoryBudget,
//!     HeightConstraint, ImageId, ImageSource, PointerEvent, ReflectionRenderer, Viewport,
//! };
//!
//! #[derive(Clone, Debug)]
//! struct Cover(u64);
//!
//! impl CoverImage for Cover {
//!     fn id(&self) -> ImageId { ImageId(self.0) }
//!     fn size(&self) -> Size { Size::new(200.0, 300.0) }
//!     fn byte_size(&self) -> usize { 200 * 300 * 4 }
//! }
//!
//! struct Album(u64);
//!
//! impl ImageSource for Album {
//!     type Image = Cover;
//!     fn count(&self) -> usize { self.0 as usize }
//!     fn image_at(&self, index: usize) -> Option<Cover> { Some(Cover(index as u64)) }
//! }
//!
//! struct NoReflections;
//!
//! impl ReflectionRenderer<Cover> for NoReflections {
//!     fn render(&mut self, _: &Cover, _: f64) -> Option<Cover> { None }
//! }
//!
//! let mut engine = CoverFlowEngine::new(
//!     Album(10),
//!     NoReflections,
//!     CoverFlowConfig::default(),
//!     &FixedMemoryBudget(64 << 20),
//! )
//! .unwrap();
//! engine
//!     .set_viewport(Viewport::new(600.0, HeightConstraint::Exactly(400.0)))
//!     .unwrap();
//!
//! // Item 0 starts in the center, drawn last so it ends up on top.
//! let frame = engine.frame();
//! assert_eq!(frame.center().map(|item| item.index), Some(0));
//!
//! // Tap it.
//! engine.on_pointer(PointerEvent::down(Point::new(300.0, 200.0), 0));
//! engine.on_pointer(PointerEvent::up(Point::new(300.0, 200.0), 60));
//! assert!(engine.drain_events().any(|event| event == CoverFlowEvent::ItemTapped(0)));
//!
//! // Animate to item 3 and let the clock run.
//! engine.set_selection(3, 100).unwrap();
//! let mut now = 100;
//! while engine.is_animating() {
//!     now += 16;
//!     engine.tick(now);
//! }
//! assert_eq!(engine.frame().top_index, Some(3));
//! ```
//!
//! ## Features
//!
//! - `std` (default): uses the standard library for float math.
//! - `libm`: float math through `libm` for `no_std` targets.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod config;
mod engine;
mod error;
mod event;
mod frame;
mod gesture;
mod index;
mod layout;
mod momentum;
mod reflection;
mod source;
mod transform;
mod tween;
mod util;
mod velocity;

pub use config::{
    CoverFlowConfig, DEFAULT_CARD_SCALE, DEFAULT_SELECTION_STEP_MS, GestureConfig, Gravity,
    LayoutMode, OpacityPolicy,
};
pub use engine::CoverFlowEngine;
pub use error::{CoverFlowError, MIN_ITEM_COUNT, MIN_VISIBLE_COUNT};
pub use event::{CoverFlowEvent, PointerEvent, PointerKind};
pub use frame::{CoverItem, Frame};
pub use gesture::{
    GesturePhase, GestureSession, GestureStateMachine, MoveOutcome, ReleaseOutcome, SessionFlags,
    drag_units,
};
pub use index::{centered_position, wrap_position};
pub use layout::{HeightConstraint, Measured, Viewport, child_total_height, measure};
pub use momentum::{FRICTION, Momentum, MomentumController, MomentumStep};
pub use reflection::{BUDGET_DIVISOR, CacheStats, ReflectionCache};
pub use source::{CoverImage, FixedMemoryBudget, ImageId, ImageSource, MemoryBudget, ReflectionRenderer};
pub use transform::{CoverGeometry, CoverTransform, FADE_FLOOR};
pub use tween::SelectionTween;
pub use velocity::{VELOCITY_HORIZON_MS, VelocityTracker};
