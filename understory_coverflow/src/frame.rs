// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame draw list.

use kurbo::Rect;
use smallvec::SmallVec;

use crate::transform::CoverTransform;

/// One item to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverItem<I> {
    /// Slot relative to the center, in `-half_visible..=half_visible`.
    pub slot: isize,
    /// Absolute draw position on the carousel strip.
    pub position: isize,
    /// Logical data index.
    pub index: usize,
    /// Draw position minus the current offset.
    pub distance: f64,
    /// Image handle from the source.
    pub image: I,
    /// Reflection handle, if reflections are enabled and one could be rendered.
    pub reflection: Option<I>,
    /// Where and how to draw the image and its reflection.
    pub transform: CoverTransform,
}

/// What to draw for the current offset.
///
/// Items are in paint order: left side from the outermost slot inwards, then
/// the right side from the outermost slot inwards, with the centered item last
/// so it ends up on top.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<I> {
    /// Items in paint order. Slots whose image is unavailable are left out.
    pub items: SmallVec<[CoverItem<I>; 7]>,
    /// Offset the frame was produced at.
    pub offset: f64,
    /// Index of the last item that came to rest in the center.
    pub top_index: Option<usize>,
    /// Hit rectangle of that item.
    pub touch_rect: Option<Rect>,
}

impl<I> Frame<I> {
    pub(crate) fn empty(offset: f64) -> Self {
        Self {
            items: SmallVec::new(),
            offset,
            top_index: None,
            touch_rect: None,
        }
    }

    /// The centered item, if it is drawn this frame.
    #[must_use]
    pub fn center(&self) -> Option<&CoverItem<I>> {
        self.items.last().filter(|item| item.slot == 0)
    }

    /// Number of items drawn.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
