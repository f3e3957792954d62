// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-provided collaborators: images, the data source, reflection rendering, and memory budget.
//!
//! The engine never decodes or rasterizes anything. It only asks these traits for
//! handles and sizes, and hands the handles back inside a [`Frame`](crate::Frame)
//! for the host to draw.

use kurbo::Size;

/// Identity of an image handle.
///
/// Two handles with the same id are the same image object. Reflections are cached
/// by this identity, not by pixel content: a source that hands out a new handle
/// for the same index (for example after reloading) gets a fresh reflection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u64);

/// An image handle the host can draw.
///
/// Handles are expected to be cheap to clone (reference counted or plain ids).
pub trait CoverImage: Clone {
    /// Identity of the underlying image object.
    fn id(&self) -> ImageId;

    /// Size in device pixels.
    fn size(&self) -> Size;

    /// Bytes held by the pixels, used to bound the reflection cache.
    fn byte_size(&self) -> usize;

    /// Returns `false` once the host has released the pixels behind this handle.
    fn is_usable(&self) -> bool {
        true
    }
}

/// The data source backing the carousel.
pub trait ImageSource {
    /// Image handle type.
    type Image: CoverImage;

    /// Number of items.
    fn count(&self) -> usize;

    /// Image for `index`, or `None` if it is not available yet.
    fn image_at(&self, index: usize) -> Option<Self::Image>;
}

/// Builds the mirrored, faded reflection of an image.
pub trait ReflectionRenderer<I> {
    /// Renders a reflection covering `height_fraction` of the source height.
    ///
    /// Returns `None` if the source cannot be used.
    fn render(&mut self, image: &I, height_fraction: f64) -> Option<I>;
}

/// Supplies the memory figure from which the reflection cache budget is derived.
pub trait MemoryBudget {
    /// Bytes available to the application.
    fn available_bytes(&self) -> usize;
}

/// A fixed memory figure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedMemoryBudget(pub usize);

impl MemoryBudget for FixedMemoryBudget {
    fn available_bytes(&self) -> usize {
        self.0
    }
}
