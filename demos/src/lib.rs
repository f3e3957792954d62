// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for the coverflow demos: an in-memory album and a reflection renderer.

use std::rc::Rc;

use kurbo::Size;
use understory_coverflow::{CoverImage, ImageId, ImageSource, ReflectionRenderer};

/// A reference-counted stand-in for decoded pixels.
#[derive(Clone, Debug)]
pub struct Cover {
    id: ImageId,
    size: Size,
    pixels: Rc<[u8]>,
}

impl Cover {
    /// Creates a cover of `width` by `height` pixels filled with `shade`.
    #[must_use]
    pub fn new(id: u64, width: u32, height: u32, shade: u8) -> Self {
        let len = width as usize * height as usize * 4;
        Self {
            id: ImageId(id),
            size: Size::new(f64::from(width), f64::from(height)),
            pixels: core::iter::repeat_n(shade, len).collect(),
        }
    }
}

impl CoverImage for Cover {
    fn id(&self) -> ImageId {
        self.id
    }

    fn size(&self) -> Size {
        self.size
    }

    fn byte_size(&self) -> usize {
        self.pixels.len()
    }
}

/// Album covers with varying aspect ratios.
#[derive(Debug, Default)]
pub struct Album {
    covers: Vec<Cover>,
}

impl Album {
    /// Creates `count` covers.
    #[must_use]
    pub fn new(count: u64) -> Self {
        let covers = (0..count)
            .map(|i| {
                let width = 120 + (i % 3) as u32 * 20;
                Cover::new(i, width, 160, (i * 20 % 256) as u8)
            })
            .collect();
        Self { covers }
    }

    /// Drops the last cover.
    pub fn pop(&mut self) -> Option<Cover> {
        self.covers.pop()
    }
}

impl ImageSource for Album {
    type Image = Cover;

    fn count(&self) -> usize {
        self.covers.len()
    }

    fn image_at(&self, index: usize) -> Option<Cover> {
        self.covers.get(index).cloned()
    }
}

/// Builds reflections as darker covers of the reflected height.
#[derive(Debug, Default)]
pub struct Mirror {
    rendered: usize,
}

impl Mirror {
    /// Number of reflections built so far.
    #[must_use]
    pub fn rendered(&self) -> usize {
        self.rendered
    }
}

impl ReflectionRenderer<Cover> for Mirror {
    fn render(&mut self, image: &Cover, height_fraction: f64) -> Option<Cover> {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Reflection heights are small positive pixel counts"
        )]
        let height = (image.size.height * height_fraction).round() as u32;
        if height == 0 {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Cover widths come from u32 values"
        )]
        let width = image.size.width as u32;
        self.rendered += 1;
        Some(Cover::new(image.id.0 | 1 << 63, width, height, 16))
    }
}
