// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-slot geometry: scale, translation, and opacity as a pure function of distance.
//!
//! An item's *distance* is its draw position minus the current offset. The item
//! at distance `0.0` is centered and drawn at its band height; every unit of
//! distance shrinks it by the configured card scale and slides it towards the
//! padding edge on its side, so the outermost slots touch the left and right
//! padding.
//!
//! The result is a [`CoverTransform`] value per slot. Nothing here holds mutable
//! drawing state, so transforms can be computed in any order and cached freely.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Insets, Rect, Size, Vec2};

use crate::config::{CoverFlowConfig, OpacityPolicy};
use crate::error::CoverFlowError;
use crate::layout::Measured;

/// Opacity reached at the outermost slot under [`OpacityPolicy::DistanceFade`].
pub const FADE_FLOOR: f32 = 76.0 / 255.0;

/// Geometry shared by every slot of a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverGeometry {
    width: f64,
    padding: Insets,
    child_height: f64,
    child_translate_y: f64,
    reflection_translate_y: f64,
    reflection_height: f64,
    reflection_gap: f64,
    card_scale: f64,
    opacity: OpacityPolicy,
    half_visible: usize,
}

/// Where and how to draw one item and its reflection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverTransform {
    /// Distance-based scale, `1.0` at the center. Not clamped: a large card scale
    /// can make it negative for far slots.
    pub scale: f64,
    /// Scale applied to the image pixels: band fit times [`scale`](Self::scale).
    pub image_scale: f64,
    /// Translation of the image's top-left corner.
    pub translate: Vec2,
    /// Opacity in `0.0..=1.0`.
    pub alpha: f32,
    /// Image space to widget space.
    pub image: Affine,
    /// Reflection image space to widget space.
    pub reflection: Affine,
}

impl CoverGeometry {
    /// Builds the geometry from a measured band.
    ///
    /// Fails when the width is zero, negative, or not finite, so no later division
    /// can produce `NaN` mid-animation.
    pub fn new(
        width: f64,
        padding: Insets,
        measured: &Measured,
        config: &CoverFlowConfig,
        half_visible: usize,
    ) -> Result<Self, CoverFlowError> {
        if !(width.is_finite() && width > 0.0) {
            return Err(CoverFlowError::InvalidWidth { width });
        }
        if half_visible == 0 {
            return Err(CoverFlowError::VisibleCountTooSmall {
                count: half_visible * 2 + 1,
            });
        }
        Ok(Self {
            width,
            padding,
            child_height: measured.child_height,
            child_translate_y: measured.child_translate_y,
            reflection_translate_y: measured.reflection_translate_y,
            reflection_height: config.reflection_height,
            reflection_gap: config.reflection_gap,
            card_scale: config.card_scale,
            opacity: config.opacity,
            half_visible,
        })
    }

    /// Widget width.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Number of slots on each side of the center.
    #[must_use]
    pub const fn half_visible(&self) -> usize {
        self.half_visible
    }

    /// Height an image is drawn at in the center slot.
    #[must_use]
    pub fn center_image_height(&self) -> f64 {
        self.child_height - self.child_height * self.reflection_height - self.reflection_gap
    }

    /// Distance-based scale for an item `distance` slots away from the center.
    #[must_use]
    pub fn scale_at(&self, distance: f64) -> f64 {
        1.0 - distance.abs() * self.card_scale
    }

    /// Opacity for an item `distance` slots away from the center.
    #[must_use]
    pub fn alpha_at(&self, distance: f64) -> f32 {
        match self.opacity {
            OpacityPolicy::Opaque => 1.0,
            OpacityPolicy::DistanceFade => {
                let step = f64::from(1.0 - FADE_FLOOR) / self.half_visible as f64;
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "Value is clamped to 0..=1 first"
                )]
                let alpha = (1.0 - distance.abs() * step).clamp(0.0, 1.0) as f32;
                alpha
            }
        }
    }

    /// Computes the transform of an image of `image` size, `distance` slots from the center.
    ///
    /// Returns `None` for images with no area; those slots are skipped.
    #[must_use]
    pub fn transform(&self, distance: f64, image: Size) -> Option<CoverTransform> {
        if !(image.width > 0.0 && image.height > 0.0) {
            return None;
        }
        let scale = self.scale_at(distance);
        let half = self.half_visible as f64;

        let fit = self.center_image_height() / image.height;
        let image_scale = fit * scale;
        let child_width = image.width * image_scale;
        let center_width = image.width * fit;

        let mid = self.width / 2.0;
        let translate_x = if distance <= 0.0 {
            let left_space = (mid - self.padding.x0) - center_width / 2.0;
            left_space / half * (half + distance) + self.padding.x0
        } else {
            let right_space = (mid - self.padding.x1) - center_width / 2.0;
            self.width - right_space / half * (half - distance) - child_width - self.padding.x1
        };

        // Keep the scaled image vertically centered on its unscaled position.
        let total_height =
            image.height + image.height * self.reflection_height + self.reflection_gap;
        let adjust = if image_scale == 1.0 {
            0.0
        } else {
            (self.child_height - total_height) / 2.0
        };
        let pivot = total_height / 2.0 * (1.0 - image_scale);

        let translate_y = self.child_translate_y + adjust + pivot;
        let reflection_y = self.reflection_translate_y * scale + adjust + pivot;

        let translate = Vec2::new(translate_x, translate_y);
        Some(CoverTransform {
            scale,
            image_scale,
            translate,
            alpha: self.alpha_at(distance),
            image: Affine::translate(translate) * Affine::scale(image_scale),
            reflection: Affine::translate(Vec2::new(translate_x, reflection_y))
                * Affine::scale(image_scale),
        })
    }

    /// Hit rectangle of an image of `image` size sitting exactly in the center slot.
    #[must_use]
    pub fn centered_rect(&self, image: Size) -> Option<Rect> {
        if !(image.width > 0.0 && image.height > 0.0) {
            return None;
        }
        let height = self.center_image_height();
        let width = image.width * (height / image.height);
        let left = self.width / 2.0 - width / 2.0;
        let top = self.child_translate_y;
        Some(Rect::new(left, top, left + width, top + height))
    }
}
