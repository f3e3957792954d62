// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical measurement: how tall the child band is and where it sits.
//!
//! The host resolves the widget's width, height constraint, and padding. This
//! module turns those plus the tallest visible image into the band that every
//! item is scaled into, following the configured [`LayoutMode`] and [`Gravity`].

use kurbo::{Insets, Size};

use crate::config::{CoverFlowConfig, Gravity, LayoutMode};

/// Height offered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HeightConstraint {
    /// The widget is exactly this tall.
    Exactly(f64),
    /// The widget may be at most this tall.
    AtMost(f64),
    /// The widget picks its own height.
    Unspecified,
}

/// Widget size and padding as resolved by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Widget width in pixels.
    pub width: f64,
    /// Height constraint.
    pub height: HeightConstraint,
    /// Padding on each edge.
    pub padding: Insets,
}

impl Viewport {
    /// Creates a viewport without padding.
    #[must_use]
    pub const fn new(width: f64, height: HeightConstraint) -> Self {
        Self {
            width,
            height,
            padding: Insets::ZERO,
        }
    }

    /// Sets the padding.
    #[must_use]
    pub const fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }
}

/// Result of [`measure`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measured {
    /// Measured widget size.
    pub size: Size,
    /// Height of the band holding an image plus its reflection.
    pub child_height: f64,
    /// Top of the band.
    pub child_translate_y: f64,
    /// Top of the reflection area inside the band.
    pub reflection_translate_y: f64,
}

/// Height an image occupies together with its reflection and gap.
#[must_use]
pub fn child_total_height(image_height: f64, config: &CoverFlowConfig) -> f64 {
    image_height + image_height * config.reflection_height + config.reflection_gap
}

/// Measures the child band for `viewport` given the tallest visible child.
///
/// `max_child_total_height` is the largest [`child_total_height`] over the items
/// in the visible window.
///
/// ```
/// use understory_coverflow::{CoverFlowConfig, HeightConstraint, Viewport, measure};
///
/// let config = CoverFlowConfig::default();
/// let viewport = Viewport::new(400.0, HeightConstraint::Exactly(300.0));
/// let measured = measure(&viewport, 200.0, &config);
///
/// // Wrap-content keeps the natural height and centers it vertically.
/// assert_eq!(measured.child_height, 200.0);
/// assert_eq!(measured.child_translate_y, 50.0);
/// ```
#[must_use]
pub fn measure(
    viewport: &Viewport,
    max_child_total_height: f64,
    config: &CoverFlowConfig,
) -> Measured {
    let padding = viewport.padding;
    let vertical_padding = padding.y0 + padding.y1;

    let (height, band) = match viewport.height {
        HeightConstraint::Exactly(height) | HeightConstraint::AtMost(height) => {
            let available = (height - vertical_padding).max(0.0);
            if available < max_child_total_height {
                // Not enough room: squeeze children into what the host offers.
                (height, available)
            } else {
                match config.layout_mode {
                    LayoutMode::MatchParent => (height, available),
                    LayoutMode::WrapContent => {
                        let band = max_child_total_height;
                        match viewport.height {
                            HeightConstraint::AtMost(_) => (band + vertical_padding, band),
                            _ => (height, band),
                        }
                    }
                }
            }
        }
        HeightConstraint::Unspecified => {
            let band = max_child_total_height.max(0.0);
            (band + vertical_padding, band)
        }
    };

    let child_translate_y = match config.gravity {
        Gravity::CenterVertical => height / 2.0 - band / 2.0,
        Gravity::Top => padding.y0,
        Gravity::Bottom => height - padding.y1 - band,
    };
    let reflection_translate_y = child_translate_y + band - band * config.reflection_height;

    tracing::debug!(
        width = viewport.width,
        height,
        band,
        child_translate_y,
        "measured coverflow"
    );

    Measured {
        size: Size::new(viewport.width, height),
        child_height: band,
        child_translate_y,
        reflection_translate_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Gravity;

    fn viewport(height: HeightConstraint) -> Viewport {
        Viewport::new(400.0, height).with_padding(Insets::new(10.0, 20.0, 10.0, 30.0))
    }

    #[test]
    fn squeezes_children_when_space_is_short() {
        let config = CoverFlowConfig::default();
        let measured = measure(&viewport(HeightConstraint::Exactly(150.0)), 200.0, &config);
        assert_eq!(measured.child_height, 100.0);
        assert_eq!(measured.size.height, 150.0);
    }

    #[test]
    fn match_parent_fills_available_height() {
        let config = CoverFlowConfig::default().with_layout_mode(LayoutMode::MatchParent);
        let measured = measure(&viewport(HeightConstraint::Exactly(500.0)), 200.0, &config);
        assert_eq!(measured.child_height, 450.0);
        assert_eq!(measured.size.height, 500.0);
    }

    #[test]
    fn wrap_content_shrinks_at_most_height() {
        let config = CoverFlowConfig::default();
        let measured = measure(&viewport(HeightConstraint::AtMost(500.0)), 200.0, &config);
        assert_eq!(measured.child_height, 200.0);
        assert_eq!(measured.size.height, 250.0);

        let measured = measure(&viewport(HeightConstraint::Unspecified), 200.0, &config);
        assert_eq!(measured.size.height, 250.0);
    }

    #[test]
    fn gravity_places_the_band() {
        let base = CoverFlowConfig::default();
        let vp = viewport(HeightConstraint::Exactly(500.0));

        let top = measure(&vp, 200.0, &base.with_gravity(Gravity::Top));
        assert_eq!(top.child_translate_y, 20.0);

        let bottom = measure(&vp, 200.0, &base.with_gravity(Gravity::Bottom));
        assert_eq!(bottom.child_translate_y, 270.0);

        let center = measure(&vp, 200.0, &base);
        assert_eq!(center.child_translate_y, 150.0);
    }

    #[test]
    fn reflection_area_starts_inside_the_band() {
        let config = CoverFlowConfig::default()
            .with_reflection_height(0.25)
            .with_gravity(Gravity::Top);
        let measured = measure(&viewport(HeightConstraint::Exactly(500.0)), 200.0, &config);
        assert_eq!(measured.reflection_translate_y, 20.0 + 200.0 - 50.0);
        assert_eq!(child_total_height(160.0, &config), 200.0);
    }
}
