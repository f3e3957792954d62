// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration: visible window, card shrink, reflections, and gesture tuning.

use crate::error::{CoverFlowError, check_visible_count};

/// Shrink applied per unit of distance from the center slot.
pub const DEFAULT_CARD_SCALE: f64 = 0.15;

/// Default tween duration per item of distance for programmatic selection.
pub const DEFAULT_SELECTION_STEP_MS: u64 = 200;

/// Vertical placement of the child band inside the widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gravity {
    /// Band starts at the top padding edge.
    Top,
    /// Band ends at the bottom padding edge.
    Bottom,
    /// Band is centered in the measured height.
    #[default]
    CenterVertical,
}

/// How the child band height is chosen when the host offers more room than needed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
    /// Scale children up to the full available height.
    MatchParent,
    /// Keep the tallest visible child's natural height.
    #[default]
    WrapContent,
}

/// How item opacity is derived from the distance to the center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpacityPolicy {
    /// Every item is drawn fully opaque.
    #[default]
    Opaque,
    /// Items fade linearly with distance, reaching the fade floor at the outermost slot.
    DistanceFade,
}

/// Thresholds and multipliers for turning pointer input into offset changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Pointer travel in pixels below which a press is still a tap.
    pub min_move: f64,
    /// Horizontal sensitivity: a full widget width maps to `drag_multiple / 2` items.
    pub drag_multiple: f64,
    /// Multiplier from widget-widths per second to items per second on release.
    pub speed_multiple: f64,
    /// Largest release speed in items per second.
    pub max_speed: f64,
    /// Hold time in milliseconds before a press becomes a long press.
    pub long_press_timeout_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            min_move: 5.0,
            drag_multiple: 3.0,
            speed_multiple: 1.0,
            max_speed: 10.0,
            long_press_timeout_ms: 500,
        }
    }
}

/// Configuration for a [`CoverFlowEngine`](crate::CoverFlowEngine).
///
/// Construct with [`CoverFlowConfig::default`] and adjust through the `with_*`
/// methods. Values are checked by [`CoverFlowConfig::validate`] when the engine is
/// created.
///
/// ```
/// use understory_coverflow::{CoverFlowConfig, Gravity};
///
/// let config = CoverFlowConfig::default()
///     .with_visible_count(5)
///     .with_reflection_height_percent(30)
///     .with_gravity(Gravity::Top);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.half_visible(), 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFlowConfig {
    /// Total number of items drawn, center included. Must be odd and at least 3.
    pub visible_count: usize,
    /// Shrink per unit of distance from the center.
    pub card_scale: f64,
    /// Height of the reflection as a fraction of the image height. `0.0` disables reflections.
    pub reflection_height: f64,
    /// Gap in pixels between an image and its reflection.
    pub reflection_gap: f64,
    /// Vertical placement of the child band.
    pub gravity: Gravity,
    /// Child band sizing policy.
    pub layout_mode: LayoutMode,
    /// Opacity policy.
    pub opacity: OpacityPolicy,
    /// Tween duration per item of distance for [`set_selection`](crate::CoverFlowEngine::set_selection).
    pub selection_step_ms: u64,
    /// Whether tapping the centered item is reported.
    pub tap_enabled: bool,
    /// Whether holding the centered item is reported as a long press.
    pub long_press_enabled: bool,
    /// Gesture thresholds.
    pub gesture: GestureConfig,
}

impl Default for CoverFlowConfig {
    fn default() -> Self {
        Self {
            visible_count: 3,
            card_scale: DEFAULT_CARD_SCALE,
            reflection_height: 0.0,
            reflection_gap: 0.0,
            gravity: Gravity::default(),
            layout_mode: LayoutMode::default(),
            opacity: OpacityPolicy::default(),
            selection_step_ms: DEFAULT_SELECTION_STEP_MS,
            tap_enabled: true,
            long_press_enabled: false,
            gesture: GestureConfig::default(),
        }
    }
}

impl CoverFlowConfig {
    /// Sets the total visible count.
    #[must_use]
    pub const fn with_visible_count(mut self, count: usize) -> Self {
        self.visible_count = count;
        self
    }

    /// Sets the per-distance shrink.
    #[must_use]
    pub const fn with_card_scale(mut self, card_scale: f64) -> Self {
        self.card_scale = card_scale;
        self
    }

    /// Sets the reflection height as a raw fraction.
    #[must_use]
    pub const fn with_reflection_height(mut self, fraction: f64) -> Self {
        self.reflection_height = fraction;
        self
    }

    /// Sets the reflection height from a percentage, clamped to `0..=100`.
    #[must_use]
    pub fn with_reflection_height_percent(mut self, percent: i32) -> Self {
        self.reflection_height = f64::from(percent.clamp(0, 100)) / 100.0;
        self
    }

    /// Sets the reflection gap. Negative gaps become zero.
    #[must_use]
    pub fn with_reflection_gap(mut self, gap: f64) -> Self {
        self.reflection_gap = gap.max(0.0);
        self
    }

    /// Sets the gravity.
    #[must_use]
    pub const fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Sets the layout mode.
    #[must_use]
    pub const fn with_layout_mode(mut self, mode: LayoutMode) -> Self {
        self.layout_mode = mode;
        self
    }

    /// Sets the opacity policy.
    #[must_use]
    pub const fn with_opacity(mut self, opacity: OpacityPolicy) -> Self {
        self.opacity = opacity;
        self
    }

    /// Sets the per-item selection tween duration.
    #[must_use]
    pub const fn with_selection_step_ms(mut self, step_ms: u64) -> Self {
        self.selection_step_ms = step_ms;
        self
    }

    /// Enables or disables tap reporting.
    #[must_use]
    pub const fn with_tap_enabled(mut self, enabled: bool) -> Self {
        self.tap_enabled = enabled;
        self
    }

    /// Enables or disables long-press reporting.
    #[must_use]
    pub const fn with_long_press_enabled(mut self, enabled: bool) -> Self {
        self.long_press_enabled = enabled;
        self
    }

    /// Replaces the gesture thresholds.
    #[must_use]
    pub const fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    /// Number of items drawn on each side of the center.
    #[must_use]
    pub const fn half_visible(&self) -> usize {
        self.visible_count / 2
    }

    /// Checks the visible count and reflection fraction.
    pub fn validate(&self) -> Result<(), CoverFlowError> {
        check_visible_count(self.visible_count)?;
        if !(0.0..=1.0).contains(&self.reflection_height) {
            return Err(CoverFlowError::InvalidReflectionHeight {
                fraction: self.reflection_height,
            });
        }
        Ok(())
    }
}
