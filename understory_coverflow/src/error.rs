// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors raised synchronously by the engine's setup entry points.

/// Smallest item count the carousel can operate on.
pub const MIN_ITEM_COUNT: usize = 3;

/// Smallest total number of visible items (center plus one on each side).
pub const MIN_VISIBLE_COUNT: usize = 3;

/// Errors returned when the engine is configured with values it cannot operate on.
///
/// Missing images or failed reflections are not errors: those slots are skipped
/// for the current frame and retried on the next one.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum CoverFlowError {
    /// The data source holds fewer than [`MIN_ITEM_COUNT`] items.
    #[error("item count must not be less than 3, got {count}")]
    TooFewItems {
        /// Item count that was supplied.
        count: usize,
    },
    /// The visible count is even, so there is no center item.
    #[error("visible count must be an odd number, got {count}")]
    EvenVisibleCount {
        /// Visible count that was supplied.
        count: usize,
    },
    /// The visible count is below [`MIN_VISIBLE_COUNT`].
    #[error("visible count must be at least 3, got {count}")]
    VisibleCountTooSmall {
        /// Visible count that was supplied.
        count: usize,
    },
    /// A selection index lies outside `0..count`.
    #[error("index {index} is out of range for {count} items")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current item count.
        count: usize,
    },
    /// The widget width is zero, negative, or not finite.
    #[error("widget width must be positive and finite, got {width}")]
    InvalidWidth {
        /// Width that was supplied.
        width: f64,
    },
    /// A reflection height fraction outside `0.0..=1.0`.
    #[error("reflection height must be a fraction in 0..=1, got {fraction}")]
    InvalidReflectionHeight {
        /// Fraction that was supplied.
        fraction: f64,
    },
}

/// Checks the item count against [`MIN_ITEM_COUNT`].
pub(crate) fn check_item_count(count: usize) -> Result<(), CoverFlowError> {
    if count < MIN_ITEM_COUNT {
        Err(CoverFlowError::TooFewItems { count })
    } else {
        Ok(())
    }
}

/// Checks that `count` is an odd number of at least [`MIN_VISIBLE_COUNT`].
pub(crate) fn check_visible_count(count: usize) -> Result<(), CoverFlowError> {
    if count % 2 == 0 {
        return Err(CoverFlowError::EvenVisibleCount { count });
    }
    if count < MIN_VISIBLE_COUNT {
        return Err(CoverFlowError::VisibleCountTooSmall { count });
    }
    Ok(())
}
