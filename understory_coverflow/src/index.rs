// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circular mapping from draw positions to data indices.
//!
//! A draw position is an unbounded integer on the carousel's strip. The engine
//! keeps the offset of the first visible slot, so `half_visible` is added to a
//! position before it wraps over the item count. This is what lets the offset
//! drift arbitrarily far in either direction while every slot still resolves to
//! a real item.

/// Maps a draw position to a logical index in `0..item_count`.
///
/// Returns `None` when `item_count` is zero.
///
/// ```
/// use understory_coverflow::wrap_position;
///
/// // Five items, one visible on each side of the center.
/// assert_eq!(wrap_position(-1, 5, 1), Some(0));
/// assert_eq!(wrap_position(3, 5, 1), Some(4));
/// assert_eq!(wrap_position(4, 5, 1), Some(0));
/// assert_eq!(wrap_position(-13, 5, 1), Some(3));
/// assert_eq!(wrap_position(0, 0, 1), None);
/// ```
#[must_use]
pub fn wrap_position(position: isize, item_count: usize, half_visible: usize) -> Option<usize> {
    if item_count == 0 {
        return None;
    }
    // Reduce both terms first so the addition cannot overflow.
    let count = item_count as i128;
    let wrapped = ((position as i128).rem_euclid(count) + half_visible as i128).rem_euclid(count);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "rem_euclid keeps the value in 0..item_count, which fits in usize"
    )]
    let index = wrapped as usize;
    Some(index)
}

/// Returns the draw position at which `index` sits in the center slot.
///
/// This is the inverse of [`wrap_position`] within the first loop over the data.
#[must_use]
pub fn centered_position(index: usize, half_visible: usize) -> isize {
    #[allow(
        clippy::cast_possible_wrap,
        reason = "Item counts are far below isize::MAX"
    )]
    let position = index as isize - half_visible as isize;
    position
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn wraps_across_many_loops() {
        assert_eq!(wrap_position(-1, 3, 1), Some(0));
        assert_eq!(wrap_position(-2, 3, 1), Some(2));
        assert_eq!(wrap_position(1_000_001, 3, 1), Some(0));
        assert_eq!(wrap_position(-1_000_000, 7, 3), Some(2));
    }

    #[test]
    fn extreme_positions_do_not_overflow() {
        assert!(wrap_position(isize::MAX, 5, 2).is_some());
        assert!(wrap_position(isize::MIN, 5, 2).is_some());
    }

    #[test]
    fn centered_position_round_trips() {
        for index in 0..9 {
            assert_eq!(wrap_position(centered_position(index, 2), 9, 2), Some(index));
        }
    }

    proptest! {
        #[test]
        fn result_is_always_in_range(
            position in any::<isize>(),
            count in 3_usize..500,
            half in 1_usize..10,
        ) {
            let index = wrap_position(position, count, half).unwrap();
            prop_assert!(index < count);
        }

        #[test]
        fn mapping_is_periodic_in_item_count(
            position in -1_000_000_isize..1_000_000,
            count in 3_usize..500,
            half in 1_usize..10,
        ) {
            let shifted = position + count as isize;
            prop_assert_eq!(
                wrap_position(position, count, half),
                wrap_position(shifted, count, half)
            );
        }
    }
}
