// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Rounds to the nearest integer, with halves rounding towards positive infinity.
///
/// `f64::round` rounds halves away from zero, which would pick a different
/// center item for offsets like `-0.5`.
#[inline]
pub(crate) fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Returns `true` if `x` has no fractional part.
#[inline]
pub(crate) fn is_integral(x: f64) -> bool {
    x - x.floor() == 0.0
}

/// Converts an already-integral offset into a draw position.
#[inline]
pub(crate) fn to_position(x: f64) -> isize {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Offsets are rounded before the cast and stay far below isize::MAX in practice"
    )]
    let position = x as isize;
    position
}

/// Wraps `offset + half` into `[0, count)` and shifts it back by `half`.
///
/// This keeps the visual position of a drifted offset while bringing it into the
/// first loop over the data.
pub(crate) fn wrap_offset(offset: f64, count: usize, half: usize) -> f64 {
    if count == 0 {
        return offset;
    }
    let n = count as f64;
    let shifted = offset + half as f64;
    let mut wrapped = shifted % n;
    if wrapped < 0.0 {
        wrapped += n;
    }
    // Adding `n` to a tiny negative remainder can round up to `n` itself.
    if wrapped >= n {
        wrapped -= n;
    }
    wrapped - half as f64
}
