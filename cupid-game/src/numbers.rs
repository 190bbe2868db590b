//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round half up (toward positive infinity) and clamp to the i32 range.
///
/// Score deltas such as `-1.5` land on `-1`. Returns 0 for NaN.
#[must_use]
pub fn round_half_up_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let rounded = (value + 0.5).floor().clamp(min, max);
    cast::<f64, i32>(rounded).unwrap_or(0)
}

/// Scale a unit draw in `[0, 1)` to an index below `len`.
///
/// Returns `None` for an empty range. Draws at or above 1.0 clamp to the
/// last index.
#[must_use]
pub fn unit_to_index(unit: f64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let len_f = cast::<usize, f64>(len).unwrap_or(f64::MAX);
    let scaled = (unit.clamp(0.0, 1.0) * len_f).floor();
    let idx = cast::<f64, usize>(scaled).unwrap_or(0);
    Some(idx.min(len - 1))
}
