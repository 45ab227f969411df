//! Numeric conversion helpers centralizing lossy casts used by statistics.

use num_traits::cast::cast;

/// Convert a u64 counter to f64, allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Convert a usize count to f64, allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Convert an interpolation offset to f64, allowing precision loss in a single location.
#[must_use]
pub fn i128_to_f64(value: i128) -> f64 {
    cast::<i128, f64>(value).unwrap_or(0.0)
}

/// Widen a slot or sample count to u64, saturating on exotic targets.
#[must_use]
pub fn usize_to_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// Percentage change of `value` relative to `baseline`, 0.0 when the baseline is zero.
#[must_use]
pub fn percent_change(baseline: f64, value: f64) -> f64 {
    if baseline == 0.0 {
        return 0.0;
    }
    (value - baseline) / baseline * 100.0
}
