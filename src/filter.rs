//! Moving-average smoothing and min/max normalization.

#![forbid(unsafe_code)]

use crate::invariant_ppt::{assert_invariant, FILTER_LENGTH_PRESERVED, NORMALIZED_IN_UNIT_RANGE};

/// Ranges narrower than this make [`normalize`] a no-op.
pub const NORMALIZE_EPSILON: f32 = 0.001;

/// Mean of the in-range neighbours `i - half ..= i + half`.
pub(crate) fn window_mean(values: &[f32], i: usize, half: usize) -> f32 {
    let lo = i.saturating_sub(half);
    let hi = i.saturating_add(half).min(values.len() - 1);
    let mut sum = 0.0f32;
    for &v in &values[lo..=hi] {
        sum += v;
    }
    sum / (hi - lo + 1) as f32
}

/// Centered moving average over `window` samples.
///
/// Output `i` averages inputs `i - window/2 ..= i + window/2` that fall inside
/// the slice, in ascending order, divided by how many were in range. Edge
/// windows are therefore smaller. A window of 0 behaves like 1.
pub fn moving_average(values: &[f32], window: usize) -> Vec<f32> {
    let half = window / 2;
    let out: Vec<f32> = (0..values.len())
        .map(|i| window_mean(values, i, half))
        .collect();
    assert_invariant(
        FILTER_LENGTH_PRESERVED,
        out.len() == values.len(),
        "moving average keeps one output per input",
        Some("moving_average"),
    );
    out
}

/// Rescale to `(v - min) / (max - min)`.
///
/// If `max - min < NORMALIZE_EPSILON` the values come back unchanged rather
/// than blowing up to NaN or infinity.
pub fn normalize(values: &[f32], min: f32, max: f32) -> Vec<f32> {
    let mut out = values.to_vec();
    normalize_in_place(&mut out, min, max);
    out
}

/// In-place form of [`normalize`]. Returns `false` when the range was too
/// narrow and nothing was touched.
pub fn normalize_in_place(values: &mut [f32], min: f32, max: f32) -> bool {
    normalize_each(values.iter_mut(), min, max)
}

/// Rescale every value the iterator yields. Lets callers normalize a field
/// of a struct slice without copying it out first.
pub(crate) fn normalize_each<'a>(
    values: impl IntoIterator<Item = &'a mut f32>,
    min: f32,
    max: f32,
) -> bool {
    let range = max - min;
    if !(range >= NORMALIZE_EPSILON) {
        return false;
    }
    let mut in_unit = true;
    for v in values {
        let inside = min <= *v && *v <= max;
        *v = (*v - min) / range;
        in_unit &= !inside || (0.0..=1.0).contains(v);
    }
    assert_invariant(
        NORMALIZED_IN_UNIT_RANGE,
        in_unit,
        "values inside [min, max] land in [0, 1]",
        Some("normalize"),
    );
    true
}
