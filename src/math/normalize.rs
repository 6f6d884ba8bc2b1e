//! Min-max normalization onto the unit interval.

use crate::domain::Series;

/// Rescale a series onto `[0, 1]` over its own observed range.
///
/// `out[d] = (s[d] - min) / (max - min)` over the defined values. A constant
/// series (including a single observation) maps every defined value to `0`.
/// Gaps stay gaps; the input is not modified.
pub fn normalize(series: &Series) -> Series {
    let Some((min, max)) = value_range(series) else {
        return series.map_values(series.label.clone(), Some);
    };

    let span = max - min;
    if span == 0.0 {
        return series.map_values(series.label.clone(), |_| Some(0.0));
    }

    // Clamp guards against rounding pushing an endpoint a hair outside [0, 1].
    if span.is_finite() {
        return series.map_values(series.label.clone(), |v| Some(((v - min) / span).clamp(0.0, 1.0)));
    }

    // The range overflows f64; halve every operand to keep it finite.
    let half_span = max / 2.0 - min / 2.0;
    series.map_values(series.label.clone(), |v| {
        Some(((v / 2.0 - min / 2.0) / half_span).clamp(0.0, 1.0))
    })
}

/// `(min, max)` over the defined values, or `None` when there are none.
pub fn value_range(series: &Series) -> Option<(f64, f64)> {
    series.defined().fold(None, |acc, (_, v)| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
