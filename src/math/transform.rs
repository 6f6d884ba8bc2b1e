//! Series transforms used by the score engine.

use crate::domain::Series;
use crate::error::SeriesError;

/// Simple percent change over `periods` positions: `x[i] / x[i - periods] - 1`.
///
/// Nothing is filled first: a position is defined only when both endpoints are
/// defined. The first `periods` positions are always gaps, and a zero base
/// yields a gap rather than an infinity.
pub fn pct_change(series: &Series, periods: usize, label: impl Into<String>) -> Series {
    let points = series.points();
    let dates: Vec<_> = series.dates().collect();
    let values = (0..points.len())
        .map(|i| {
            let prev = i.checked_sub(periods).and_then(|j| points[j].1)?;
            let curr = points[i].1?;
            Some(curr / prev - 1.0)
        })
        .collect();
    Series::from_parts(label, &dates, values)
}

/// `a - b`, pointwise.
pub fn difference(a: &Series, b: &Series, label: impl Into<String>) -> Result<Series, SeriesError> {
    a.zip_with(b, label, |x, y| Some(x - y))
}

/// `num / den`, pointwise; infinite or undefined quotients become gaps.
pub fn ratio(num: &Series, den: &Series, label: impl Into<String>) -> Result<Series, SeriesError> {
    num.zip_with(den, label, |x, y| Some(x / y))
}

/// Mean of the defined values among the last `window` positions.
///
/// Returns `None` when that window holds no defined value.
pub fn trailing_mean(series: &Series, window: usize) -> Option<f64> {
    let start = series.len().saturating_sub(window);
    let (sum, n) = series.points()[start..]
        .iter()
        .filter_map(|(_, v)| *v)
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
