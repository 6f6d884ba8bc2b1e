//! Alignment of heterogeneous series onto one daily calendar.
//!
//! Inputs arrive with different start dates, weekday-only or weekly/monthly
//! sampling, and interior holes. Every series used jointly by a score must sit
//! on the same contiguous daily index, so alignment:
//!
//! 1. builds the index from the earliest first observation of any non-empty
//!    input through the end date (inclusive)
//! 2. reindexes each series onto it (dates outside its support become gaps)
//! 3. fills gaps by linear interpolation, extending the first/last defined
//!    value over the leading/trailing runs
//!
//! An input with no defined values comes out fully missing, same length.

use chrono::{Days, NaiveDate, Utc};

use crate::domain::Series;
use crate::error::AlignError;
use crate::math::fill_linear;

/// Series reindexed onto a shared daily calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSet {
    pub index: Vec<NaiveDate>,
    /// Same order as the input slice.
    pub series: Vec<Series>,
}

impl AlignedSet {
    pub fn start(&self) -> Option<NaiveDate> {
        self.index.first().copied()
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.index.last().copied()
    }
}

/// Align onto an index that ends today (UTC calendar date).
pub fn align(series: &[Series]) -> Result<AlignedSet, AlignError> {
    align_until(series, Utc::now().date_naive())
}

/// Align onto an index that ends at `end`.
pub fn align_until(series: &[Series], end: NaiveDate) -> Result<AlignedSet, AlignError> {
    let start = series
        .iter()
        .filter_map(Series::first_valid_date)
        .min()
        .ok_or(AlignError::NoData)?;

    if start > end {
        return Err(AlignError::StartAfterEnd { start, end });
    }

    let index = daily_index(start, end);
    let series = series.iter().map(|s| reindex_filled(s, &index)).collect();

    Ok(AlignedSet { index, series })
}

/// Every calendar day in `[start, end]`; empty when `start > end`.
pub fn daily_index(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut day = start;
    while day <= end {
        out.push(day);
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }
    out
}

/// Reindex `series` onto `index` and fill the gaps.
pub fn reindex_filled(series: &Series, index: &[NaiveDate]) -> Series {
    let raw: Vec<Option<f64>> = index.iter().map(|d| series.value_at(*d)).collect();
    Series::from_parts(series.label.clone(), index, fill_linear(&raw))
        .with_provenance(series.provenance.clone())
}

/// Convert a raw (possibly business-day or sparser) series into a gap-free
/// daily series spanning its own first to last observation.
pub fn to_daily(series: &Series) -> Series {
    let dates: Vec<NaiveDate> = series.dates().collect();
    match (dates.first(), dates.last()) {
        (Some(&first), Some(&last)) => reindex_filled(series, &daily_index(first, last)),
        _ => series.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Provenance, Provider};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn index_spans_earliest_start_to_end_without_gaps() {
        let a = Series::from_observations("a", vec![(d(2025, 1, 10), 1.0), (d(2025, 1, 13), 4.0)]);
        let b = Series::from_observations("b", vec![(d(2025, 1, 6), 2.0)]);
        let end = d(2025, 1, 15);

        let aligned = align_until(&[a, b], end).unwrap();

        assert_eq!(aligned.start(), Some(d(2025, 1, 6)));
        assert_eq!(aligned.end(), Some(end));
        assert_eq!(aligned.index.len(), 10);
        for pair in aligned.index.windows(2) {
            assert_eq!(pair[1] - pair[0], chrono::Duration::days(1));
        }
        for s in &aligned.series {
            assert_eq!(s.len(), aligned.index.len());
            assert_eq!(s.valid_count(), aligned.index.len());
        }
    }

    #[test]
    fn fills_interior_by_interpolation_and_edges_by_nearest() {
        let a = Series::from_observations("a", vec![(d(2025, 1, 10), 1.0), (d(2025, 1, 13), 4.0)]);
        let b = Series::from_observations("b", vec![(d(2025, 1, 8), 0.0)]);
        let aligned = align_until(&[a, b], d(2025, 1, 14)).unwrap();

        let a = &aligned.series[0];
        assert_eq!(a.value_at(d(2025, 1, 8)), Some(1.0));
        assert_eq!(a.value_at(d(2025, 1, 11)), Some(2.0));
        assert_eq!(a.value_at(d(2025, 1, 12)), Some(3.0));
        assert_eq!(a.value_at(d(2025, 1, 14)), Some(4.0));
    }

    #[test]
    fn empty_input_aligns_to_fully_missing_series_of_same_length() {
        let a = Series::from_observations("a", vec![(d(2025, 2, 1), 1.0)]);
        let empty = Series::empty("nothing");
        let aligned = align_until(&[a, empty], d(2025, 2, 5)).unwrap();

        assert_eq!(aligned.series[1].len(), 5);
        assert_eq!(aligned.series[1].valid_count(), 0);
        assert_eq!(aligned.series[1].label, "nothing");
    }

    #[test]
    fn all_empty_inputs_fail_with_no_data() {
        let err = align_until(&[Series::empty("a"), Series::empty("b")], d(2025, 1, 1)).unwrap_err();
        assert_eq!(err, AlignError::NoData);
        assert_eq!(align_until(&[], d(2025, 1, 1)).unwrap_err(), AlignError::NoData);
    }

    #[test]
    fn series_with_only_gaps_counts_as_empty() {
        let gaps = Series::from_parts("g", &[d(2020, 1, 1)], vec![None]);
        let a = Series::from_observations("a", vec![(d(2025, 1, 1), 1.0)]);
        let aligned = align_until(&[gaps, a], d(2025, 1, 2)).unwrap();
        assert_eq!(aligned.start(), Some(d(2025, 1, 1)));
    }

    #[test]
    fn observations_after_end_do_not_shape_the_fill() {
        let a = Series::from_observations("a", vec![(d(2025, 1, 1), 1.0), (d(2025, 1, 5), 5.0)]);
        let aligned = align_until(&[a], d(2025, 1, 3)).unwrap();
        let vals: Vec<Option<f64>> = aligned.series[0].values().collect();
        assert_eq!(vals, vec![Some(1.0), Some(1.0), Some(1.0)]);
    }

    #[test]
    fn align_ends_the_index_today() {
        let before = Utc::now().date_naive();
        let a = Series::from_observations("a", vec![(before - chrono::Duration::days(3), 2.0)]);
        let aligned = align(&[a]).unwrap();
        let after = Utc::now().date_naive();

        let end = aligned.end().unwrap();
        assert!(end == before || end == after, "index ended on {end}");
        assert_eq!(aligned.index.len(), (end - aligned.start().unwrap()).num_days() as usize + 1);
    }

    #[test]
    fn start_after_end_is_rejected() {
        let a = Series::from_observations("a", vec![(d(2030, 1, 1), 1.0)]);
        let err = align_until(&[a], d(2025, 1, 1)).unwrap_err();
        assert!(matches!(err, AlignError::StartAfterEnd { .. }));
    }

    #[test]
    fn aligning_aligned_series_is_idempotent() {
        let end = d(2025, 4, 30);
        let index = daily_index(d(2025, 4, 21), end);
        let a = Series::from_parts("a", &index, (0..index.len()).map(|i| Some(i as f64 * 1.5)).collect())
            .with_provenance(Some(Provenance {
                provider: Provider::Fred,
                code: "WALCL".to_string(),
            }));
        let b = Series::from_parts("b", &index, (0..index.len()).map(|i| Some(10.0 - i as f64)).collect());
        let input = vec![a, b];

        let once = align_until(&input, end).unwrap();
        assert_eq!(once.series, input);

        let twice = align_until(&once.series, end).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn to_daily_bridges_weekends() {
        // Friday and Monday observations.
        let s = Series::from_observations("fred", vec![(d(2025, 1, 3), 3.0), (d(2025, 1, 6), 6.0)]);
        let daily = to_daily(&s);
        let vals: Vec<Option<f64>> = daily.values().collect();
        assert_eq!(vals, vec![Some(3.0), Some(4.0), Some(5.0), Some(6.0)]);
    }

    #[test]
    fn daily_index_is_inclusive() {
        assert_eq!(daily_index(d(2024, 2, 28), d(2024, 3, 1)).len(), 3);
        assert!(daily_index(d(2024, 3, 2), d(2024, 3, 1)).is_empty());
    }
}
