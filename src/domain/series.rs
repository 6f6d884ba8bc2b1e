//! Calendar-indexed series of optional values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

/// Which remote provider a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// FRED (St. Louis Fed statistical API).
    Fred,
    /// Yahoo Finance chart data.
    Yahoo,
}

impl Provider {
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Fred => "FRED",
            Provider::Yahoo => "Yahoo Finance",
        }
    }
}

/// Where a series came from. Informational only; never used in computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub provider: Provider,
    /// Raw provider code (FRED series id or market ticker actually used).
    pub code: String,
}

/// An ordered mapping `date -> Option<f64>`.
///
/// Dates are strictly increasing. A `None` value is a gap. Non-finite numbers
/// are never stored; they are turned into gaps on the way in.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub provenance: Option<Provenance>,
    points: Vec<(NaiveDate, Option<f64>)>,
}

impl Series {
    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            provenance: None,
            points: Vec::new(),
        }
    }

    /// Build a series from raw observations in any order.
    ///
    /// Observations are sorted by date; for duplicate dates the last one wins.
    pub fn from_observations<I>(label: impl Into<String>, observations: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut raw: Vec<(NaiveDate, f64)> = observations.into_iter().collect();
        // Stable sort keeps input order among equal dates, so "last wins" holds.
        raw.sort_by_key(|(d, _)| *d);

        let mut points: Vec<(NaiveDate, Option<f64>)> = Vec::with_capacity(raw.len());
        for (date, value) in raw {
            let value = value.is_finite().then_some(value);
            match points.last_mut() {
                Some(last) if last.0 == date => last.1 = value,
                _ => points.push((date, value)),
            }
        }

        Self {
            label: label.into(),
            provenance: None,
            points,
        }
    }

    /// Build a series from a date index and a parallel value vector.
    ///
    /// The caller guarantees `dates` is strictly increasing. Extra entries on
    /// the longer side are dropped.
    pub fn from_parts(label: impl Into<String>, dates: &[NaiveDate], values: Vec<Option<f64>>) -> Self {
        let points = dates
            .iter()
            .copied()
            .zip(values)
            .map(|(d, v)| (d, v.filter(|x| x.is_finite())))
            .collect();
        Self {
            label: label.into(),
            provenance: None,
            points,
        }
    }

    pub fn with_provenance(mut self, provenance: Option<Provenance>) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series has no positions at all.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when at least one position holds a defined value.
    pub fn has_data(&self) -> bool {
        self.points.iter().any(|(_, v)| v.is_some())
    }

    pub fn points(&self) -> &[(NaiveDate, Option<f64>)] {
        &self.points
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|(d, _)| *d)
    }

    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.points.iter().map(|(_, v)| *v)
    }

    /// Defined values only, in date order.
    pub fn defined(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.points.iter().filter_map(|(d, v)| v.map(|x| (*d, x)))
    }

    pub fn valid_count(&self) -> usize {
        self.points.iter().filter(|(_, v)| v.is_some()).count()
    }

    /// Date of the first defined value.
    pub fn first_valid_date(&self) -> Option<NaiveDate> {
        self.defined().next().map(|(d, _)| d)
    }

    pub fn last_valid(&self) -> Option<(NaiveDate, f64)> {
        self.defined().last()
    }

    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |(d, _)| *d)
            .ok()
            .and_then(|i| self.points[i].1)
    }

    /// Whether two series sit on exactly the same date index.
    pub fn same_index(&self, other: &Series) -> bool {
        self.points.len() == other.points.len()
            && self.dates().zip(other.dates()).all(|(a, b)| a == b)
    }

    /// Apply `f` to every defined value; gaps stay gaps.
    ///
    /// `f` may return `None` (or a non-finite number) to turn a value into a gap.
    pub fn map_values<F>(&self, label: impl Into<String>, f: F) -> Series
    where
        F: Fn(f64) -> Option<f64>,
    {
        let points = self
            .points
            .iter()
            .map(|(d, v)| (*d, v.and_then(&f).filter(|x| x.is_finite())))
            .collect();
        Series {
            label: label.into(),
            provenance: None,
            points,
        }
    }

    /// Combine two series on the same index pointwise.
    ///
    /// A position is defined only when both operands are defined and `f`
    /// yields a finite number.
    pub fn zip_with<F>(&self, other: &Series, label: impl Into<String>, f: F) -> Result<Series, SeriesError>
    where
        F: Fn(f64, f64) -> Option<f64>,
    {
        if !self.same_index(other) {
            return Err(SeriesError::IndexMismatch {
                left: self.label.clone(),
                right: other.label.clone(),
            });
        }
        let points = self
            .points
            .iter()
            .zip(&other.points)
            .map(|((d, a), (_, b))| {
                let v = match (a, b) {
                    (Some(a), Some(b)) => f(*a, *b).filter(|x| x.is_finite()),
                    _ => None,
                };
                (*d, v)
            })
            .collect();
        Ok(Series {
            label: label.into(),
            provenance: None,
            points,
        })
    }
}
