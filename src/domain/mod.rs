//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the calendar-indexed `Series` and its provenance
//! - the fixed set of input keys (`SeriesKey`)
//! - score kinds, weight pairs and score results

pub mod series;
pub mod types;

pub use series::*;
pub use types::*;
