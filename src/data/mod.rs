//! Remote data providers.
//!
//! - `fred`: statistical series from the St. Louis Fed API
//! - `yahoo`: daily closes from the Yahoo Finance chart API
//! - `source`: the `SeriesSource` seam plus fallback-to-empty retrieval
//! - `retry`: bounded retry with capped exponential backoff

pub mod fred;
pub mod retry;
pub mod source;
pub mod yahoo;

pub use fred::FredClient;
pub use retry::RetryPolicy;
pub use source::{FetchError, SeriesRequest, SeriesSource, fetch_or_empty};
pub use yahoo::YahooClient;
