//! The retrieval seam between the pipeline and remote providers.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Provenance, Provider, Series, SeriesKey};

/// Why one series could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, timeout, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("HTTP {status}{}", fmt_detail(.detail))]
    Status { status: u16, detail: String },

    /// The provider answered but reported an error in its payload.
    #[error("provider error: {0}")]
    Api(String),

    /// The payload did not have the expected shape.
    #[error("malformed payload: {0}")]
    Parse(String),

    /// The request succeeded but carried no usable observations.
    #[error("no observations for '{0}'")]
    Empty(String),
}

fn fmt_detail(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {detail}")
    }
}

impl FetchError {
    /// Transient failures worth another attempt: transport errors, rate
    /// limiting and server-side errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http(_) => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::Api(_) | FetchError::Parse(_) | FetchError::Empty(_) => false,
        }
    }
}

/// A provider that returns raw observations for an identifier.
///
/// Implementations own their transport concerns (timeouts, retries). The
/// returned series is sorted by date and may contain gaps.
pub trait SeriesSource: Sync {
    fn provider(&self) -> Provider;

    fn fetch(&self, code: &str, start: NaiveDate) -> Result<Series, FetchError>;
}

/// What to fetch for one input: a primary code plus fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub key: SeriesKey,
    pub code: String,
    pub alternates: Vec<String>,
}

impl SeriesRequest {
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.code.as_str()).chain(self.alternates.iter().map(String::as_str))
    }
}

/// Fetch one input, trying the primary code and then each alternate.
///
/// Never fails: if every code errors or comes back empty, a warning is logged
/// and an empty series is returned, so one bad input cannot stop the run.
pub fn fetch_or_empty(source: &dyn SeriesSource, request: &SeriesRequest, start: NaiveDate) -> Series {
    let provider = source.provider();
    for code in request.codes() {
        log::debug!("fetching {} from {} as '{code}'", request.key.name(), provider.display_name());
        match source.fetch(code, start) {
            Ok(series) if series.has_data() => {
                log::info!(
                    "{}: {} observations from {} ('{code}')",
                    request.key.name(),
                    series.valid_count(),
                    provider.display_name()
                );
                return series.with_label(request.key.label()).with_provenance(Some(Provenance {
                    provider,
                    code: code.to_string(),
                }));
            }
            Ok(_) => log::warn!("{}: no data for '{code}'", request.key.name()),
            Err(err) => log::warn!("{}: failed to fetch '{code}': {err}", request.key.name()),
        }
    }

    log::warn!(
        "{}: all identifiers failed; continuing with an empty series",
        request.key.name()
    );
    Series::empty(request.key.label())
}


#[cfg(test)]
mod tests {
    use super::fake::FakeSource;
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn request(code: &str, alternates: &[&str]) -> SeriesRequest {
        SeriesRequest {
            key: SeriesKey::Dxy,
            code: code.to_string(),
            alternates: alternates.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn falls_back_to_alternate_symbol() {
        let series = Series::from_observations("raw", vec![(start(), 104.2)]);
        let source = FakeSource::new(Provider::Yahoo).failing("DX-Y.NYB").with("DX=F", series);

        let got = fetch_or_empty(&source, &request("DX-Y.NYB", &["DX=F"]), start());

        assert_eq!(got.valid_count(), 1);
        assert_eq!(got.label, SeriesKey::Dxy.label());
        let provenance = got.provenance.unwrap();
        assert_eq!(provenance.code, "DX=F");
        assert_eq!(provenance.provider, Provider::Yahoo);
        assert_eq!(*source.calls.lock().unwrap(), vec!["DX-Y.NYB", "DX=F"]);
    }

    #[test]
    fn exhausting_every_code_yields_empty_series() {
        let source = FakeSource::new(Provider::Yahoo).failing("A");
        let got = fetch_or_empty(&source, &request("A", &["B"]), start());
        assert!(got.is_empty());
        assert!(got.provenance.is_none());
    }

    #[test]
    fn gap_only_result_counts_as_no_data() {
        let gaps = Series::from_parts("raw", &[start()], vec![None]);
        let source = FakeSource::new(Provider::Fred).with("WALCL", gaps);
        let got = fetch_or_empty(&source, &request("WALCL", &[]), start());
        assert!(got.is_empty());
    }

    #[test]
    fn retryability_follows_status_class() {
        assert!(FetchError::Status { status: 502, detail: String::new() }.is_retryable());
        assert!(FetchError::Status { status: 429, detail: String::new() }.is_retryable());
        assert!(!FetchError::Status { status: 404, detail: String::new() }.is_retryable());
        assert!(!FetchError::Parse("x".into()).is_retryable());
        assert_eq!(
            FetchError::Status { status: 404, detail: "Not Found".into() }.to_string(),
            "HTTP 404: Not Found"
        );
    }
}
