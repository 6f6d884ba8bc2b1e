//! FRED API integration for the statistical series (balance sheet, reserves,
//! Treasury yields).

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::align::to_daily;
use crate::data::retry::RetryPolicy;
use crate::data::source::{FetchError, SeriesSource};
use crate::domain::{Provider, Series};
use crate::error::AppError;

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const USER_AGENT: &str = concat!("regime-dash/", env!("CARGO_PKG_VERSION"));

pub struct FredClient {
    client: Client,
    api_key: String,
    policy: RetryPolicy,
}

impl FredClient {
    /// Build a client for an explicit API key.
    ///
    /// The key is passed in rather than read here so the client carries no
    /// ambient process state.
    pub fn new(api_key: impl Into<String>, policy: RetryPolicy) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(policy.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build FRED HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            policy,
        })
    }

    fn fetch_once(&self, series_id: &str, start: NaiveDate) -> Result<Series, FetchError> {
        let start = start.format("%Y-%m-%d").to_string();
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("observation_start", start.as_str()),
            ])
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                detail: error_message(&body).unwrap_or_default(),
            });
        }

        parse_observations(series_id, &body)
    }
}

impl SeriesSource for FredClient {
    fn provider(&self) -> Provider {
        Provider::Fred
    }

    /// Fetch observations from `start` and return them as a gap-free daily
    /// series (weekends/holidays and "." values are interpolated).
    fn fetch(&self, series_id: &str, start: NaiveDate) -> Result<Series, FetchError> {
        let raw = self
            .policy
            .run(&format!("FRED {series_id}"), || self.fetch_once(series_id, start))?;
        Ok(to_daily(&raw))
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error_message: String,
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|e| e.error_message)
}

/// Parse an observations payload into a raw (unfilled) series.
///
/// Missing observations (FRED writes them as ".") become gaps.
fn parse_observations(series_id: &str, body: &str) -> Result<Series, FetchError> {
    let parsed: ObservationsResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Parse(format!("FRED response for {series_id}: {e}")))?;

    let mut dates = Vec::with_capacity(parsed.observations.len());
    let mut values = Vec::with_capacity(parsed.observations.len());
    for obs in parsed.observations {
        let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
            .map_err(|e| FetchError::Parse(format!("invalid FRED date '{}': {e}", obs.date)))?;
        dates.push(date);
        values.push(parse_value(&obs.value));
    }

    if !values.iter().any(Option::is_some) {
        return Err(FetchError::Empty(series_id.to_string()));
    }

    // Gaps must survive, so sort the pairs here rather than via `from_observations`.
    // The sort is stable, so for duplicate dates the last one wins there too.
    let mut pairs: Vec<(NaiveDate, Option<f64>)> = dates.into_iter().zip(values).collect();
    pairs.sort_by_key(|(d, _)| *d);
    let mut deduped: Vec<(NaiveDate, Option<f64>)> = Vec::with_capacity(pairs.len());
    for (date, value) in pairs {
        match deduped.last_mut() {
            Some(last) if last.0 == date => last.1 = value,
            _ => deduped.push((date, value)),
        }
    }
    let (dates, values): (Vec<_>, Vec<_>) = deduped.into_iter().unzip();
    Ok(Series::from_parts(series_id, &dates, values))
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() {
        Some(v)
    } else {
        None
    }
}
