//! Yahoo Finance chart API integration for the market series (dollar index,
//! bond ETFs, commodity futures).

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::data::retry::RetryPolicy;
use crate::data::source::{FetchError, SeriesSource};
use crate::domain::{Provider, Series};
use crate::error::AppError;

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
// The chart endpoint rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

pub struct YahooClient {
    client: Client,
    policy: RetryPolicy,
}

impl YahooClient {
    pub fn new(policy: RetryPolicy) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(policy.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build market-data HTTP client: {e}")))?;
        Ok(Self { client, policy })
    }

    fn fetch_once(&self, symbol: &str, start: NaiveDate) -> Result<Series, FetchError> {
        let period1 = start
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or(0);
        let period2 = Utc::now().timestamp();
        let url = format!("{BASE_URL}/{}", encode_symbol(symbol));

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
                ("includeAdjustedClose", "true".to_string()),
            ])
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            // Yahoo reports unknown symbols as 404 with a JSON error body.
            let detail = parse_chart(symbol, &body)
                .err()
                .map(|e| e.to_string())
                .unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        parse_chart(symbol, &body)
    }
}

impl SeriesSource for YahooClient {
    fn provider(&self) -> Provider {
        Provider::Yahoo
    }

    /// Daily closing prices, adjusted for splits/dividends when available.
    fn fetch(&self, symbol: &str, start: NaiveDate) -> Result<Series, FetchError> {
        self.policy
            .run(&format!("Yahoo {symbol}"), || self.fetch_once(symbol, start))
    }
}

fn encode_symbol(symbol: &str) -> String {
    symbol.replace('^', "%5E")
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Parse a chart payload into a daily close series.
///
/// Bar timestamps are shifted by the exchange GMT offset before taking the
/// calendar date, so a bar stamped at the New York open lands on its trading
/// day. Adjusted closes win over raw closes when present.
fn parse_chart(symbol: &str, body: &str) -> Result<Series, FetchError> {
    let parsed: ChartResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Parse(format!("chart response for {symbol}: {e}")))?;

    if let Some(err) = parsed.chart.error {
        return Err(FetchError::Api(format!("{}: {}", err.code, err.description)));
    }

    let result = parsed
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| FetchError::Empty(symbol.to_string()))?;

    let offset = result.meta.map(|m| m.gmtoffset).unwrap_or(0);
    let closes = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .filter(|c| !c.is_empty())
        .or_else(|| result.indicators.quote.into_iter().next().map(|q| q.close))
        .ok_or_else(|| FetchError::Parse(format!("no close prices for {symbol}")))?;

    let observations: Vec<(NaiveDate, f64)> = result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
            Some((date, close?))
        })
        .collect();

    if observations.is_empty() {
        return Err(FetchError::Empty(symbol.to_string()));
    }

    Ok(Series::from_observations(symbol, observations))
}
