//! Daily price history from the Yahoo Finance chart API
//!
//! One request per fetch, no retries and no caching. Unknown tickers and
//! ranges without trading days come back as an empty [`PriceHistory`].

use crate::data::{DailyBar, OhlcvData, PriceHistory};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, info, warn};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const BASE_URL_ENV: &str = "STOCKCAST_YAHOO_URL";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; stockcast/0.1)";

/// Connection settings for the chart API
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl YahooConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Chart endpoint for `ticker`, with the ticker percent-encoded as one path segment
    pub fn chart_url(&self, ticker: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ForecastError::InvalidParameter(format!("Invalid base URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ForecastError::InvalidParameter(format!(
                    "Base URL {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart"])
            .push(ticker);
        Ok(url)
    }
}

impl Default for YahooConfig {
    fn default() -> Self {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Client for daily OHLCV history
#[derive(Debug, Clone)]
pub struct YahooFinanceClient {
    config: YahooConfig,
    http: reqwest::Client,
}

impl YahooFinanceClient {
    pub fn new(config: YahooConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { config, http })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(YahooConfig::default())
    }

    /// Fetch daily bars for `ticker` with dates in `[start, end)`
    pub async fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceHistory> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            warn!("empty ticker, returning no data");
            return PriceHistory::empty(ticker);
        }
        if end <= start {
            warn!(%start, %end, "empty date range, returning no data");
            return PriceHistory::empty(ticker);
        }

        let url = self.config.chart_url(ticker)?;
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = end.and_time(NaiveTime::MIN).and_utc().timestamp();
        debug!(%url, period1, period2, "requesting daily history");

        let resp = self
            .http
            .get(url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
                ("includeAdjustedClose", "true".to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if status == StatusCode::NOT_FOUND {
            warn!(ticker, "ticker not found, returning no data");
            return PriceHistory::empty(ticker);
        }
        if !status.is_success() {
            return Err(ForecastError::Provider(format!(
                "chart request for {} failed with status {}",
                ticker, status
            )));
        }

        let bars = parse_chart(&body, start, end)?;
        info!(ticker, rows = bars.len(), "fetched daily history");
        PriceHistory::from_bars(ticker, bars)
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
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
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
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

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

fn at(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

/// Parse a chart API response body into daily bars within `[start, end)`.
///
/// A "Not Found" error or a null result parses to no bars. Rows with any
/// missing price are dropped.
pub fn parse_chart(body: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyBar>> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| ForecastError::Provider(format!("malformed chart response: {}", e)))?;

    if let Some(err) = envelope.chart.error {
        if err.code == "Not Found" {
            return Ok(Vec::new());
        }
        return Err(ForecastError::Provider(format!(
            "{}: {}",
            err.code,
            err.description.unwrap_or_default()
        )));
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let Some(datetime) = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0) else {
            continue;
        };
        let date = datetime.date_naive();
        if date < start || date >= end {
            continue;
        }

        let (Some(open), Some(high), Some(low), Some(close)) = (
            at(&quote.open, i),
            at(&quote.high, i),
            at(&quote.low, i),
            at(&quote.close, i),
        ) else {
            continue;
        };

        bars.push(DailyBar {
            date,
            data: OhlcvData {
                open,
                high,
                low,
                close,
                adj_close: at(&adjclose, i).unwrap_or(close),
                volume: at(&quote.volume, i).unwrap_or(0.0).max(0.0) as u64,
            },
        });
    }

    Ok(bars)
}
