use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use minute_bars_core::bar::Bar;
use minute_bars_core::request::TimeSeriesRequest;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::provider::BarProvider;

const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Yahoo Finance market data provider.
/// No authentication required. Minute bars are only served for roughly the
/// last 30 days, and at most ~8 days per request.
pub struct YahooProvider {
    client: Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(YAHOO_CHART_URL.to_string())
    }

    /// Create with a custom base URL (for testing).
    pub fn with_base_url(base_url: String) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, base_url })
    }
}

/// Unix-second bounds for a request: `start` 00:00 UTC up to the day after `end`.
fn query_window(request: &TimeSeriesRequest) -> (i64, i64) {
    let midnight = |d: NaiveDate| d.and_time(NaiveTime::MIN).and_utc().timestamp();
    (midnight(request.start()), midnight(request.day_after_end()))
}

#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    #[serde(default)]
    meta: Option<YahooMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooMeta {
    #[serde(rename = "exchangeTimezoneName")]
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

fn f64_to_decimal(val: f64) -> Result<Decimal, ProviderError> {
    Decimal::try_from(val).map_err(|e| ProviderError::Parse(format!("invalid decimal value: {e}")))
}

fn optional_decimal(values: &[Option<f64>], i: usize) -> Result<Option<Decimal>, ProviderError> {
    values.get(i).copied().flatten().map(f64_to_decimal).transpose()
}

fn exchange_timezone(meta: Option<&YahooMeta>) -> Tz {
    let Some(name) = meta.and_then(|m| m.exchange_timezone_name.as_deref()) else {
        return Tz::UTC;
    };
    name.parse().unwrap_or_else(|_| {
        debug!("unknown exchange timezone '{name}', using UTC");
        Tz::UTC
    })
}

fn parse_yahoo_result(result: &YahooResult) -> Result<Vec<Bar>, ProviderError> {
    // Yahoo omits the timestamp array entirely when the window has no trading.
    let Some(timestamps) = result.timestamp.as_ref() else {
        return Ok(Vec::new());
    };
    let Some(quote) = result.indicators.quote.first() else {
        return Ok(Vec::new());
    };
    let tz = exchange_timezone(result.meta.as_ref());

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let close = match quote.close.get(i).copied().flatten() {
            Some(v) => f64_to_decimal(v)?,
            None => continue, // padding minute with no trades
        };

        let timestamp = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| ProviderError::Parse(format!("invalid unix timestamp: {ts}")))?
            .with_timezone(&tz)
            .naive_local();

        bars.push(Bar {
            timestamp,
            open: optional_decimal(&quote.open, i)?,
            high: optional_decimal(&quote.high, i)?,
            low: optional_decimal(&quote.low, i)?,
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
        });
    }

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

/// Turn a decoded chart response into bars.
/// A chart-level error (unknown symbol, window outside retention) yields no bars.
fn bars_from_response(symbol: &str, body: &YahooResponse) -> Result<Vec<Bar>, ProviderError> {
    if let Some(error) = &body.chart.error {
        warn!(
            "{symbol}: provider returned no data ({}: {})",
            error.code, error.description
        );
        return Ok(Vec::new());
    }

    match body.chart.result.as_deref() {
        Some([first, ..]) => parse_yahoo_result(first),
        _ => Ok(Vec::new()),
    }
}

#[async_trait]
impl BarProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch_bars(&self, request: &TimeSeriesRequest) -> Result<Vec<Bar>, ProviderError> {
        let symbol = request.symbol();
        let (period1, period2) = query_window(request);
        let url = format!("{}/{}", self.base_url, symbol);
        debug!("Fetching {symbol} {} bars from {url}", request.interval());

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", request.interval().as_str().to_string()),
                ("includePrePost", "false".to_string()),
            ])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 60,
            });
        }

        // Yahoo reports unknown symbols and out-of-range windows as a 4xx with a
        // chart error body, so decode before looking at the status.
        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<YahooResponse>(&text) {
            Ok(body) => bars_from_response(symbol, &body),
            Err(_) if !status.is_success() => Err(ProviderError::Api {
                status: status.as_u16(),
                message: text,
            }),
            Err(e) => Err(ProviderError::Parse(format!(
                "failed to parse response: {e}"
            ))),
        }
    }
}
