use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{PriceSource, SourceError};
use crate::{
    HistoryWindow, PricePoint, PriceSeries, QuoteSnapshot, Symbol, UtcDateTime, ValidationError,
};

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Price source backed by the Yahoo Finance chart API.
///
/// Both operations hit the v8 chart endpoint: `quote` reads the result
/// `meta`, `history` reads the timestamp/close arrays. The endpoint
/// needs no cookie or crumb authentication.
#[derive(Clone)]
pub struct YahooSource {
    http_client: Arc<dyn HttpClient>,
}

impl YahooSource {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    async fn fetch_chart(
        &self,
        symbol: &Symbol,
        range: &str,
    ) -> Result<YahooChartResult, SourceError> {
        let endpoint = format!(
            "{CHART_BASE_URL}/{}?range={}&interval=1d",
            urlencoding::encode(symbol.as_str()),
            range,
        );
        debug!(symbol = %symbol, range, "fetching yahoo chart");

        let request = HttpRequest::get(&endpoint)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(10_000);

        let response = self.http_client.execute(request).await.map_err(|e| {
            if e.retryable() {
                SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
            } else {
                SourceError::internal(format!("yahoo transport error: {}", e.message()))
            }
        })?;

        if response.status == 429 {
            return Err(SourceError::rate_limited("yahoo returned status 429"));
        }

        // Symbol-level failures come back with a non-success status and a
        // structured error object in the body, so parse before rejecting
        // on status alone.
        let body = response
            .body_text()
            .map_err(|e| SourceError::malformed_response(e.message().to_owned()))?;
        let parsed: YahooChartResponse = serde_json::from_str(body).map_err(|e| {
            if response.is_success() {
                SourceError::malformed_response(format!("failed to parse yahoo chart: {e}"))
            } else {
                SourceError::unavailable(format!("yahoo returned status {}", response.status))
            }
        })?;

        if let Some(error) = parsed.chart.error {
            return Err(map_api_error(symbol, &error));
        }

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        parsed
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| SourceError::malformed_response("yahoo chart response has no result"))
    }
}

impl PriceSource for YahooSource {
    fn quote<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteSnapshot, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let result = self.fetch_chart(symbol, "1d").await?;
            let meta = result.meta;

            let price = meta.regular_market_price.ok_or_else(|| {
                SourceError::missing_data(format!("yahoo quote for {symbol} has no market price"))
            })?;

            // For a 1d range request chartPreviousClose is the prior
            // session close, so it serves as a fallback.
            let previous_close = meta
                .previous_close
                .or(meta.chart_previous_close)
                .filter(|value| value.is_finite() && *value > 0.0);
            let day_change_percent =
                previous_close.map(|previous| (price - previous) / previous * 100.0);

            QuoteSnapshot::new(
                symbol.clone(),
                price,
                meta.currency,
                previous_close,
                day_change_percent,
            )
            .map_err(validation_to_error)
        })
    }

    fn history<'a>(
        &'a self,
        symbol: &'a Symbol,
        window: HistoryWindow,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let result = self.fetch_chart(symbol, window.as_str()).await?;

            let timestamps = result.timestamp.unwrap_or_default();
            let closes = result
                .indicators
                .quote
                .into_iter()
                .next()
                .map(|quote| quote.close)
                .unwrap_or_default();

            let mut points = Vec::with_capacity(timestamps.len());
            for (index, &seconds) in timestamps.iter().enumerate() {
                // Bars with a null close are gaps in Yahoo data; skip them.
                if let Some(close) = closes.get(index).copied().flatten() {
                    let ts = UtcDateTime::from_unix_timestamp(seconds).map_err(|e| {
                        SourceError::malformed_response(format!("yahoo bar timestamp: {e}"))
                    })?;
                    if let Ok(point) = PricePoint::new(ts, close) {
                        points.push(point);
                    }
                }
            }

            Ok(PriceSeries::new(symbol.clone(), window, points))
        })
    }
}

fn map_api_error(symbol: &Symbol, error: &YahooApiError) -> SourceError {
    if error.code.eq_ignore_ascii_case("not found") {
        SourceError::missing_data(format!("yahoo has no data for {symbol}: {}", error.description))
    } else {
        SourceError::unavailable(format!(
            "yahoo API error for {symbol}: {} ({})",
            error.description, error.code
        ))
    }
}

fn validation_to_error(error: ValidationError) -> SourceError {
    SourceError::malformed_response(error.to_string())
}

// Yahoo chart API response structures
#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooApiError {
    code: String,
    description: String,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    meta: YahooChartMeta,
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: YahooIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    currency: Option<String>,
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: Option<f64>,
    #[serde(rename = "chartPreviousClose", default)]
    chart_previous_close: Option<f64>,
    #[serde(rename = "previousClose", default)]
    previous_close: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooIndicatorQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooIndicatorQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}
