//! Chart image enrichment.
//!
//! Charts are a best-effort extra on top of the report: the source
//! fetches a rendered PNG per instrument and the renderer embeds it as
//! a self-contained `data:` URI, so the HTML displays in mail clients
//! that block remote images. A failed fetch only costs that
//! instrument's chart.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::debug;

use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::SourceError;
use crate::Symbol;

const STOCKCHARTS_BASE_URL: &str = "https://stockcharts.com/c-sc/sc";

/// Chart image provider contract.
pub trait ChartSource: Send + Sync {
    /// Fetches a rendered PNG chart for a symbol.
    fn chart_png<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, SourceError>> + Send + 'a>>;
}

/// Chart source backed by the StockCharts image endpoint.
#[derive(Clone)]
pub struct StockChartsSource {
    http_client: Arc<dyn HttpClient>,
}

impl StockChartsSource {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }
}

impl ChartSource for StockChartsSource {
    fn chart_png<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let endpoint = format!(
                "{STOCKCHARTS_BASE_URL}?s={}",
                urlencoding::encode(symbol.as_str())
            );
            debug!(symbol = %symbol, "fetching stockcharts image");

            let request = HttpRequest::get(&endpoint)
                .with_header("accept", "image/png")
                .with_timeout_ms(10_000);

            let response = self.http_client.execute(request).await.map_err(|e| {
                SourceError::unavailable(format!("stockcharts transport error: {}", e.message()))
            })?;

            if !response.is_success() {
                return Err(SourceError::unavailable(format!(
                    "stockcharts returned status {}",
                    response.status
                )));
            }
            if response.body.is_empty() {
                return Err(SourceError::missing_data(format!(
                    "stockcharts returned an empty image for {symbol}"
                )));
            }

            Ok(response.body)
        })
    }
}

/// Encodes raw PNG bytes as a `data:image/png;base64,...` URI.
pub fn inline_image(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}
