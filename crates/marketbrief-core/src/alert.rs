//! Intraday move alerts.
//!
//! Watch mode compares the latest price against the previous session
//! close and fires when the move's magnitude reaches the configured
//! threshold. The evaluator is stateless: a breach re-fires on every
//! invocation until the price reverts, and de-duplication is left to
//! whoever schedules the runs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::provider::{PriceSource, SourceError};
use crate::{HistoryWindow, Instrument, UtcDateTime};

/// A threshold breach observed for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub instrument: Instrument,
    pub change_percent: f64,
    pub threshold: f64,
    pub triggered_at: UtcDateTime,
}

impl AlertEvent {
    pub fn subject(&self) -> String {
        format!(
            "Price alert: {} moved {:.2}%",
            self.instrument.title, self.change_percent
        )
    }

    pub fn text_body(&self) -> String {
        format!(
            "{} ({}) moved {:.2}% against the previous close, \
             crossing the {:.2}% alert threshold.\nTriggered at {}.\n",
            self.instrument.title,
            self.instrument.symbol,
            self.change_percent,
            self.threshold.abs(),
            self.triggered_at,
        )
    }
}

/// Evaluates instruments against an intraday move threshold.
pub struct AlertEvaluator {
    source: Arc<dyn PriceSource>,
}

impl AlertEvaluator {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self { source }
    }

    /// Checks one instrument against `threshold` percent.
    ///
    /// Only the threshold's magnitude matters and the boundary is
    /// inclusive: a -2.0% move fires at a 2.0 threshold. Provider
    /// failures propagate so the caller can distinguish "no alert"
    /// from "could not check".
    pub async fn evaluate(
        &self,
        instrument: &Instrument,
        threshold: f64,
    ) -> Result<Option<AlertEvent>, SourceError> {
        let quote = self.source.quote(&instrument.symbol).await?;
        let reference = match quote.previous_close {
            Some(close) => close,
            None => self.session_reference(instrument).await?,
        };

        if !reference.is_finite() || reference <= 0.0 {
            return Err(SourceError::missing_data(format!(
                "no usable reference close for {}",
                instrument.symbol
            )));
        }
        if !quote.price.is_finite() || quote.price <= 0.0 {
            return Err(SourceError::missing_data(format!(
                "no usable latest price for {}",
                instrument.symbol
            )));
        }

        let change = (quote.price - reference) / reference * 100.0;
        debug!(
            symbol = %instrument.symbol,
            change,
            threshold,
            "evaluated intraday move"
        );

        if change.abs() >= threshold.abs() {
            Ok(Some(AlertEvent {
                instrument: instrument.clone(),
                change_percent: change,
                threshold,
                triggered_at: UtcDateTime::now(),
            }))
        } else {
            Ok(None)
        }
    }

    /// Previous session close from a short history fetch, for quotes
    /// that carry no previous-close field.
    async fn session_reference(&self, instrument: &Instrument) -> Result<f64, SourceError> {
        let series = self
            .source
            .history(&instrument.symbol, HistoryWindow::OneWeek)
            .await?;

        let points = &series.points;
        if points.len() < 2 {
            return Err(SourceError::missing_data(format!(
                "history for {} is too short to derive a previous close",
                instrument.symbol
            )));
        }
        Ok(points[points.len() - 2].close)
    }
}
