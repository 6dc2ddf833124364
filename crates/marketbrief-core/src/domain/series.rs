use serde::{Deserialize, Serialize};
use time::Date;

use crate::{HistoryWindow, Symbol, UtcDateTime, ValidationError};

/// Single daily close observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub ts: UtcDateTime,
    pub close: f64,
}

impl PricePoint {
    pub fn new(ts: UtcDateTime, close: f64) -> Result<Self, ValidationError> {
        validate_non_negative("close", close)?;
        Ok(Self { ts, close })
    }
}

/// Close-price history for one instrument over a requested window.
///
/// Points are ordered oldest to newest; the constructor sorts so the
/// invariant holds regardless of provider ordering. A series may be
/// empty or shorter than the window implies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    pub window: HistoryWindow,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: Symbol, window: HistoryWindow, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|point| point.ts);
        Self {
            symbol,
            window,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Most recent point dated at or before `cutoff`.
    pub fn last_at_or_before(&self, cutoff: Date) -> Option<&PricePoint> {
        self.points
            .iter()
            .rev()
            .find(|point| point.ts.date() <= cutoff)
    }
}

/// Latest-quote payload from the price provider.
///
/// `day_change_percent` is the provider's own day-over-day aggregate,
/// kept separate from locally computed changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub symbol: Symbol,
    pub price: f64,
    pub currency: Option<String>,
    pub previous_close: Option<f64>,
    pub day_change_percent: Option<f64>,
}

impl QuoteSnapshot {
    pub fn new(
        symbol: Symbol,
        price: f64,
        currency: Option<String>,
        previous_close: Option<f64>,
        day_change_percent: Option<f64>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;
        validate_optional_non_negative("previous_close", previous_close)?;
        validate_optional_finite("day_change_percent", day_change_percent)?;

        Ok(Self {
            symbol,
            price,
            currency,
            previous_close,
            day_change_percent,
        })
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

fn validate_optional_non_negative(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        validate_non_negative(field, value)?;
    }
    Ok(())
}

fn validate_optional_finite(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { field });
        }
    }
    Ok(())
}
