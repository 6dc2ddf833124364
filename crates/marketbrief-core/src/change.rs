//! Percentage-change computation over look-back horizons.
//!
//! The calculator is a pure function of `(as_of, series, latest,
//! horizon)`. Series come in whatever shape the provider produced:
//! short, gappy or empty. Every degenerate input maps to an explicit
//! `Unavailable` result; the calculator never panics and never yields
//! a non-finite percentage.

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::{HistoryWindow, Horizon, PriceSeries};

/// Provenance of a change value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeBasis {
    /// Derived locally from the price series.
    Computed,
    /// Taken from the provider's own aggregate field.
    ProviderSupplied,
    /// Could not be derived; `percent` holds the 0.0 sentinel.
    Unavailable,
}

/// One percentage change over one horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeResult {
    pub horizon: Horizon,
    pub percent: f64,
    pub basis: ChangeBasis,
}

impl ChangeResult {
    pub const fn unavailable(horizon: Horizon) -> Self {
        Self {
            horizon,
            percent: 0.0,
            basis: ChangeBasis::Unavailable,
        }
    }

    pub fn computed(horizon: Horizon, percent: f64) -> Self {
        if !percent.is_finite() {
            return Self::unavailable(horizon);
        }
        Self {
            horizon,
            percent,
            basis: ChangeBasis::Computed,
        }
    }

    pub fn provider_supplied(horizon: Horizon, percent: f64) -> Self {
        if !percent.is_finite() {
            return Self::unavailable(horizon);
        }
        Self {
            horizon,
            percent,
            basis: ChangeBasis::ProviderSupplied,
        }
    }

    pub const fn is_available(&self) -> bool {
        !matches!(self.basis, ChangeBasis::Unavailable)
    }
}

/// Derives percentage changes from close-price series.
#[derive(Debug, Clone, Copy)]
pub struct ChangeCalculator {
    as_of: Date,
}

impl ChangeCalculator {
    pub const fn new(as_of: Date) -> Self {
        Self { as_of }
    }

    pub const fn as_of(&self) -> Date {
        self.as_of
    }

    /// Computes the change for one horizon against `latest`.
    ///
    /// `latest` is the price the change is measured to, usually the
    /// provider quote; the series supplies the reference it is
    /// measured from.
    pub fn compute(&self, series: &PriceSeries, latest: f64, horizon: Horizon) -> ChangeResult {
        if series.len() < 2 {
            return ChangeResult::unavailable(horizon);
        }
        if !latest.is_finite() || latest <= 0.0 {
            return ChangeResult::unavailable(horizon);
        }

        let reference = match self.reference_close(series, horizon) {
            Some(value) => value,
            None => return ChangeResult::unavailable(horizon),
        };
        if !reference.is_finite() || reference <= 0.0 {
            return ChangeResult::unavailable(horizon);
        }

        ChangeResult::computed(horizon, (latest - reference) / reference * 100.0)
    }

    fn reference_close(&self, series: &PriceSeries, horizon: Horizon) -> Option<f64> {
        let points = &series.points;
        match horizon {
            Horizon::OneDay => points.get(points.len() - 2).map(|point| point.close),
            Horizon::OneWeek => {
                if series.window == HistoryWindow::OneWeek {
                    // A dedicated one-week fetch is the look-back itself.
                    return series.first().map(|point| point.close);
                }
                if points.len() > 6 {
                    points.get(points.len() - 6).map(|point| point.close)
                } else {
                    None
                }
            }
            Horizon::OneMonth => self.calendar_reference(series, 30, HistoryWindow::OneMonth),
            Horizon::ThreeMonth => self.calendar_reference(series, 90, HistoryWindow::ThreeMonths),
        }
    }

    /// Close of the most recent trading day at or before `as_of - days`.
    ///
    /// A series fetched for exactly this horizon may start just inside
    /// the cutoff; its first point is then the closest available
    /// approximation.
    fn calendar_reference(
        &self,
        series: &PriceSeries,
        days: i64,
        dedicated: HistoryWindow,
    ) -> Option<f64> {
        let cutoff = self.as_of.checked_sub(Duration::days(days))?;
        match series.last_at_or_before(cutoff) {
            Some(point) => Some(point.close),
            None if series.window == dedicated => series.first().map(|point| point.close),
            None => None,
        }
    }
}
