use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Trailing window of history requested from the price provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryWindow {
    #[serde(rename = "7d")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
}

impl HistoryWindow {
    pub const ALL: [Self; 3] = [Self::OneWeek, Self::OneMonth, Self::ThreeMonths];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneWeek => "7d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
        }
    }
}

impl Display for HistoryWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryWindow {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "7d" => Ok(Self::OneWeek),
            "1mo" => Ok(Self::OneMonth),
            "3mo" => Ok(Self::ThreeMonths),
            other => Err(ValidationError::InvalidHistoryWindow {
                value: other.to_owned(),
            }),
        }
    }
}

/// Look-back horizon a percentage change is measured over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonth,
}

impl Horizon {
    pub const ALL: [Self; 4] = [
        Self::OneDay,
        Self::OneWeek,
        Self::OneMonth,
        Self::ThreeMonth,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::OneWeek => "1w",
            Self::OneMonth => "1mo",
            Self::ThreeMonth => "3mo",
        }
    }

    /// Column header used by the report renderers.
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneDay => "1 Day",
            Self::OneWeek => "1 Week",
            Self::OneMonth => "1 Month",
            Self::ThreeMonth => "3 Months",
        }
    }

    /// History window a series must cover for this horizon.
    ///
    /// The short horizons all resolve against one shared 1-month fetch;
    /// only the 3-month horizon needs the longer series.
    pub const fn source_window(self) -> HistoryWindow {
        match self {
            Self::OneDay | Self::OneWeek | Self::OneMonth => HistoryWindow::OneMonth,
            Self::ThreeMonth => HistoryWindow::ThreeMonths,
        }
    }
}

impl Display for Horizon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Horizon {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(Self::OneDay),
            "1w" => Ok(Self::OneWeek),
            "1mo" => Ok(Self::OneMonth),
            "3mo" => Ok(Self::ThreeMonth),
            other => Err(ValidationError::InvalidHorizon {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_horizon() {
        let horizon = Horizon::from_str("1mo").expect("must parse");
        assert_eq!(horizon, Horizon::OneMonth);
    }

    #[test]
    fn rejects_invalid_horizon() {
        let err = Horizon::from_str("2w").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidHorizon { .. }));
    }

    #[test]
    fn short_horizons_share_the_month_window() {
        assert_eq!(Horizon::OneDay.source_window(), HistoryWindow::OneMonth);
        assert_eq!(Horizon::OneWeek.source_window(), HistoryWindow::OneMonth);
        assert_eq!(Horizon::OneMonth.source_window(), HistoryWindow::OneMonth);
        assert_eq!(
            Horizon::ThreeMonth.source_window(),
            HistoryWindow::ThreeMonths
        );
    }

    #[test]
    fn parses_history_window() {
        let window = HistoryWindow::from_str("7d").expect("must parse");
        assert_eq!(window, HistoryWindow::OneWeek);
    }
}
