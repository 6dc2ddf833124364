use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Symbol, ValidationError};

/// Canonical instrument class, as declared by the catalog `Type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    Equity,
    Index,
    ForexPair,
}

impl InstrumentKind {
    pub const ALL: [Self; 3] = [Self::Equity, Self::Index, Self::ForexPair];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equity => "stock",
            Self::Index => "index",
            Self::ForexPair => "forex",
        }
    }
}

impl Display for InstrumentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstrumentKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stock" | "equity" => Ok(Self::Equity),
            "index" => Ok(Self::Index),
            "forex" | "fx" => Ok(Self::ForexPair),
            other => Err(ValidationError::InvalidInstrumentKind {
                value: other.to_owned(),
            }),
        }
    }
}

/// Catalog entry describing one instrument to report on.
///
/// Immutable after the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: Symbol,
    pub title: String,
    pub kind: InstrumentKind,
    pub target_price: Option<f64>,
    pub chart_symbol: Option<Symbol>,
}

impl Instrument {
    pub fn new(
        symbol: Symbol,
        title: impl Into<String>,
        kind: InstrumentKind,
        target_price: Option<f64>,
        chart_symbol: Option<Symbol>,
    ) -> Result<Self, ValidationError> {
        validate_optional_non_negative("target_price", target_price)?;

        let title = title.into();
        let title = if title.trim().is_empty() {
            symbol.as_str().to_owned()
        } else {
            title
        };

        Ok(Self {
            symbol,
            title,
            kind,
            target_price,
            chart_symbol,
        })
    }
}

fn validate_optional_non_negative(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { field });
        }
        if value < 0.0 {
            return Err(ValidationError::NegativeValue { field });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_kind_spellings() {
        assert_eq!(
            InstrumentKind::from_str(" Stock ").expect("must parse"),
            InstrumentKind::Equity
        );
        assert_eq!(
            InstrumentKind::from_str("FOREX").expect("must parse"),
            InstrumentKind::ForexPair
        );
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = InstrumentKind::from_str("bond").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidInstrumentKind { .. }));
    }

    #[test]
    fn blank_title_falls_back_to_symbol() {
        let symbol = Symbol::parse("AAPL").expect("symbol");
        let instrument =
            Instrument::new(symbol, "  ", InstrumentKind::Equity, None, None).expect("instrument");
        assert_eq!(instrument.title, "AAPL");
    }

    #[test]
    fn rejects_negative_target_price() {
        let symbol = Symbol::parse("AAPL").expect("symbol");
        let err = Instrument::new(symbol, "Apple", InstrumentKind::Equity, Some(-1.0), None)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::NegativeValue { .. }));
    }
}
