use thiserror::Error;

/// Validation and contract errors exposed by `marketbrief-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter, '^' or '$': '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid instrument type '{value}', expected one of stock, forex, index")]
    InvalidInstrumentKind { value: String },

    #[error("invalid horizon '{value}', expected one of 1d, 1w, 1mo, 3mo")]
    InvalidHorizon { value: String },

    #[error("invalid history window '{value}', expected one of 7d, 1mo, 3mo")]
    InvalidHistoryWindow { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("unix timestamp {seconds} is out of the representable range")]
    TimestampOutOfRange { seconds: i64 },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
}

/// Errors raised while loading the instrument catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("catalog is missing required column '{name}'")]
    MissingColumn { name: &'static str },

    #[error("catalog line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: ValidationError,
    },

    #[error("catalog line {line}: target price '{value}' is not a number")]
    InvalidTargetPrice { line: u64, value: String },
}

/// Errors raised while reading process configuration.
///
/// Raised before any network call is made so a misconfigured run
/// fails immediately instead of mid-report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {name} is not set")]
    MissingVar { name: &'static str },

    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },
}
