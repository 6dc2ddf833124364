//! Price provider boundary.
//!
//! `PriceSource` is the contract the report pipeline consumes: a latest
//! quote and a trailing close-price history per instrument. Failures are
//! structured `SourceError`s so callers can decide containment (a failed
//! instrument degrades one report row, it never aborts the run).

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{HistoryWindow, PriceSeries, QuoteSnapshot, Symbol};

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    MalformedResponse,
    MissingData,
    Internal,
}

/// Structured provider error carried through the report pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::MalformedResponse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn missing_data(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::MissingData,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::MalformedResponse => "source.malformed_response",
            SourceErrorKind::MissingData => "source.missing_data",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Price provider contract.
///
/// Implementations must be `Send + Sync`; the pipeline awaits one call
/// at a time, in catalog order.
pub trait PriceSource: Send + Sync {
    /// Fetches the latest quote for a symbol.
    fn quote<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteSnapshot, SourceError>> + Send + 'a>>;

    /// Fetches trailing daily close history covering `window`.
    ///
    /// The returned series may be shorter than the window implies; it is
    /// the calculator's job to degrade gracefully, not the provider's to
    /// guarantee depth.
    fn history<'a>(
        &'a self,
        symbol: &'a Symbol,
        window: HistoryWindow,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_follows_kind() {
        let err = SourceError::rate_limited("slow down");
        assert_eq!(err.kind(), SourceErrorKind::RateLimited);
        assert_eq!(err.code(), "source.rate_limited");
        assert!(err.retryable());
    }

    #[test]
    fn missing_data_is_not_retryable() {
        let err = SourceError::missing_data("no close history");
        assert!(!err.retryable());
        assert_eq!(format!("{err}"), "no close history (source.missing_data)");
    }
}
