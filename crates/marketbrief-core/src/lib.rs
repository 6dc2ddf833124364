//! Core library for marketbrief.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The change calculator and report assembler
//! - The alert evaluator for watch mode
//! - Boundary traits and adapters (price source, chart source, notifier)
//! - Catalog loading and mail settings

pub mod adapters;
pub mod alert;
pub mod catalog;
pub mod change;
pub mod chart;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod notify;
pub mod provider;
pub mod render;
pub mod report;

pub use adapters::YahooSource;
pub use alert::{AlertEvaluator, AlertEvent};
pub use catalog::InstrumentCatalog;
pub use change::{ChangeBasis, ChangeCalculator, ChangeResult};
pub use chart::{inline_image, ChartSource, StockChartsSource};
pub use config::MailSettings;
pub use domain::{
    HistoryWindow, Horizon, Instrument, InstrumentKind, PricePoint, PriceSeries, QuoteSnapshot,
    Symbol, UtcDateTime,
};
pub use error::{CatalogError, ConfigError, ValidationError};
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};
pub use notify::{Notifier, NotifyError, OutboundMessage, SmtpNotifier};
pub use provider::{PriceSource, SourceError, SourceErrorKind};
pub use render::{classify, Movement, Palette};
pub use report::{MissingRowPolicy, Report, ReportAssembler, ReportPlan, ReportRow};
