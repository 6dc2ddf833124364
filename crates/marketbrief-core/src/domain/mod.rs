//! Canonical domain types for the report pipeline.
//!
//! All models validate their invariants at construction time and carry
//! full serde support. Price data is allowed to be missing or short;
//! the calculator and assembler are written against that reality
//! rather than against ideal series.

mod horizon;
mod instrument;
mod series;
mod symbol;
mod timestamp;

pub use horizon::{HistoryWindow, Horizon};
pub use instrument::{Instrument, InstrumentKind};
pub use series::{PricePoint, PriceSeries, QuoteSnapshot};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
