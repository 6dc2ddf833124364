//! Instrument catalog loaded from CSV.
//!
//! The catalog is the run's configuration surface: one row per
//! instrument, loaded once and read-only afterwards. Any malformed row
//! is a load error carrying its line number; catalogs fail fast rather
//! than reporting on a partially understood instrument list.

use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use csv::StringRecord;
use tracing::debug;

use crate::error::CatalogError;
use crate::{Instrument, InstrumentKind, Symbol};

const COLUMN_TICKER: &str = "Ticker";
const COLUMN_TITLE: &str = "Title";
const COLUMN_TARGET_PRICE: &str = "Target Price";
const COLUMN_TYPE: &str = "Type";
const COLUMN_CHART_TICKER: &str = "StockCharts Ticker";

/// Ordered, immutable list of instruments to report on.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentCatalog {
    instruments: Vec<Instrument>,
}

impl InstrumentCatalog {
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading instrument catalog");
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = ColumnIndexes::resolve(&headers)?;

        let mut instruments = Vec::new();
        for (index, record) in csv_reader.records().enumerate() {
            // The header occupies line 1; records start on line 2.
            let line = (index + 2) as u64;
            let record = record?;
            instruments.push(columns.parse_row(&record, line)?);
        }

        Ok(Self { instruments })
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instrument> {
        self.instruments.iter()
    }
}

impl<'a> IntoIterator for &'a InstrumentCatalog {
    type Item = &'a Instrument;
    type IntoIter = std::slice::Iter<'a, Instrument>;

    fn into_iter(self) -> Self::IntoIter {
        self.instruments.iter()
    }
}

struct ColumnIndexes {
    ticker: usize,
    title: usize,
    target_price: usize,
    kind: usize,
    chart_ticker: usize,
}

impl ColumnIndexes {
    fn resolve(headers: &StringRecord) -> Result<Self, CatalogError> {
        Ok(Self {
            ticker: find_column(headers, COLUMN_TICKER)?,
            title: find_column(headers, COLUMN_TITLE)?,
            target_price: find_column(headers, COLUMN_TARGET_PRICE)?,
            kind: find_column(headers, COLUMN_TYPE)?,
            chart_ticker: find_column(headers, COLUMN_CHART_TICKER)?,
        })
    }

    fn parse_row(&self, record: &StringRecord, line: u64) -> Result<Instrument, CatalogError> {
        let row_error = |source| CatalogError::Row { line, source };

        let symbol =
            Symbol::parse(record.get(self.ticker).unwrap_or_default()).map_err(row_error)?;
        let title = record.get(self.title).unwrap_or_default();
        let kind = InstrumentKind::from_str(record.get(self.kind).unwrap_or_default())
            .map_err(row_error)?;

        let target_price = match present(record.get(self.target_price)) {
            Some(raw) => Some(f64::from_str(raw).map_err(|_| {
                CatalogError::InvalidTargetPrice {
                    line,
                    value: raw.to_owned(),
                }
            })?),
            None => None,
        };

        let chart_symbol = match present(record.get(self.chart_ticker)) {
            Some(raw) => Some(Symbol::parse(raw).map_err(row_error)?),
            None => None,
        };

        Instrument::new(symbol, title, kind, target_price, chart_symbol).map_err(row_error)
    }
}

fn find_column(headers: &StringRecord, name: &'static str) -> Result<usize, CatalogError> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
        .ok_or(CatalogError::MissingColumn { name })
}

/// Treats blank cells and the literal `N/A` as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|raw| !raw.is_empty() && !raw.eq_ignore_ascii_case("n/a"))
}
