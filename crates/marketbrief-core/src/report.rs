//! Report assembly over the price provider.
//!
//! The assembler walks the catalog in order, one instrument at a time,
//! and turns quotes plus history into rendered report rows. A failed
//! instrument degrades into a placeholder row (or is skipped, per the
//! plan); only a run where every instrument failed collapses the report
//! into a single explanatory notice. The assembler itself never fails.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::Date;
use tracing::warn;

use crate::change::{ChangeCalculator, ChangeResult};
use crate::chart::{inline_image, ChartSource};
use crate::provider::{PriceSource, SourceError};
use crate::render::{self, Palette};
use crate::{HistoryWindow, Horizon, Instrument, InstrumentCatalog, PriceSeries};

/// Containment policy for instruments whose data could not be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingRowPolicy {
    /// Keep the instrument visible as an `N/A` row.
    #[default]
    Placeholder,
    /// Drop the instrument from the report.
    Skip,
}

/// Data-driven description of the report to assemble.
///
/// Column set and order follow `horizons`; there are no hand-built
/// report variants.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPlan {
    pub title: String,
    pub horizons: Vec<Horizon>,
    pub missing_rows: MissingRowPolicy,
    pub palette: Palette,
}

impl Default for ReportPlan {
    fn default() -> Self {
        Self {
            title: String::from("Daily Market Report"),
            horizons: vec![Horizon::OneDay, Horizon::OneWeek, Horizon::OneMonth],
            missing_rows: MissingRowPolicy::default(),
            palette: Palette::RED_GAIN,
        }
    }
}

impl ReportPlan {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_horizons(mut self, horizons: Vec<Horizon>) -> Self {
        self.horizons = horizons;
        self
    }

    pub fn with_missing_rows(mut self, policy: MissingRowPolicy) -> Self {
        self.missing_rows = policy;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Distinct source windows for the planned horizons, in first-use
    /// order, so each instrument costs one history fetch per window.
    pub fn source_windows(&self) -> Vec<HistoryWindow> {
        let mut windows = Vec::new();
        for horizon in &self.horizons {
            let window = horizon.source_window();
            if !windows.contains(&window) {
                windows.push(window);
            }
        }
        windows
    }
}

/// One rendered line of the report.
///
/// `latest_close == None` marks a placeholder for an instrument whose
/// data could not be fetched; such rows render `N/A` cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub instrument: Instrument,
    pub latest_close: Option<f64>,
    pub currency: Option<String>,
    pub changes: Vec<ChangeResult>,
    /// Inline `data:` URI of the instrument's chart, when embedded.
    pub chart: Option<String>,
}

impl ReportRow {
    pub fn placeholder(instrument: Instrument, horizons: &[Horizon]) -> Self {
        Self {
            instrument,
            latest_close: None,
            currency: None,
            changes: horizons
                .iter()
                .map(|&horizon| ChangeResult::unavailable(horizon))
                .collect(),
            chart: None,
        }
    }

    pub const fn is_placeholder(&self) -> bool {
        self.latest_close.is_none()
    }
}

/// Assembled report with both renderings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub generated_at: Date,
    pub rows: Vec<ReportRow>,
    /// Single explanatory line of a degraded report; set only when the
    /// catalog was non-empty and every instrument failed.
    pub notice: Option<String>,
    pub text_body: String,
    pub html_body: String,
}

impl Report {
    pub fn subject(&self) -> String {
        format!("{} - {}", self.title, self.generated_at)
    }
}

/// Builds reports from a price source, a plan and a catalog.
pub struct ReportAssembler {
    source: Arc<dyn PriceSource>,
    chart_source: Option<Arc<dyn ChartSource>>,
    plan: ReportPlan,
}

impl ReportAssembler {
    pub fn new(source: Arc<dyn PriceSource>, plan: ReportPlan) -> Self {
        Self {
            source,
            chart_source: None,
            plan,
        }
    }

    pub fn with_chart_source(mut self, chart_source: Arc<dyn ChartSource>) -> Self {
        self.chart_source = Some(chart_source);
        self
    }

    pub fn plan(&self) -> &ReportPlan {
        &self.plan
    }

    /// Assembles the report for `as_of`.
    ///
    /// Instruments are processed sequentially in catalog order and that
    /// order is preserved in `rows`. Never returns an error: data
    /// failures degrade rows, a total failure degrades the report body.
    pub async fn build(&self, catalog: &InstrumentCatalog, as_of: Date) -> Report {
        let calculator = ChangeCalculator::new(as_of);
        let mut rows = Vec::with_capacity(catalog.len());
        let mut failures = 0_usize;

        for instrument in catalog {
            match self.build_row(&calculator, instrument).await {
                Ok(row) => rows.push(row),
                Err(error) => {
                    failures += 1;
                    warn!(
                        symbol = %instrument.symbol,
                        error = %error,
                        "instrument data fetch failed; continuing"
                    );
                    if self.plan.missing_rows == MissingRowPolicy::Placeholder {
                        rows.push(ReportRow::placeholder(
                            instrument.clone(),
                            &self.plan.horizons,
                        ));
                    }
                }
            }
        }

        let notice = if !catalog.is_empty() && failures == catalog.len() {
            rows.clear();
            Some(String::from(
                "Market data could not be retrieved for any instrument in this run.",
            ))
        } else {
            None
        };

        let text_body = render::render_text(&self.plan, as_of, &rows, notice.as_deref());
        let html_body = render::render_html(&self.plan, as_of, &rows, notice.as_deref());

        Report {
            title: self.plan.title.clone(),
            generated_at: as_of,
            rows,
            notice,
            text_body,
            html_body,
        }
    }

    async fn build_row(
        &self,
        calculator: &ChangeCalculator,
        instrument: &Instrument,
    ) -> Result<ReportRow, SourceError> {
        let quote = self.source.quote(&instrument.symbol).await?;

        let mut series_by_window: Vec<(HistoryWindow, PriceSeries)> = Vec::new();
        for window in self.plan.source_windows() {
            let series = self.source.history(&instrument.symbol, window).await?;
            series_by_window.push((window, series));
        }

        let mut changes = Vec::with_capacity(self.plan.horizons.len());
        for &horizon in &self.plan.horizons {
            let window = horizon.source_window();
            let series = series_by_window
                .iter()
                .find(|(candidate, _)| *candidate == window)
                .map(|(_, series)| series);

            let mut change = match series {
                Some(series) => calculator.compute(series, quote.price, horizon),
                None => ChangeResult::unavailable(horizon),
            };

            // The provider's own day aggregate fills in when the series
            // was too thin to derive a one-day change.
            if horizon == Horizon::OneDay && !change.is_available() {
                if let Some(percent) = quote.day_change_percent {
                    change = ChangeResult::provider_supplied(horizon, percent);
                }
            }

            changes.push(change);
        }

        let chart = self.fetch_chart(instrument).await;

        Ok(ReportRow {
            instrument: instrument.clone(),
            latest_close: Some(quote.price),
            currency: quote.currency,
            changes,
            chart,
        })
    }

    /// Chart embedding is best effort: a failure logs and omits the
    /// image, it never fails the row.
    async fn fetch_chart(&self, instrument: &Instrument) -> Option<String> {
        let chart_source = self.chart_source.as_ref()?;
        let symbol = instrument.chart_symbol.as_ref()?;

        match chart_source.chart_png(symbol).await {
            Ok(png) => Some(inline_image(&png)),
            Err(error) => {
                warn!(symbol = %symbol, error = %error, "chart fetch failed; omitting chart");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_covers_the_short_horizons() {
        let plan = ReportPlan::default();
        assert_eq!(
            plan.horizons,
            vec![Horizon::OneDay, Horizon::OneWeek, Horizon::OneMonth]
        );
        assert_eq!(plan.missing_rows, MissingRowPolicy::Placeholder);
        assert_eq!(plan.source_windows(), vec![HistoryWindow::OneMonth]);
    }

    #[test]
    fn source_windows_deduplicate_in_first_use_order() {
        let plan = ReportPlan::default().with_horizons(vec![
            Horizon::ThreeMonth,
            Horizon::OneDay,
            Horizon::OneMonth,
        ]);
        assert_eq!(
            plan.source_windows(),
            vec![HistoryWindow::ThreeMonths, HistoryWindow::OneMonth]
        );
    }

    #[test]
    fn placeholder_row_mirrors_plan_horizons() {
        let instrument = Instrument::new(
            crate::Symbol::parse("AAPL").expect("symbol"),
            "Apple Inc.",
            crate::InstrumentKind::Equity,
            None,
            None,
        )
        .expect("instrument");

        let row = ReportRow::placeholder(instrument, &[Horizon::OneDay, Horizon::ThreeMonth]);
        assert!(row.is_placeholder());
        assert_eq!(row.changes.len(), 2);
        assert!(row.changes.iter().all(|change| !change.is_available()));
    }
}
