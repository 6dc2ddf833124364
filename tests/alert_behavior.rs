//! Alert evaluator behavior: inclusive magnitude threshold, reference
//! selection, error propagation and statelessness.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use marketbrief_core::{
    AlertEvaluator, HistoryWindow, Instrument, InstrumentKind, PricePoint, PriceSeries,
    PriceSource, QuoteSnapshot, SourceError, SourceErrorKind, Symbol, UtcDateTime,
};

struct FixedSource {
    quote: Result<QuoteSnapshot, SourceError>,
    history: Result<Vec<f64>, SourceError>,
}

impl FixedSource {
    fn quote_only(price: f64, previous_close: f64) -> Self {
        let symbol = Symbol::parse("AAPL").expect("symbol");
        Self {
            quote: QuoteSnapshot::new(symbol, price, None, Some(previous_close), None)
                .map_err(|e| SourceError::internal(e.to_string())),
            history: Ok(Vec::new()),
        }
    }

    fn without_previous_close(price: f64, closes: Vec<f64>) -> Self {
        let symbol = Symbol::parse("AAPL").expect("symbol");
        Self {
            quote: QuoteSnapshot::new(symbol, price, None, None, None)
                .map_err(|e| SourceError::internal(e.to_string())),
            history: Ok(closes),
        }
    }

    fn failing() -> Self {
        Self {
            quote: Err(SourceError::unavailable("provider down")),
            history: Err(SourceError::unavailable("provider down")),
        }
    }
}

impl PriceSource for FixedSource {
    fn quote<'a>(
        &'a self,
        _symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteSnapshot, SourceError>> + Send + 'a>> {
        let result = self.quote.clone();
        Box::pin(async move { result })
    }

    fn history<'a>(
        &'a self,
        symbol: &'a Symbol,
        window: HistoryWindow,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        let result = self.history.clone().map(|closes| {
            let points = closes
                .iter()
                .enumerate()
                .map(|(index, &close)| {
                    let day = index + 1;
                    let ts = UtcDateTime::parse(&format!("2024-03-{day:02}T00:00:00Z"))
                        .expect("timestamp");
                    PricePoint::new(ts, close).expect("point")
                })
                .collect();
            PriceSeries::new(symbol.clone(), window, points)
        });
        Box::pin(async move { result })
    }
}

fn instrument() -> Instrument {
    Instrument::new(
        Symbol::parse("AAPL").expect("symbol"),
        "Apple Inc.",
        InstrumentKind::Equity,
        None,
        None,
    )
    .expect("instrument")
}

fn evaluator(source: FixedSource) -> AlertEvaluator {
    AlertEvaluator::new(Arc::new(source))
}

#[tokio::test]
async fn drop_beyond_threshold_fires() {
    // previous close 100, price 97.5: change is -2.5%.
    let evaluator = evaluator(FixedSource::quote_only(97.5, 100.0));

    let event = evaluator
        .evaluate(&instrument(), 2.0)
        .await
        .expect("evaluation should succeed")
        .expect("alert should fire");

    assert!((event.change_percent - (-2.5)).abs() < 1e-9);
    assert_eq!(event.threshold, 2.0);
    assert!(event.text_body().contains("-2.50%"));
}

#[tokio::test]
async fn move_below_threshold_does_not_fire() {
    // +1.9% stays under a 2.0 threshold.
    let evaluator = evaluator(FixedSource::quote_only(101.9, 100.0));

    let event = evaluator
        .evaluate(&instrument(), 2.0)
        .await
        .expect("evaluation should succeed");
    assert!(event.is_none());
}

#[tokio::test]
async fn threshold_boundary_is_inclusive() {
    // Exactly -2.0% against a 2.0 threshold.
    let evaluator = evaluator(FixedSource::quote_only(98.0, 100.0));

    let event = evaluator
        .evaluate(&instrument(), 2.0)
        .await
        .expect("evaluation should succeed");
    assert!(event.is_some());
}

#[tokio::test]
async fn threshold_sign_is_ignored() {
    let evaluator = evaluator(FixedSource::quote_only(97.5, 100.0));

    let event = evaluator
        .evaluate(&instrument(), -2.0)
        .await
        .expect("evaluation should succeed");
    assert!(event.is_some());
}

#[tokio::test]
async fn provider_failure_propagates_as_an_error() {
    let evaluator = evaluator(FixedSource::failing());

    let error = evaluator
        .evaluate(&instrument(), 2.0)
        .await
        .expect_err("failure must not read as no-alert");
    assert_eq!(error.kind(), SourceErrorKind::Unavailable);
}

#[tokio::test]
async fn missing_previous_close_falls_back_to_history() {
    // Second-to-last close 100 against price 103: +3%.
    let evaluator = evaluator(FixedSource::without_previous_close(
        103.0,
        vec![98.0, 100.0, 103.0],
    ));

    let event = evaluator
        .evaluate(&instrument(), 2.0)
        .await
        .expect("evaluation should succeed")
        .expect("alert should fire");
    assert!((event.change_percent - 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn unusable_reference_is_a_missing_data_error() {
    let evaluator = evaluator(FixedSource::without_previous_close(103.0, vec![103.0]));

    let error = evaluator
        .evaluate(&instrument(), 2.0)
        .await
        .expect_err("must fail without a reference");
    assert_eq!(error.kind(), SourceErrorKind::MissingData);
}

#[tokio::test]
async fn evaluator_is_stateless_between_calls() {
    // The same breach re-fires on every invocation.
    let evaluator = evaluator(FixedSource::quote_only(97.5, 100.0));

    for _ in 0..3 {
        let event = evaluator
            .evaluate(&instrument(), 2.0)
            .await
            .expect("evaluation should succeed");
        assert!(event.is_some());
    }
}
