// tests/acquire_fallback.rs
//
// Orchestrator behavior: strict priority order, first validated success
// wins, exhaustion falls back to defaults. Providers are fixture-backed so
// nothing here touches the network.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use fuel_price_aggregator::sources::{self, config::DefaultPrices};
use fuel_price_aggregator::sources::providers::orlen::OrlenProvider;
use fuel_price_aggregator::sources::types::{PriceProvider, PriceQuote, SourceError};

/// Always misses, counting how often the orchestrator knocked.
struct CountingMiss {
    name: &'static str,
    calls: Arc<AtomicUsize>,
}

impl CountingMiss {
    fn boxed(name: &'static str) -> (Box<dyn PriceProvider>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Box::new(Self {
                name,
                calls: calls.clone(),
            }),
            calls,
        )
    }
}

#[async_trait]
impl PriceProvider for CountingMiss {
    async fn fetch_latest(&self) -> Result<PriceQuote, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SourceError::Parse("fixture miss".into()))
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Returns a degenerate quote (gasoline == diesel) that must be rejected.
struct DegenerateQuote;

#[async_trait]
impl PriceProvider for DegenerateQuote {
    async fn fetch_latest(&self) -> Result<PriceQuote, SourceError> {
        Ok(PriceQuote {
            gasoline: Some(6.50),
            diesel: Some(6.50),
            lpg: None,
            source: "degenerate".into(),
            as_of: None,
        })
    }

    fn name(&self) -> &'static str {
        "degenerate"
    }
}

fn orlen_fixture() -> Box<dyn PriceProvider> {
    let body = fs::read_to_string("tests/fixtures/orlen_wholesale.json")
        .expect("missing tests/fixtures/orlen_wholesale.json");
    Box::new(OrlenProvider::from_fixture(&body, 1.4))
}

#[tokio::test]
async fn exhaustion_returns_default_triple_with_full_attempt_trail() {
    let (p1, _) = CountingMiss::boxed("source-1");
    let (p2, _) = CountingMiss::boxed("source-2");
    let (p3, _) = CountingMiss::boxed("source-3");
    let providers = vec![p1, p2, p3];

    let outcome = sources::acquire_once(&providers, &DefaultPrices::default()).await;

    assert!(outcome.from_default);
    assert_eq!(outcome.prices.source, "default");
    assert_eq!(outcome.prices.gasoline, 6.89);
    assert_eq!(outcome.prices.diesel, 6.71);
    assert_eq!(outcome.prices.lpg, 3.15);
    assert_eq!(outcome.attempts.len(), 3);
    assert!(outcome.attempts.iter().all(|a| !a.succeeded));
}

#[tokio::test]
async fn first_validated_success_wins_and_later_sources_stay_cold() {
    let (p1, calls1) = CountingMiss::boxed("source-1");
    let (p3, calls3) = CountingMiss::boxed("source-3");
    let providers = vec![p1, orlen_fixture(), p3];

    let outcome = sources::acquire_once(&providers, &DefaultPrices::default()).await;

    assert!(!outcome.from_default);
    assert_eq!(outcome.prices.source, "Orlen.pl (wholesale + margin)");
    assert_eq!(outcome.prices.gasoline, 7.00);
    // The wholesale feed has no LPG; acceptance fills the configured default.
    assert_eq!(outcome.prices.lpg, 3.15);

    assert_eq!(calls1.load(Ordering::SeqCst), 1);
    assert_eq!(calls3.load(Ordering::SeqCst), 0, "source-3 must never be invoked");

    let trail: Vec<(&str, bool)> = outcome
        .attempts
        .iter()
        .map(|a| (a.source.as_str(), a.succeeded))
        .collect();
    assert_eq!(trail, vec![("source-1", false), ("Orlen API", true)]);
}

#[tokio::test]
async fn rejected_quote_advances_to_the_next_source() {
    let providers: Vec<Box<dyn PriceProvider>> =
        vec![Box::new(DegenerateQuote), orlen_fixture()];

    let outcome = sources::acquire_once(&providers, &DefaultPrices::default()).await;

    assert!(!outcome.from_default);
    assert_eq!(outcome.prices.source, "Orlen.pl (wholesale + margin)");
    let trail: Vec<bool> = outcome.attempts.iter().map(|a| a.succeeded).collect();
    assert_eq!(trail, vec![false, true]);
}

#[tokio::test]
async fn identical_fixture_content_yields_identical_triples() {
    let first = sources::acquire_once(&vec![orlen_fixture()], &DefaultPrices::default()).await;
    let second = sources::acquire_once(&vec![orlen_fixture()], &DefaultPrices::default()).await;
    assert_eq!(first, second);
}
