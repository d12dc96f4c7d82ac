use std::fs;

use fuel_price_aggregator::sources::providers::global_petrol::GlobalPetrolProvider;
use fuel_price_aggregator::sources::types::{PriceProvider, SourceError};

#[tokio::test]
async fn single_gasoline_figure_derives_companion_fuels() {
    let html = fs::read_to_string("tests/fixtures/global_petrol.html")
        .expect("missing tests/fixtures/global_petrol.html");
    let provider = GlobalPetrolProvider::from_fixture(&html);
    let quote = provider.fetch_latest().await.expect("global petrol quote");

    assert_eq!(quote.gasoline, Some(6.45));
    // Site-specific ratios: diesel 95%, LPG 60% of gasoline.
    assert_eq!(quote.diesel, Some(6.13));
    assert_eq!(quote.lpg, Some(3.87));
    assert_eq!(quote.source, "GlobalPetrolPrices.com");
}

#[tokio::test]
async fn fallback_pattern_handles_missing_currency_suffix() {
    let html = r#"<div>The average price: 6.18 per liter</div>"#;
    let provider = GlobalPetrolProvider::from_fixture(html);
    let quote = provider.fetch_latest().await.expect("global petrol quote");
    assert_eq!(quote.gasoline, Some(6.18));
}

#[tokio::test]
async fn out_of_band_figure_is_a_miss() {
    let provider = GlobalPetrolProvider::from_fixture("<td>25.50 PLN</td>");
    let err = provider.fetch_latest().await.expect_err("should miss");
    assert!(matches!(err, SourceError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn markup_without_prices_is_a_miss() {
    let provider = GlobalPetrolProvider::from_fixture("<html><body>blocked</body></html>");
    let err = provider.fetch_latest().await.expect_err("should miss");
    assert!(matches!(err, SourceError::Parse(_)), "got {err:?}");
}
