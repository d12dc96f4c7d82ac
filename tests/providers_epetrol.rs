use std::fs;

use fuel_price_aggregator::sources::providers::epetrol::EPetrolProvider;
use fuel_price_aggregator::sources::types::{PriceProvider, SourceError};

#[tokio::test]
async fn fixture_markup_parses_comma_decimals() {
    let html = fs::read_to_string("tests/fixtures/epetrol.html")
        .expect("missing tests/fixtures/epetrol.html");
    let provider = EPetrolProvider::from_fixture(&html);
    let quote = provider.fetch_latest().await.expect("e-petrol quote");

    assert_eq!(quote.gasoline, Some(6.89));
    assert_eq!(quote.diesel, Some(6.71));
    assert_eq!(quote.lpg, Some(3.02));
    assert_eq!(quote.source, "e-petrol.pl");
    assert!(quote.as_of.is_some());
}

#[tokio::test]
async fn dot_decimals_normalize_the_same_as_commas() {
    let html = r#"<table>
<tr><td>Pb 95</td><td>6.89 zł/l</td></tr>
<tr><td>Olej napędowy</td><td>6.71 zł/l</td></tr>
</table>"#;
    let provider = EPetrolProvider::from_fixture(html);
    let quote = provider.fetch_latest().await.expect("e-petrol quote");
    assert_eq!(quote.gasoline, Some(6.89));
    assert_eq!(quote.diesel, Some(6.71));
    assert_eq!(quote.lpg, None);
}

#[tokio::test]
async fn later_patterns_cover_alternate_layouts() {
    // No "Pb 95" label; the bare table-cell pattern has to find gasoline,
    // and diesel comes from the "diesel" wording.
    let html = r#"<table>
<tr><td>Eurosuper 95</td><td>6,95</td></tr>
<tr><td>Diesel 6,77 zł</td></tr>
</table>"#;
    let provider = EPetrolProvider::from_fixture(html);
    let quote = provider.fetch_latest().await.expect("e-petrol quote");
    assert_eq!(quote.gasoline, Some(6.95));
    assert_eq!(quote.diesel, Some(6.77));
}

#[tokio::test]
async fn markup_without_prices_is_a_miss() {
    let provider = EPetrolProvider::from_fixture("<html><body>maintenance</body></html>");
    let err = provider.fetch_latest().await.expect_err("should miss");
    assert!(matches!(err, SourceError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn out_of_band_prices_are_a_miss() {
    let html = r#"<tr><td>Pb 95</td><td>68,90 zł</td></tr>
<tr><td>Olej napędowy</td><td>67,10 zł</td></tr>"#;
    let provider = EPetrolProvider::from_fixture(html);
    let err = provider.fetch_latest().await.expect_err("should miss");
    assert!(matches!(err, SourceError::Validation(_)), "got {err:?}");
}
