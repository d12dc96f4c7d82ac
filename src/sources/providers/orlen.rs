// src/sources/providers/orlen.rs
// Wholesale feed: a JSON array of product records priced per cubic meter.
// Retail is estimated with a fixed station margin; the feed carries no LPG.

use async_trait::async_trait;
use metrics::histogram;
use serde::Deserialize;

use crate::fetch::Gateway;
use crate::sources::extract;
use crate::sources::types::{round2, PriceProvider, PriceQuote, SourceError};
use crate::validate;

const WHOLESALE_URL: &str = "https://api.orlen.pl/api/fuelprices/wholesale";

/// Wholesale→retail margin when the config carries none. Observed station
/// margins sit between 1.35 and 1.4.
pub const DEFAULT_MARGIN_FACTOR: f64 = 1.35;

const SOURCE_LABEL: &str = "Orlen.pl (wholesale + margin)";

#[derive(Debug, Deserialize)]
struct WholesaleRecord {
    #[serde(rename = "productCode")]
    product_code: String,
    /// PLN per cubic meter.
    price: f64,
    date: Option<String>,
}

pub struct OrlenProvider {
    mode: Mode,
    margin_factor: f64,
}

enum Mode {
    Fixture(String),
    Http { gateway: Gateway },
}

impl OrlenProvider {
    pub fn from_fixture(body: &str, margin_factor: f64) -> Self {
        Self {
            mode: Mode::Fixture(body.to_string()),
            margin_factor,
        }
    }

    pub fn from_gateway(gateway: Gateway, margin_factor: f64) -> Self {
        Self {
            mode: Mode::Http { gateway },
            margin_factor,
        }
    }

    /// `retail = round((wholesale / 1000) * margin, 2)`, per liter.
    fn retail_from_wholesale(&self, per_m3: f64) -> f64 {
        round2(per_m3 / 1000.0 * self.margin_factor)
    }

    fn extract_from_str(&self, body: &str) -> Result<PriceQuote, SourceError> {
        let t0 = std::time::Instant::now();
        let records: Vec<WholesaleRecord> = serde_json::from_str(body)
            .map_err(|e| SourceError::Parse(format!("wholesale json: {e}")))?;

        let mut quote = PriceQuote {
            gasoline: None,
            diesel: None,
            lpg: None,
            source: SOURCE_LABEL.to_string(),
            as_of: None,
        };
        for rec in &records {
            match rec.product_code.as_str() {
                "B95" => {
                    quote.gasoline = Some(self.retail_from_wholesale(rec.price));
                    quote.as_of = rec.date.as_deref().and_then(extract::parse_day);
                }
                "ON" => quote.diesel = Some(self.retail_from_wholesale(rec.price)),
                _ => {}
            }
        }

        histogram!("acquire_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        match (quote.gasoline, quote.diesel) {
            (Some(g), Some(d)) if validate::in_band(g) && validate::in_band(d) => Ok(quote),
            (Some(g), Some(d)) => Err(SourceError::Validation(format!(
                "retail estimates out of band: {g}/{d}"
            ))),
            _ => Err(SourceError::Parse("feed carried no B95/ON records".into())),
        }
    }
}

#[async_trait]
impl PriceProvider for OrlenProvider {
    async fn fetch_latest(&self) -> Result<PriceQuote, SourceError> {
        match &self.mode {
            Mode::Fixture(body) => self.extract_from_str(body),
            Mode::Http { gateway } => {
                let body = gateway.get_text(WHOLESALE_URL).await?;
                self.extract_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "Orlen API"
    }
}
