// src/sources/providers/relay.rs
// Consumes another aggregator's own /fuel-prices schema, so a calculator
// build can lean on an already-deployed backend before scraping on its own.

use async_trait::async_trait;
use metrics::histogram;
use serde::Deserialize;

use crate::fetch::Gateway;
use crate::sources::extract;
use crate::sources::types::{PriceProvider, PriceQuote, SourceError};
use crate::validate;

#[derive(Debug, Deserialize)]
struct RelayResponse {
    success: bool,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    prices: Option<RelayPrices>,
    #[serde(default)]
    update_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RelayPrices {
    gasoline: Option<f64>,
    diesel: Option<f64>,
    lpg: Option<f64>,
}

pub struct RelayProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { gateway: Gateway, url: String },
}

impl RelayProvider {
    pub fn from_fixture(body: &str) -> Self {
        Self {
            mode: Mode::Fixture(body.to_string()),
        }
    }

    pub fn from_url(gateway: Gateway, url: String) -> Self {
        Self {
            mode: Mode::Http { gateway, url },
        }
    }

    fn extract_from_str(body: &str) -> Result<PriceQuote, SourceError> {
        let t0 = std::time::Instant::now();
        let resp: RelayResponse = serde_json::from_str(body)
            .map_err(|e| SourceError::Parse(format!("relay json: {e}")))?;
        histogram!("acquire_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        // A body with success=false is the relay's own default fallback;
        // relaying it would hide which source actually produced the prices.
        if !resp.success {
            return Err(SourceError::Validation("relay reported fallback data".into()));
        }
        let prices = resp
            .prices
            .ok_or_else(|| SourceError::Parse("relay body missing prices object".into()))?;
        let (Some(g), Some(d)) = (prices.gasoline, prices.diesel) else {
            return Err(SourceError::Parse("relay prices missing gasoline/diesel".into()));
        };
        if !validate::in_band(g) || !validate::in_band(d) {
            return Err(SourceError::Validation(format!(
                "relayed prices out of band: {g}/{d}"
            )));
        }

        Ok(PriceQuote {
            gasoline: Some(g),
            diesel: Some(d),
            lpg: prices.lpg.filter(|p| validate::in_band(*p)),
            source: resp.source.unwrap_or_else(|| "backend relay".to_string()),
            as_of: resp.update_date.as_deref().and_then(extract::parse_day),
        })
    }
}

#[async_trait]
impl PriceProvider for RelayProvider {
    async fn fetch_latest(&self) -> Result<PriceQuote, SourceError> {
        match &self.mode {
            Mode::Fixture(body) => Self::extract_from_str(body),
            Mode::Http { gateway, url } => {
                let body = gateway.get_text(url).await?;
                Self::extract_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "backend relay"
    }
}
