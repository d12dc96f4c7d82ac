// src/sources/providers/global_petrol.rs
// World price listing; the Poland page exposes a single gasoline figure, so
// diesel and LPG are estimated with this site's own observed ratios.

use async_trait::async_trait;
use metrics::histogram;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::fetch::{Gateway, CORS_PROXIES};
use crate::sources::extract::{compile_rules, first_price_match};
use crate::sources::types::{round2, PriceProvider, PriceQuote, SourceError};
use crate::validate;

const SITE_URL: &str = "https://www.globalpetrolprices.com/Poland/gasoline_prices/";

const GASOLINE_PATTERNS: &[&str] = &[
    r"(?i)(\d+\.\d+)\s*PLN",
    r"(?i)price[^<]*?(\d+\.\d+)",
];

static GASOLINE_RULES: Lazy<Vec<Regex>> = Lazy::new(|| compile_rules(GASOLINE_PATTERNS));

/// Diesel typically trades a few percent under gasoline here; LPG around 60%.
/// These ratios are specific to this source, not a universal rule.
const DIESEL_RATIO: f64 = 0.95;
const LPG_RATIO: f64 = 0.60;

pub struct GlobalPetrolProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { gateway: Gateway },
}

impl GlobalPetrolProvider {
    pub fn from_fixture(html: &str) -> Self {
        Self {
            mode: Mode::Fixture(html.to_string()),
        }
    }

    pub fn from_gateway(gateway: Gateway) -> Self {
        Self {
            mode: Mode::Http { gateway },
        }
    }

    fn extract_from_str(html: &str) -> Result<PriceQuote, SourceError> {
        let t0 = std::time::Instant::now();
        let html = html_escape::decode_html_entities(html);

        let gasoline = first_price_match(&GASOLINE_RULES, &html);
        histogram!("acquire_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        let Some(g) = gasoline else {
            return Err(SourceError::Parse(format!(
                "no PLN price found ({} bytes of markup)",
                html.len()
            )));
        };
        if !validate::in_band(g) {
            return Err(SourceError::Validation(format!(
                "scraped gasoline price out of band: {g}"
            )));
        }

        Ok(PriceQuote {
            gasoline: Some(g),
            diesel: Some(round2(g * DIESEL_RATIO)),
            lpg: Some(round2(g * LPG_RATIO)),
            source: "GlobalPetrolPrices.com".to_string(),
            as_of: Some(chrono::Utc::now().date_naive()),
        })
    }
}

#[async_trait]
impl PriceProvider for GlobalPetrolProvider {
    async fn fetch_latest(&self) -> Result<PriceQuote, SourceError> {
        match &self.mode {
            Mode::Fixture(html) => Self::extract_from_str(html),
            Mode::Http { gateway } => {
                let html = gateway.get_text_via(CORS_PROXIES, SITE_URL).await?;
                Self::extract_from_str(&html)
            }
        }
    }

    fn name(&self) -> &'static str {
        "GlobalPetrolPrices"
    }
}
