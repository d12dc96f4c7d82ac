// src/sources/providers/autocentrum.rs
// Station-price comparison site, reached through a CORS proxy. One pattern
// per fuel; the diesel pattern must not swallow "ON+" premium products.

use async_trait::async_trait;
use metrics::histogram;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::fetch::{Gateway, ALLORIGINS};
use crate::sources::extract::{compile_rules, first_price_match};
use crate::sources::types::{PriceProvider, PriceQuote, SourceError};
use crate::validate;

const SITE_URL: &str = "https://www.autocentrum.pl/paliwa/ceny-paliw/";

const GASOLINE_PATTERNS: &[&str] = &[r"(?i)95[^0-9]*?(\d+[,.]\d+)\s*z[łl]"];
// `[^+]` keeps the match from starting at an "ON+" product name.
const DIESEL_PATTERNS: &[&str] = &[r"(?i)\bON\b[^+]*?(\d+[,.]\d+)\s*z[łl]"];
const LPG_PATTERNS: &[&str] = &[r"(?i)LPG[^0-9]*?(\d+[,.]\d+)\s*z[łl]"];

static GASOLINE_RULES: Lazy<Vec<Regex>> = Lazy::new(|| compile_rules(GASOLINE_PATTERNS));
static DIESEL_RULES: Lazy<Vec<Regex>> = Lazy::new(|| compile_rules(DIESEL_PATTERNS));
static LPG_RULES: Lazy<Vec<Regex>> = Lazy::new(|| compile_rules(LPG_PATTERNS));

pub struct AutoCentrumProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { gateway: Gateway },
}

impl AutoCentrumProvider {
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
        let diesel = first_price_match(&DIESEL_RULES, &html);
        let lpg = first_price_match(&LPG_RULES, &html);

        histogram!("acquire_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        let (Some(g), Some(d)) = (gasoline, diesel) else {
            return Err(SourceError::Parse(format!(
                "no gasoline/diesel pattern matched ({} bytes of markup)",
                html.len()
            )));
        };
        if !validate::in_band(g) || !validate::in_band(d) {
            return Err(SourceError::Validation(format!(
                "scraped prices out of band: {g}/{d}"
            )));
        }
        // A table shift feeds the same cell into both fuels.
        if g == d {
            return Err(SourceError::Validation(format!(
                "gasoline equals diesel ({g}), scrape artifact"
            )));
        }

        Ok(PriceQuote {
            gasoline: Some(g),
            diesel: Some(d),
            lpg: lpg.filter(|p| validate::in_band(*p)),
            source: "AutoCentrum.pl".to_string(),
            as_of: Some(chrono::Utc::now().date_naive()),
        })
    }
}

#[async_trait]
impl PriceProvider for AutoCentrumProvider {
    async fn fetch_latest(&self) -> Result<PriceQuote, SourceError> {
        match &self.mode {
            Mode::Fixture(html) => Self::extract_from_str(html),
            Mode::Http { gateway } => {
                // Direct cross-origin fetches are blocked for this site, so
                // the body travels through the allorigins envelope.
                let html = gateway.get_text_via(&[ALLORIGINS], SITE_URL).await?;
                Self::extract_from_str(&html)
            }
        }
    }

    fn name(&self) -> &'static str {
        "AutoCentrum.pl"
    }
}
