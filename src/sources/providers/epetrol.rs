// src/sources/providers/epetrol.rs
// National station-price listing, scraped with regex heuristics. The site
// reshuffles its markup now and then, so each fuel carries an ordered list
// of candidate patterns and the first hit wins.

use async_trait::async_trait;
use metrics::histogram;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::fetch::Gateway;
use crate::sources::extract::{compile_rules, first_price_match};
use crate::sources::types::{PriceProvider, PriceQuote, SourceError};
use crate::validate;

const SITE_URL: &str = "https://www.e-petrol.pl/notowania/rynek-krajowy/ceny-stacje-paliw";

const GASOLINE_PATTERNS: &[&str] = &[
    r"(?i)pb.*?95.*?(\d+[,.]\d+)\s*z[łl]",
    r"(?i)benzyna.*?95.*?(\d+[,.]\d+)\s*z[łl]",
    r"(?i)<td[^>]*>.*?95.*?</td>\s*<td[^>]*>(\d+[,.]\d+)",
];
const DIESEL_PATTERNS: &[&str] = &[
    r"(?i)olej.*?napędow.*?(\d+[,.]\d+)\s*z[łl]",
    r"(?i)diesel.*?(\d+[,.]\d+)\s*z[łl]",
    r"(?i)\bon\b.*?(\d+[,.]\d+)\s*z[łl]",
    r"(?i)<td[^>]*>.*?ON.*?</td>\s*<td[^>]*>(\d+[,.]\d+)",
];
const LPG_PATTERNS: &[&str] = &[
    r"(?i)lpg.*?(\d+[,.]\d+)\s*z[łl]",
    r"(?i)gaz.*?(\d+[,.]\d+)\s*z[łl]",
    r"(?i)<td[^>]*>.*?LPG.*?</td>\s*<td[^>]*>(\d+[,.]\d+)",
];

static GASOLINE_RULES: Lazy<Vec<Regex>> = Lazy::new(|| compile_rules(GASOLINE_PATTERNS));
static DIESEL_RULES: Lazy<Vec<Regex>> = Lazy::new(|| compile_rules(DIESEL_PATTERNS));
static LPG_RULES: Lazy<Vec<Regex>> = Lazy::new(|| compile_rules(LPG_PATTERNS));

pub struct EPetrolProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { gateway: Gateway },
}

impl EPetrolProvider {
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
        // Prices sit next to `zł` with entity-encoded spacing on some layouts.
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

        Ok(PriceQuote {
            gasoline: Some(g),
            diesel: Some(d),
            lpg: lpg.filter(|p| validate::in_band(*p)),
            source: "e-petrol.pl".to_string(),
            as_of: Some(chrono::Utc::now().date_naive()),
        })
    }
}

#[async_trait]
impl PriceProvider for EPetrolProvider {
    async fn fetch_latest(&self) -> Result<PriceQuote, SourceError> {
        match &self.mode {
            Mode::Fixture(html) => Self::extract_from_str(html),
            Mode::Http { gateway } => {
                let html = gateway.get_text(SITE_URL).await?;
                Self::extract_from_str(&html)
            }
        }
    }

    fn name(&self) -> &'static str {
        "e-petrol.pl"
    }
}
