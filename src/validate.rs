// src/validate.rs
// Plausibility and cross-field sanity for candidate quotes. Scrapes fail in
// characteristic ways: a stray number from an ad, a table shift feeding the
// same cell into two fuels. Everything suspicious is rejected here and the
// orchestrator falls through to the next source.

use crate::sources::types::{PriceQuote, PriceTriple};

/// Plausible retail band, currency units per liter, exclusive on both ends.
pub const PRICE_BAND_MIN: f64 = 2.0;
pub const PRICE_BAND_MAX: f64 = 15.0;

pub fn in_band(price: f64) -> bool {
    price > PRICE_BAND_MIN && price < PRICE_BAND_MAX
}

/// Checked finalization: a quote that passes validation becomes a full
/// triple, with LPG falling back to `lpg_default` when the source carries
/// none (or an implausible figure).
pub fn accept(quote: &PriceQuote, lpg_default: f64) -> Option<PriceTriple> {
    let (Some(gasoline), Some(diesel)) = (quote.gasoline, quote.diesel) else {
        return None;
    };
    if !in_band(gasoline) || !in_band(diesel) {
        return None;
    }
    // Two distinct fuels landing on exactly the same number is a parsing
    // artifact, not a market coincidence.
    if gasoline == diesel {
        return None;
    }
    let lpg = quote.lpg.filter(|p| in_band(*p)).unwrap_or(lpg_default);
    Some(PriceTriple {
        gasoline,
        diesel,
        lpg,
        source: quote.source.clone(),
        as_of: quote.as_of,
    })
}

/// `true` when the quote would be accepted by the orchestrator.
pub fn validate(quote: &PriceQuote) -> bool {
    // The LPG fallback value has no bearing on acceptance.
    accept(quote, PRICE_BAND_MIN + 1.0).is_some()
}
