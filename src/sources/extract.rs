// src/sources/extract.rs
// Shared scrape helpers. The ordered pattern lists live in the providers;
// this module only owns matching and numeric token normalization, so new
// patterns can be added without touching control flow.

use chrono::NaiveDate;
use regex::Regex;

/// Compile an ordered pattern list. A malformed pattern is a programmer
/// error in a provider's static rule table, so this panics at first use.
pub fn compile_rules(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("invalid price pattern"))
        .collect()
}

/// Normalize a locale decimal token ("6,89" or "6.89") and parse it.
pub fn parse_price_token(token: &str) -> Option<f64> {
    token.trim().replace(',', ".").parse::<f64>().ok()
}

/// Run rules in order against the markup; the first pattern whose capture
/// parses as a number wins. Plausibility is the caller's concern.
pub fn first_price_match(rules: &[Regex], haystack: &str) -> Option<f64> {
    rules
        .iter()
        .find_map(|re| re.captures(haystack))
        .and_then(|cap| cap.get(1))
        .and_then(|m| parse_price_token(m.as_str()))
}

/// Parse the leading `YYYY-MM-DD` of a record date, tolerating trailing
/// time components.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
