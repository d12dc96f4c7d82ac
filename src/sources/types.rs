// src/sources/types.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fetch::FetchError;

/// The three tracked fuels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Gasoline,
    Diesel,
    Lpg,
}

/// Candidate prices from a single source, possibly partial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub gasoline: Option<f64>,
    pub diesel: Option<f64>,
    pub lpg: Option<f64>,
    pub source: String,
    pub as_of: Option<NaiveDate>,
}

/// A validated triple: every price present and in band, gasoline and diesel
/// known to differ. This is what the consumer owns after a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTriple {
    pub gasoline: f64,
    pub diesel: f64,
    pub lpg: f64,
    pub source: String,
    pub as_of: Option<NaiveDate>,
}

impl PriceTriple {
    pub fn price(&self, fuel: FuelType) -> f64 {
        match fuel {
            FuelType::Gasoline => self.gasoline,
            FuelType::Diesel => self.diesel,
            FuelType::Lpg => self.lpg,
        }
    }
}

/// One entry of the per-run diagnostics trail, ordered by attempt sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAttempt {
    pub source: String,
    #[serde(rename = "success")]
    pub succeeded: bool,
}

/// Result of one full acquisition cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquireOutcome {
    pub prices: PriceTriple,
    pub attempts: Vec<SourceAttempt>,
    /// True when every source missed and `prices` is the configured fallback.
    pub from_default: bool,
}

/// A miss: no usable price from this source. Misses never escape the
/// pipeline as panics or raw errors; the orchestrator logs them and moves on.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("no usable price in payload: {0}")]
    Parse(String),
    #[error("implausible prices: {0}")]
    Validation(String),
}

/// One upstream price source: retrieval plus extraction, normalized to
/// quote-or-miss.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<PriceQuote, SourceError>;
    fn name(&self) -> &'static str;
}

/// Round to cents, the way retail prices are displayed.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_half_cents_round_up() {
        assert_eq!(round2(7.004999), 7.0);
        assert_eq!(round2(6.125), 6.13);
        assert_eq!(round2(5000.0 / 1000.0 * 1.4), 7.0);
    }

    #[test]
    fn attempt_serializes_with_success_key() {
        let a = SourceAttempt {
            source: "Orlen API".into(),
            succeeded: false,
        };
        let json = serde_json::to_value(&a).expect("serialize attempt");
        assert_eq!(json["source"], "Orlen API");
        assert_eq!(json["success"], false);
    }
}
