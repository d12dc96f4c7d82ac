// src/lib.rs
// Public library surface for integration tests (and the calculator consumer).

pub mod api;
pub mod fetch;
pub mod metrics;
pub mod overrides;
pub mod sources;
pub mod validate;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::overrides::PriceOverrides;
pub use crate::sources::config::{Profile, SourcesConfig};
pub use crate::sources::types::{
    AcquireOutcome, FuelType, PriceProvider, PriceQuote, PriceTriple, SourceAttempt,
};

use crate::fetch::{Gateway, DEFAULT_TIMEOUT};

/// Calculator-facing entry point: one acquisition cycle over the calculator
/// profile. Never fails: exhaustion resolves to the configured defaults, so
/// the caller always gets a usable triple. The caller owns the result and is
/// expected to honor its local override store via [`PriceOverrides::apply`].
pub async fn fetch_prices() -> PriceTriple {
    let cfg = sources::config::load_default().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "source config unreadable, using built-in seed");
        SourcesConfig::default()
    });
    let gateway = Gateway::new(DEFAULT_TIMEOUT);
    let providers = cfg.build_providers(Profile::Calculator, &gateway);
    sources::acquire_once(&providers, &cfg.defaults).await.prices
}
