// src/api.rs
// HTTP surface. /fuel-prices always answers 200 with the outcome encoded in
// the body, so the calculator can apply its fallback logic uniformly; the
// suggested cache lifetime matches the 30-minute refresh cadence.

use std::sync::{Arc, RwLock};

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;

use crate::overrides::{PriceOverrides, OVERRIDES_FILE};
use crate::sources::{
    self,
    config::DefaultPrices,
    types::{AcquireOutcome, PriceProvider, PriceTriple, SourceAttempt},
};

/// Suggested client cache lifetime, seconds.
const CACHE_MAX_AGE_SECS: u64 = 1800;

/// Last accepted triple, overwritten atomically at the end of each run.
#[derive(Debug, Clone)]
pub struct StoredPrices {
    pub prices: PriceTriple,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AppState {
    providers: Arc<Vec<Box<dyn PriceProvider>>>,
    defaults: DefaultPrices,
    overrides: Arc<RwLock<PriceOverrides>>,
    current: Arc<RwLock<Option<StoredPrices>>>,
}

impl AppState {
    pub fn new(providers: Vec<Box<dyn PriceProvider>>, defaults: DefaultPrices) -> Self {
        Self {
            providers: Arc::new(providers),
            defaults,
            overrides: Arc::new(RwLock::new(PriceOverrides::load_from_file(OVERRIDES_FILE))),
            current: Arc::new(RwLock::new(None)),
        }
    }

    pub fn providers(&self) -> &[Box<dyn PriceProvider>] {
        &self.providers
    }

    pub fn defaults(&self) -> &DefaultPrices {
        &self.defaults
    }

    pub fn store_current(&self, outcome: &AcquireOutcome) {
        let mut cur = self.current.write().expect("rwlock poisoned");
        *cur = Some(StoredPrices {
            prices: outcome.prices.clone(),
            fetched_at: Utc::now(),
        });
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/fuel-prices", get(fuel_prices))
        .route("/prices/current", get(current_prices))
        .route("/admin/reload-overrides", get(admin_reload_overrides))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct PricesOut {
    gasoline: f64,
    diesel: f64,
    lpg: f64,
}

#[derive(serde::Serialize)]
struct FuelPricesResp {
    success: bool,
    source: String,
    prices: PricesOut,
    #[serde(skip_serializing_if = "Option::is_none")]
    update_date: Option<String>,
    timestamp: String,
    attempts: Vec<SourceAttempt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

async fn fuel_prices(State(state): State<AppState>) -> impl IntoResponse {
    let outcome = sources::acquire_once(&state.providers, &state.defaults).await;
    state.store_current(&outcome);

    // Operator-pinned prices win over anything fetched.
    let prices = {
        let guard = state.overrides.read().expect("rwlock poisoned");
        guard.apply(&outcome.prices)
    };

    let body = FuelPricesResp {
        success: !outcome.from_default,
        source: prices.source.clone(),
        prices: PricesOut {
            gasoline: prices.gasoline,
            diesel: prices.diesel,
            lpg: prices.lpg,
        },
        update_date: prices.as_of.map(|d| d.format("%Y-%m-%d").to_string()),
        timestamp: Utc::now().to_rfc3339(),
        attempts: outcome.attempts,
        message: outcome
            .from_default
            .then(|| "All upstream sources failed; serving default prices.".to_string()),
        note: outcome.from_default.then(|| {
            "Update the configured defaults or set custom prices in the calculator menu."
                .to_string()
        }),
    };

    (
        [(
            header::CACHE_CONTROL,
            format!("public, max-age={CACHE_MAX_AGE_SECS}"),
        )],
        Json(body),
    )
}

#[derive(serde::Serialize)]
struct CurrentOut {
    prices: PricesOut,
    source: String,
    fetched_at: String,
}

async fn current_prices(State(state): State<AppState>) -> Json<Option<CurrentOut>> {
    let cur = state.current.read().expect("rwlock poisoned");
    Json(cur.as_ref().map(|s| CurrentOut {
        prices: PricesOut {
            gasoline: s.prices.gasoline,
            diesel: s.prices.diesel,
            lpg: s.prices.lpg,
        },
        source: s.prices.source.clone(),
        fetched_at: s.fetched_at.to_rfc3339(),
    }))
}

async fn admin_reload_overrides(State(state): State<AppState>) -> String {
    let fresh = PriceOverrides::load_from_file(OVERRIDES_FILE);
    match state.overrides.write() {
        Ok(mut w) => {
            *w = fresh;
            "reloaded".to_string()
        }
        Err(_) => "failed: lock poisoned".to_string(),
    }
}
