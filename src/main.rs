//! Fuel Price Aggregator — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and the
//! background refresh scheduler.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fuel_price_aggregator::api::{self, AppState};
use fuel_price_aggregator::fetch::{Gateway, DEFAULT_TIMEOUT};
use fuel_price_aggregator::metrics::Metrics;
use fuel_price_aggregator::sources::config::{self, Profile, SourcesConfig};
use fuel_price_aggregator::sources::scheduler::{spawn_refresh_scheduler, RefreshSchedulerCfg};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - FUEL_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("FUEL_DEV_LOG").ok().is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("acquire=info,fuel_price_aggregator=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments. This enables
    // FUEL_SOURCES_PATH / FUEL_DEV_LOG from .env.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let cfg = config::load_default().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "source config unreadable, using built-in seed");
        SourcesConfig::default()
    });

    let gateway = Gateway::new(DEFAULT_TIMEOUT);
    let providers = cfg.build_providers(Profile::Backend, &gateway);
    let state = AppState::new(providers, cfg.defaults);

    let sched = RefreshSchedulerCfg::default();
    let metrics = Metrics::init(sched.interval_secs);
    spawn_refresh_scheduler(sched, state.clone());

    let router = api::router(state).merge(metrics.router());
    Ok(router.into())
}
