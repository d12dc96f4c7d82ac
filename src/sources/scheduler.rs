// src/sources/scheduler.rs
use std::time::Duration;

use metrics::counter;
use tokio::task::JoinHandle;

use crate::api::AppState;

#[derive(Clone, Copy, Debug)]
pub struct RefreshSchedulerCfg {
    pub interval_secs: u64,
}

impl Default for RefreshSchedulerCfg {
    fn default() -> Self {
        // Matches the calculator's 30-minute refresh timer.
        Self { interval_secs: 1800 }
    }
}

/// Periodic refresh of the shared price cache. Each run is awaited to
/// completion inside the loop, so acquisition cycles never overlap.
pub fn spawn_refresh_scheduler(cfg: RefreshSchedulerCfg, state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(cfg.interval_secs));
        loop {
            ticker.tick().await;

            let outcome =
                crate::sources::acquire_once(state.providers(), state.defaults()).await;
            state.store_current(&outcome);

            counter!("acquire_runs_total").increment(1);
            tracing::info!(
                target: "acquire",
                source = %outcome.prices.source,
                from_default = outcome.from_default,
                attempts = outcome.attempts.len(),
                "refresh tick"
            );
        }
    })
}
