// src/sources/mod.rs
pub mod config;
pub mod extract;
pub mod providers;
pub mod scheduler;
pub mod types;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

use crate::sources::config::DefaultPrices;
use crate::sources::types::{AcquireOutcome, PriceProvider, SourceAttempt};
use crate::validate;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("acquire_attempts_total", "Source attempts across all runs.");
        describe_counter!(
            "acquire_source_errors_total",
            "Source fetch/parse misses."
        );
        describe_counter!(
            "acquire_rejected_total",
            "Quotes rejected by cross-field validation."
        );
        describe_counter!(
            "acquire_default_total",
            "Runs that exhausted every source and fell back to defaults."
        );
        describe_counter!("acquire_runs_total", "Scheduled acquisition runs.");
        describe_histogram!("acquire_parse_ms", "Source payload parse time in milliseconds.");
        describe_gauge!(
            "acquire_last_accept_ts",
            "Unix ts of the last accepted quote."
        );
    });
}

/// One full acquisition cycle: try sources strictly in their priority order,
/// stop at the first quote that passes validation, and never contact later
/// sources after a win. Exhaustion resolves to the configured default triple
/// tagged "default", so this function cannot fail.
pub async fn acquire_once(
    providers: &[Box<dyn PriceProvider>],
    defaults: &DefaultPrices,
) -> AcquireOutcome {
    ensure_metrics_described();

    let mut attempts: Vec<SourceAttempt> = Vec::with_capacity(providers.len());
    for provider in providers {
        counter!("acquire_attempts_total").increment(1);
        match provider.fetch_latest().await {
            Ok(quote) => {
                if let Some(prices) = validate::accept(&quote, defaults.lpg) {
                    attempts.push(SourceAttempt {
                        source: provider.name().to_string(),
                        succeeded: true,
                    });
                    gauge!("acquire_last_accept_ts")
                        .set(chrono::Utc::now().timestamp().max(0) as f64);
                    tracing::info!(
                        source = provider.name(),
                        gasoline = prices.gasoline,
                        diesel = prices.diesel,
                        lpg = prices.lpg,
                        "accepted quote"
                    );
                    return AcquireOutcome {
                        prices,
                        attempts,
                        from_default: false,
                    };
                }
                counter!("acquire_rejected_total").increment(1);
                tracing::warn!(source = provider.name(), ?quote, "quote failed validation");
                attempts.push(SourceAttempt {
                    source: provider.name().to_string(),
                    succeeded: false,
                });
            }
            Err(e) => {
                counter!("acquire_source_errors_total").increment(1);
                tracing::warn!(source = provider.name(), error = %e, "source miss");
                attempts.push(SourceAttempt {
                    source: provider.name().to_string(),
                    succeeded: false,
                });
            }
        }
    }

    counter!("acquire_default_total").increment(1);
    tracing::warn!(
        attempted = attempts.len(),
        "all sources exhausted, using default prices"
    );
    AcquireOutcome {
        prices: defaults.to_triple(),
        attempts,
        from_default: true,
    }
}
