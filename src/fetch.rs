// src/fetch.rs
// Network retrieval with timeout, browser identification and CORS-proxy
// indirection. Retry/fallback policy lives in the orchestrator, not here.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;

/// Per-request budget; reqwest aborts the in-flight request when exceeded.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Scraped sites block obvious bots; identify as a desktop browser.
const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("all {0} proxies failed")]
    ProxiesExhausted(usize),
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(e)
    }
}

/// One CORS indirection proxy. `json_envelope` marks services that wrap the
/// fetched body in `{"contents": "..."}` instead of returning it raw.
#[derive(Debug, Clone, Copy)]
pub struct ProxyRoute {
    pub base: &'static str,
    pub param: &'static str,
    pub json_envelope: bool,
}

pub const CORSPROXY_IO: ProxyRoute = ProxyRoute {
    base: "https://corsproxy.io/",
    param: "url",
    json_envelope: false,
};

pub const CODETABS: ProxyRoute = ProxyRoute {
    base: "https://api.codetabs.com/v1/proxy",
    param: "quest",
    json_envelope: false,
};

pub const ALLORIGINS: ProxyRoute = ProxyRoute {
    base: "https://api.allorigins.win/get",
    param: "url",
    json_envelope: true,
};

/// Default proxy chain, tried in order.
pub const CORS_PROXIES: &[ProxyRoute] = &[CORSPROXY_IO, CODETABS, ALLORIGINS];

#[derive(Deserialize)]
struct ProxyEnvelope {
    #[serde(default)]
    contents: String,
}

fn proxied_url(route: &ProxyRoute, target: &str) -> Option<Url> {
    Url::parse_with_params(route.base, &[(route.param, target)]).ok()
}

#[derive(Clone)]
pub struct Gateway {
    client: Client,
}

impl Gateway {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(BROWSER_UA)
            .timeout(timeout)
            .build()
            .expect("reqwest client");
        Self { client }
    }

    /// GET a body as text. Non-2xx statuses are errors; transport failures
    /// and timeouts are normalized into the `FetchError` taxonomy.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send().await.map_err(classify)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        resp.text().await.map_err(classify)
    }

    /// GET `target` through each proxy in order, returning the first body.
    /// A proxy's own failure only advances the chain; the caller sees one
    /// error after the whole chain is exhausted.
    pub async fn get_text_via(
        &self,
        proxies: &[ProxyRoute],
        target: &str,
    ) -> Result<String, FetchError> {
        for route in proxies {
            let Some(url) = proxied_url(route, target) else {
                tracing::warn!(proxy = route.base, "unbuildable proxy url, skipping");
                continue;
            };
            match self.get_text(url.as_str()).await {
                Ok(body) if route.json_envelope => {
                    match serde_json::from_str::<ProxyEnvelope>(&body) {
                        Ok(env) if !env.contents.is_empty() => return Ok(env.contents),
                        _ => {
                            tracing::debug!(proxy = route.base, "envelope unreadable, trying next")
                        }
                    }
                }
                Ok(body) => return Ok(body),
                Err(e) => {
                    tracing::debug!(proxy = route.base, error = %e, "proxy failed, trying next")
                }
            }
        }
        Err(FetchError::ProxiesExhausted(proxies.len()))
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}
