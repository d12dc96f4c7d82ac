// src/sources/config.rs
// One source table consumed by both fallback chains. The calculator and the
// backend historically kept separate hardcoded orderings that drifted apart;
// here each is a profile over the same configured list.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::fetch::Gateway;
use crate::sources::providers::{
    autocentrum::AutoCentrumProvider, epetrol::EPetrolProvider,
    global_petrol::GlobalPetrolProvider, orlen::OrlenProvider, relay::RelayProvider,
};
use crate::sources::types::{PriceProvider, PriceTriple};

const ENV_PATH: &str = "FUEL_SOURCES_PATH";

/// Which fallback chain to build. Order within each is fixed and preserved
/// exactly; behavior stays deterministic across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Calculator,
    Backend,
}

/// Hardcoded fallback prices, served only after every source misses.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DefaultPrices {
    pub gasoline: f64,
    pub diesel: f64,
    pub lpg: f64,
}

impl Default for DefaultPrices {
    fn default() -> Self {
        Self {
            gasoline: 6.89,
            diesel: 6.71,
            lpg: 3.15,
        }
    }
}

impl DefaultPrices {
    pub fn to_triple(&self) -> PriceTriple {
        PriceTriple {
            gasoline: self.gasoline,
            diesel: self.diesel,
            lpg: self.lpg,
            source: "default".to_string(),
            as_of: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profiles {
    #[serde(default = "default_calculator_order")]
    pub calculator: Vec<String>,
    #[serde(default = "default_backend_order")]
    pub backend: Vec<String>,
}

fn default_calculator_order() -> Vec<String> {
    ["autocentrum", "orlen", "global-petrol", "relay"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_backend_order() -> Vec<String> {
    ["e-petrol", "orlen", "global-petrol"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for Profiles {
    fn default() -> Self {
        Self {
            calculator: default_calculator_order(),
            backend: default_backend_order(),
        }
    }
}

fn default_margin_factor() -> f64 {
    crate::sources::providers::orlen::DEFAULT_MARGIN_FACTOR
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub defaults: DefaultPrices,
    /// Wholesale→retail margin for the Orlen feed.
    #[serde(default = "default_margin_factor")]
    pub margin_factor: f64,
    #[serde(default)]
    pub profiles: Profiles,
    /// Absolute URL of a deployed aggregator, for the relay source.
    #[serde(default)]
    pub relay_url: Option<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            defaults: DefaultPrices::default(),
            margin_factor: default_margin_factor(),
            profiles: Profiles::default(),
            relay_url: None,
        }
    }
}

impl SourcesConfig {
    /// Instantiate the providers of one profile, preserving list order.
    /// Unknown names and a relay without a URL are skipped with a warning
    /// rather than failing the whole chain.
    pub fn build_providers(
        &self,
        profile: Profile,
        gateway: &Gateway,
    ) -> Vec<Box<dyn PriceProvider>> {
        let order = match profile {
            Profile::Calculator => &self.profiles.calculator,
            Profile::Backend => &self.profiles.backend,
        };
        let mut out: Vec<Box<dyn PriceProvider>> = Vec::with_capacity(order.len());
        for name in order {
            match name.as_str() {
                "e-petrol" => out.push(Box::new(EPetrolProvider::from_gateway(gateway.clone()))),
                "orlen" => out.push(Box::new(OrlenProvider::from_gateway(
                    gateway.clone(),
                    self.margin_factor,
                ))),
                "global-petrol" => {
                    out.push(Box::new(GlobalPetrolProvider::from_gateway(gateway.clone())))
                }
                "autocentrum" => {
                    out.push(Box::new(AutoCentrumProvider::from_gateway(gateway.clone())))
                }
                "relay" => match &self.relay_url {
                    Some(url) => out.push(Box::new(RelayProvider::from_url(
                        gateway.clone(),
                        url.clone(),
                    ))),
                    None => tracing::warn!("relay source listed without relay_url, skipping"),
                },
                other => {
                    tracing::warn!(source = other, "unknown source in priority list, skipping")
                }
            }
        }
        out
    }
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_from(path: &Path) -> Result<SourcesConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading source config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
}

/// Load config using env var + fallbacks:
/// 1) $FUEL_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
pub fn load_default() -> Result<SourcesConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        } else {
            return Err(anyhow!("FUEL_SOURCES_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_from(&json_p);
    }
    Ok(SourcesConfig::default())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<SourcesConfig> {
    // Try TOML first if hinted or content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains("[profiles]");
    if try_toml {
        if let Ok(v) = toml::from_str::<SourcesConfig>(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = serde_json::from_str::<SourcesConfig>(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = toml::from_str::<SourcesConfig>(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported source config format"))
}
