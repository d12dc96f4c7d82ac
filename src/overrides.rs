//! # Price Overrides
//!
//! Mapping from fuel type to a locally configured price, persisted as a flat
//! JSON object by the calculator UI (`{"gasoline": 6.50, "lpg": 3.10}`).
//!
//! The one contract consumers of the pipeline must honor: when an override
//! is present for a fuel, it takes precedence over any fetched value. A zero
//! or negative entry means "no override", matching the calculator menu
//! semantics where clearing the field stores 0.

use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};

use crate::sources::types::{FuelType, PriceTriple};

/// Default location the UI layer persists to.
pub const OVERRIDES_FILE: &str = "custom_prices.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PriceOverrides {
    map: HashMap<FuelType, f64>,
}

impl PriceOverrides {
    /// Load from a JSON file. Falls back to no overrides on any error; a
    /// broken local store must never take the calculator down.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn get(&self, fuel: FuelType) -> Option<f64> {
        self.map.get(&fuel).copied().filter(|p| *p > 0.0)
    }

    pub fn is_empty(&self) -> bool {
        !self.map.values().any(|p| *p > 0.0)
    }

    /// Overlay overrides onto a fetched triple; untouched fuels keep their
    /// fetched values, the source label and date stay with the fetch.
    pub fn apply(&self, fetched: &PriceTriple) -> PriceTriple {
        PriceTriple {
            gasoline: self.get(FuelType::Gasoline).unwrap_or(fetched.gasoline),
            diesel: self.get(FuelType::Diesel).unwrap_or(fetched.diesel),
            lpg: self.get(FuelType::Lpg).unwrap_or(fetched.lpg),
            source: fetched.source.clone(),
            as_of: fetched.as_of,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetched() -> PriceTriple {
        PriceTriple {
            gasoline: 6.89,
            diesel: 6.71,
            lpg: 3.15,
            source: "e-petrol.pl".into(),
            as_of: None,
        }
    }

    #[test]
    fn positive_override_wins_over_fetched() {
        let ov: PriceOverrides =
            serde_json::from_str(r#"{"gasoline": 6.10}"#).expect("overrides json");
        let t = ov.apply(&fetched());
        assert_eq!(t.gasoline, 6.10);
        assert_eq!(t.diesel, 6.71);
        assert_eq!(t.lpg, 3.15);
    }

    #[test]
    fn zeroed_entry_means_no_override() {
        let ov: PriceOverrides =
            serde_json::from_str(r#"{"diesel": 0.0, "lpg": -1.0}"#).expect("overrides json");
        assert!(ov.is_empty());
        assert_eq!(ov.apply(&fetched()), fetched());
    }

    #[test]
    fn missing_file_yields_no_overrides() {
        let ov = PriceOverrides::load_from_file("no/such/file.json");
        assert!(ov.is_empty());
    }

    #[test]
    fn source_label_stays_with_the_fetch() {
        let ov: PriceOverrides =
            serde_json::from_str(r#"{"gasoline": 6.10, "diesel": 6.05, "lpg": 2.95}"#)
                .expect("overrides json");
        let t = ov.apply(&fetched());
        assert_eq!(t.source, "e-petrol.pl");
    }
}
