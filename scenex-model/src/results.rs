//! Results payloads delivered when a scenario build completes.
//!
//! The backend treats results as opaque structured data; the carrier
//! keeps the raw JSON and offers typed views over the sections the
//! charts consume. Unknown or partial shapes are tolerated.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque structured results attached to a completed scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioResults(pub Value);

impl ScenarioResults {
    pub fn new(value: Value) -> Self {
        ScenarioResults(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Typed view over the transport section, if present and well-formed.
    pub fn transport(&self) -> Option<TransportResults> {
        self.section("transport")
    }

    /// Typed view over the air quality section.
    pub fn air(&self) -> Option<AirQualityResults> {
        self.section("air")
    }

    /// Typed view over the noise section.
    pub fn noise(&self) -> Option<NoiseResults> {
        self.section("noise")
    }

    fn section<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Option<T> {
        serde_json::from_value(self.0.get(key)?.clone()).ok()
    }
}

/// Per-mode numeric breakdown (mode share, kilometres travelled).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeVolumes {
    pub car: f64,
    pub bus: f64,
    pub rail: f64,
    pub walk: f64,
    pub cycle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportResults {
    pub mode_share: ModeVolumes,
    pub km_travel: ModeVolumes,
    pub total_trips: f64,
    pub average_distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityResults {
    pub pollutants: Vec<Pollutant>,
    pub overall_rating: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pollutant {
    pub pollutant: String,
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoiseResults {
    pub average_level: f64,
    pub peak_level: f64,
    pub affected_population: f64,
}
