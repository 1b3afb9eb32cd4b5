//! Canonical build-request payload and its draft mapping.

use serde::{Deserialize, Serialize};

use scenex_model::draft::ScenarioDraft;
use scenex_model::ids::ScenarioId;

/// Bus factor-weight fields, as multiplicative factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BusFactors {
    pub bus_access_egress_factor: f64,
    pub bus_fare_factor: f64,
    pub bus_interchange_factor: f64,
    pub bus_in_vehicle_factor: f64,
    pub bus_wait_time: f64,
}

/// Rail factor-weight fields, as multiplicative factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RailFactors {
    pub rail_access_egress_factor: f64,
    pub rail_fare_factor: f64,
    pub rail_interchange_factor: f64,
    pub rail_in_vehicle_factor: f64,
    pub rail_wait_time: f64,
}

/// Model-selection flags as the backend expects them.
///
/// `demand_supply_gap`, `demand_supply_iterations` and `appraisal` are
/// always transmitted as `false`; the backend accepts them but the
/// client does not yet expose them for configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighwayModelOptions {
    pub highway_model: bool,
    pub demand_model: bool,
    pub air: bool,
    pub noise: bool,
    pub demand_supply_gap: bool,
    pub demand_supply_iterations: bool,
    pub appraisal: bool,
}

/// JSON body POSTed to the build endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildScenarioRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub model_year: u16,
    pub common_analytical_scenario: String,
    pub bus_factors: BusFactors,
    pub rail_factors: RailFactors,
    pub highway_model: HighwayModelOptions,
    pub created_by: String,
    pub tags: Vec<String>,
}

impl BuildScenarioRequest {
    /// Map a draft onto the canonical payload.
    ///
    /// Percentage-style slider values become multiplicative factors by
    /// dividing by 100. Toggle names map 1:1 onto backend field names.
    pub fn from_draft(draft: &ScenarioDraft) -> Self {
        let bus = &draft.bus_weights;
        let rail = &draft.rail_weights;

        BuildScenarioRequest {
            name: draft.name.clone(),
            description: draft.description.clone(),
            model_year: draft.model_year.as_u16(),
            common_analytical_scenario: draft.archetype.label().to_string(),
            bus_factors: BusFactors {
                bus_access_egress_factor: bus.access_egress / 100.0,
                bus_fare_factor: bus.fare / 100.0,
                bus_interchange_factor: bus.interchange / 100.0,
                bus_in_vehicle_factor: bus.in_vehicle_time / 100.0,
                bus_wait_time: bus.wait_time / 100.0,
            },
            rail_factors: RailFactors {
                rail_access_egress_factor: rail.access_egress / 100.0,
                rail_fare_factor: rail.fare / 100.0,
                rail_interchange_factor: rail.interchange / 100.0,
                rail_in_vehicle_factor: rail.in_vehicle_time / 100.0,
                rail_wait_time: rail.wait_time / 100.0,
            },
            highway_model: HighwayModelOptions {
                highway_model: draft.toggles.highway_model,
                demand_model: draft.toggles.demand_model,
                air: draft.toggles.air,
                noise: draft.toggles.noise,
                // Accepted by the backend but not configurable from the
                // draft yet; always sent as false.
                demand_supply_gap: false,
                demand_supply_iterations: false,
                appraisal: false,
            },
            created_by: draft.created_by.clone(),
            tags: draft.tags.clone(),
        }
    }
}

/// Build endpoint response; tolerant of extra fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BuildScenarioResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ScenarioId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
