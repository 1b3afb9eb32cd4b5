//! User-edited, not-yet-submitted scenario configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Modelled horizon years supported by the backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(into = "u16", try_from = "u16")]
pub enum ModelYear {
    Y2025,
    Y2030,
    Y2035,
    Y2040,
    Y2045,
    Y2050,
}

impl ModelYear {
    pub const ALL: [ModelYear; 6] = [
        ModelYear::Y2025,
        ModelYear::Y2030,
        ModelYear::Y2035,
        ModelYear::Y2040,
        ModelYear::Y2045,
        ModelYear::Y2050,
    ];

    pub const fn as_u16(self) -> u16 {
        match self {
            ModelYear::Y2025 => 2025,
            ModelYear::Y2030 => 2030,
            ModelYear::Y2035 => 2035,
            ModelYear::Y2040 => 2040,
            ModelYear::Y2045 => 2045,
            ModelYear::Y2050 => 2050,
        }
    }
}

impl From<ModelYear> for u16 {
    fn from(year: ModelYear) -> Self {
        year.as_u16()
    }
}

impl TryFrom<u16> for ModelYear {
    type Error = crate::error::ModelError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2025 => Ok(ModelYear::Y2025),
            2030 => Ok(ModelYear::Y2030),
            2035 => Ok(ModelYear::Y2035),
            2040 => Ok(ModelYear::Y2040),
            2045 => Ok(ModelYear::Y2045),
            2050 => Ok(ModelYear::Y2050),
            other => Err(crate::error::ModelError::InvalidModelYear(other)),
        }
    }
}

impl fmt::Display for ModelYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Named common analytical scenario archetypes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub enum AnalyticalScenario {
    Core,
    HighEconomy,
    LowEconomy,
    Regional,
    BehaviouralChange,
    Technology,
    VehicleLedDecarbonisation,
    ModeBalanced,
}

impl AnalyticalScenario {
    pub const ALL: [AnalyticalScenario; 8] = [
        AnalyticalScenario::Core,
        AnalyticalScenario::HighEconomy,
        AnalyticalScenario::LowEconomy,
        AnalyticalScenario::Regional,
        AnalyticalScenario::BehaviouralChange,
        AnalyticalScenario::Technology,
        AnalyticalScenario::VehicleLedDecarbonisation,
        AnalyticalScenario::ModeBalanced,
    ];

    /// Backend label for this archetype.
    pub const fn label(self) -> &'static str {
        match self {
            AnalyticalScenario::Core => "Core",
            AnalyticalScenario::HighEconomy => "High Economy",
            AnalyticalScenario::LowEconomy => "Low Economy",
            AnalyticalScenario::Regional => "Regional",
            AnalyticalScenario::BehaviouralChange => "Behavioural Change",
            AnalyticalScenario::Technology => "Technology",
            AnalyticalScenario::VehicleLedDecarbonisation => {
                "Vehicle-led Decarbonisation"
            }
            AnalyticalScenario::ModeBalanced => "Mode-balanced",
        }
    }
}

impl From<AnalyticalScenario> for String {
    fn from(scenario: AnalyticalScenario) -> Self {
        scenario.label().to_string()
    }
}

impl TryFrom<String> for AnalyticalScenario {
    type Error = crate::error::ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AnalyticalScenario::ALL
            .into_iter()
            .find(|s| s.label() == value)
            .ok_or(crate::error::ModelError::InvalidArchetype(value))
    }
}

impl fmt::Display for AnalyticalScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The five named factor-weight sliders shared by bus and rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorSlider {
    AccessEgress,
    Fare,
    Interchange,
    InVehicleTime,
    WaitTime,
}

impl FactorSlider {
    pub const ALL: [FactorSlider; 5] = [
        FactorSlider::AccessEgress,
        FactorSlider::Fare,
        FactorSlider::Interchange,
        FactorSlider::InVehicleTime,
        FactorSlider::WaitTime,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            FactorSlider::AccessEgress => "Access/Egress",
            FactorSlider::Fare => "Fare",
            FactorSlider::Interchange => "Interchange",
            FactorSlider::InVehicleTime => "In-Vehicle Time",
            FactorSlider::WaitTime => "Wait Time",
        }
    }
}

/// Percentage-style factor weights for one transit mode.
///
/// Values are free-form percentages; no normalization is enforced here.
/// Conversion to multiplicative factors happens at the wire boundary.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize,
)]
pub struct FactorWeights {
    pub access_egress: f64,
    pub fare: f64,
    pub interchange: f64,
    pub in_vehicle_time: f64,
    pub wait_time: f64,
}

impl FactorWeights {
    pub fn get(&self, slider: FactorSlider) -> f64 {
        match slider {
            FactorSlider::AccessEgress => self.access_egress,
            FactorSlider::Fare => self.fare,
            FactorSlider::Interchange => self.interchange,
            FactorSlider::InVehicleTime => self.in_vehicle_time,
            FactorSlider::WaitTime => self.wait_time,
        }
    }

    pub fn set(&mut self, slider: FactorSlider, value: f64) {
        match slider {
            FactorSlider::AccessEgress => self.access_egress = value,
            FactorSlider::Fare => self.fare = value,
            FactorSlider::Interchange => self.interchange = value,
            FactorSlider::InVehicleTime => self.in_vehicle_time = value,
            FactorSlider::WaitTime => self.wait_time = value,
        }
    }
}

/// Which of the two parallel factor-weight mappings to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitMode {
    Bus,
    Rail,
}

/// Fixed-key set of boolean model options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelToggle {
    DemandModel,
    HighwayModel,
    Air,
    Noise,
    Appraisal,
    DemandSupplyGap,
    DemandSupplyGapIterations,
}

impl ModelToggle {
    pub const ALL: [ModelToggle; 7] = [
        ModelToggle::DemandModel,
        ModelToggle::HighwayModel,
        ModelToggle::Air,
        ModelToggle::Noise,
        ModelToggle::Appraisal,
        ModelToggle::DemandSupplyGap,
        ModelToggle::DemandSupplyGapIterations,
    ];
}

/// Selected model options for a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelToggles {
    pub demand_model: bool,
    pub highway_model: bool,
    pub air: bool,
    pub noise: bool,
    pub appraisal: bool,
    pub demand_supply_gap: bool,
    pub demand_supply_gap_iterations: bool,
}

impl Default for ModelToggles {
    fn default() -> Self {
        ModelToggles {
            demand_model: true,
            highway_model: false,
            air: false,
            noise: false,
            appraisal: false,
            demand_supply_gap: false,
            demand_supply_gap_iterations: false,
        }
    }
}

impl ModelToggles {
    pub fn get(&self, toggle: ModelToggle) -> bool {
        match toggle {
            ModelToggle::DemandModel => self.demand_model,
            ModelToggle::HighwayModel => self.highway_model,
            ModelToggle::Air => self.air,
            ModelToggle::Noise => self.noise,
            ModelToggle::Appraisal => self.appraisal,
            ModelToggle::DemandSupplyGap => self.demand_supply_gap,
            ModelToggle::DemandSupplyGapIterations => {
                self.demand_supply_gap_iterations
            }
        }
    }

    pub fn set(&mut self, toggle: ModelToggle, on: bool) {
        match toggle {
            ModelToggle::DemandModel => self.demand_model = on,
            ModelToggle::HighwayModel => self.highway_model = on,
            ModelToggle::Air => self.air = on,
            ModelToggle::Noise => self.noise = on,
            ModelToggle::Appraisal => self.appraisal = on,
            ModelToggle::DemandSupplyGap => self.demand_supply_gap = on,
            ModelToggle::DemandSupplyGapIterations => {
                self.demand_supply_gap_iterations = on
            }
        }
    }
}

/// A local validation failure for a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    MissingName,
    MissingCreator,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingName => {
                f.write_str("Scenario name is required")
            }
            Violation::MissingCreator => {
                f.write_str("Created by field is required")
            }
        }
    }
}

/// Mutable working configuration for a scenario build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDraft {
    pub name: String,
    pub description: Option<String>,
    pub model_year: ModelYear,
    pub archetype: AnalyticalScenario,
    pub bus_weights: FactorWeights,
    pub rail_weights: FactorWeights,
    pub toggles: ModelToggles,
    pub created_by: String,
    /// Free-form unique tags, insertion-ordered.
    pub tags: Vec<String>,
}

impl Default for ScenarioDraft {
    fn default() -> Self {
        ScenarioDraft {
            name: String::new(),
            description: None,
            model_year: ModelYear::Y2030,
            archetype: AnalyticalScenario::Core,
            bus_weights: FactorWeights::default(),
            rail_weights: FactorWeights::default(),
            toggles: ModelToggles::default(),
            created_by: String::new(),
            tags: Vec::new(),
        }
    }
}

impl ScenarioDraft {
    pub fn weights(&self, mode: TransitMode) -> &FactorWeights {
        match mode {
            TransitMode::Bus => &self.bus_weights,
            TransitMode::Rail => &self.rail_weights,
        }
    }

    pub fn weights_mut(&mut self, mode: TransitMode) -> &mut FactorWeights {
        match mode {
            TransitMode::Bus => &mut self.bus_weights,
            TransitMode::Rail => &mut self.rail_weights,
        }
    }

    /// Check the draft against the required-field rules.
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if self.name.trim().is_empty() {
            violations.push(Violation::MissingName);
        }
        if self.created_by.trim().is_empty() {
            violations.push(Violation::MissingCreator);
        }
        violations
    }
}
