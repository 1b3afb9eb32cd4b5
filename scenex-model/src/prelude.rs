//! Frequently used types for client and orchestration crates.

pub use crate::draft::{
    AnalyticalScenario, FactorSlider, FactorWeights, ModelToggle,
    ModelToggles, ModelYear, ScenarioDraft, TransitMode, Violation,
};
pub use crate::error::{ModelError, Result as ModelResult};
pub use crate::events::ScenarioEvent;
pub use crate::ids::ScenarioId;
pub use crate::results::ScenarioResults;
pub use crate::scenario::{ScenarioRecord, ScenarioStatus};
