//! Core data model definitions shared across Scenex crates.
#![allow(missing_docs)]

pub mod draft;
pub mod error;
pub mod events;
pub mod ids;
pub mod prelude;
pub mod results;
pub mod scenario;

// Intentionally curated re-exports for downstream consumers.
pub use draft::{
    AnalyticalScenario, FactorSlider, FactorWeights, ModelToggle,
    ModelToggles, ModelYear, ScenarioDraft, TransitMode, Violation,
};
pub use error::{ModelError, Result as ModelResult};
pub use events::ScenarioEvent;
pub use ids::ScenarioId;
pub use results::{
    AirQualityResults, ModeVolumes, NoiseResults, ScenarioResults,
    TransportResults,
};
pub use scenario::{ScenarioRecord, ScenarioStatus};
