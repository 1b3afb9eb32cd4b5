//! Wire contracts between Scenex clients and the modelling backend.

pub mod build;
pub mod listing;
pub mod routes;

/// Frequently used contract types for client crates.
pub mod prelude {
    pub use super::build::{
        BuildScenarioRequest, BuildScenarioResponse, BusFactors,
        HighwayModelOptions, RailFactors,
    };
    pub use super::listing::{ListScenariosQuery, ScenarioSummary};
    pub use super::routes::v1;
}
