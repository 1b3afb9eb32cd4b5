//! Lifecycle events delivered over the push channel.

use serde::{Deserialize, Serialize};

use crate::ids::ScenarioId;
use crate::results::ScenarioResults;

/// Inbound push-channel event for a scenario build.
///
/// Wire shape (one JSON object per frame):
/// `{"type": "scenario_update" | "scenario_complete" | "scenario_error",
///   "scenarioId": ..., "data"?: ..., "error"?: ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioEvent {
    ScenarioUpdate {
        #[serde(rename = "scenarioId")]
        scenario_id: ScenarioId,
    },
    ScenarioComplete {
        #[serde(rename = "scenarioId")]
        scenario_id: ScenarioId,
        data: ScenarioResults,
    },
    ScenarioError {
        #[serde(rename = "scenarioId")]
        scenario_id: ScenarioId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl ScenarioEvent {
    pub fn scenario_id(&self) -> ScenarioId {
        match self {
            ScenarioEvent::ScenarioUpdate { scenario_id }
            | ScenarioEvent::ScenarioComplete { scenario_id, .. }
            | ScenarioEvent::ScenarioError { scenario_id, .. } => {
                *scenario_id
            }
        }
    }
}
