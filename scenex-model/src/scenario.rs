//! Registry-resident representation of a submitted scenario.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::draft::ModelYear;
use crate::error::ModelError;
use crate::ids::ScenarioId;
use crate::results::ScenarioResults;

/// Lifecycle status of a submitted scenario.
///
/// `Building` is the only non-terminal state; `Completed` and `Failed`
/// are terminal and accept no further transitions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Building,
    Completed,
    Failed,
}

impl ScenarioStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, ScenarioStatus::Completed | ScenarioStatus::Failed)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ScenarioStatus::Building => "building",
            ScenarioStatus::Completed => "completed",
            ScenarioStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "building" => Ok(ScenarioStatus::Building),
            "completed" => Ok(ScenarioStatus::Completed),
            "failed" => Ok(ScenarioStatus::Failed),
            other => Err(ModelError::InvalidStatus(other.to_string())),
        }
    }
}

/// A submitted scenario and its lifecycle state.
///
/// Invariant: `results` is present if and only if `status` is
/// [`ScenarioStatus::Completed`]. The registry enforces this on merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRecord {
    pub id: ScenarioId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub model_year: ModelYear,
    pub status: ScenarioStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ScenarioResults>,
}

impl ScenarioRecord {
    /// A fresh record for a scenario whose build was just accepted.
    pub fn building(
        id: ScenarioId,
        name: impl Into<String>,
        created_by: impl Into<String>,
        model_year: ModelYear,
    ) -> Self {
        ScenarioRecord {
            id,
            name: name.into(),
            description: None,
            created_by: created_by.into(),
            created_at: Utc::now(),
            model_year,
            status: ScenarioStatus::Building,
            results: None,
        }
    }
}
