use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a scenario record, unique within a registry.
///
/// The authoritative id is the one assigned by the backend on submission;
/// a locally generated id is only used when the build response carries
/// none.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ScenarioId(Uuid);

impl ScenarioId {
    pub const fn from_uuid(uuid: Uuid) -> Self {
        ScenarioId(uuid)
    }

    /// Generate a fresh local id.
    pub fn random() -> Self {
        ScenarioId(Uuid::new_v4())
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for ScenarioId {
    fn from(uuid: Uuid) -> Self {
        ScenarioId(uuid)
    }
}

impl FromStr for ScenarioId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(ScenarioId)
    }
}
