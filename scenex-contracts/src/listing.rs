//! Listing endpoint DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scenex_model::draft::ModelYear;
use scenex_model::ids::ScenarioId;
use scenex_model::results::ScenarioResults;
use scenex_model::scenario::{ScenarioRecord, ScenarioStatus};

/// Optional filters for the listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListScenariosQuery {
    pub status: Option<ScenarioStatus>,
    pub created_by: Option<String>,
}

impl ListScenariosQuery {
    /// Query-string pairs in the order the backend documents them.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(created_by) = &self.created_by {
            pairs.push(("createdBy", created_by.clone()));
        }
        pairs
    }
}

/// Record-shaped object returned by the listing endpoint.
///
/// Kept tolerant: older backend rows omit timestamps and model years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub id: ScenarioId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_year: Option<ModelYear>,
    pub status: ScenarioStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ScenarioResults>,
}

impl From<ScenarioSummary> for ScenarioRecord {
    fn from(summary: ScenarioSummary) -> Self {
        ScenarioRecord {
            id: summary.id,
            name: summary.name,
            description: summary.description,
            created_by: summary.created_by,
            created_at: summary.created_at.unwrap_or_else(Utc::now),
            model_year: summary.model_year.unwrap_or(ModelYear::Y2030),
            status: summary.status,
            results: summary.results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_pairs_skip_absent_filters() {
        let query = ListScenariosQuery::default();
        assert!(query.to_pairs().is_empty());

        let query = ListScenariosQuery {
            status: Some(ScenarioStatus::Completed),
            created_by: Some("bob".to_string()),
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("status", "completed".to_string()),
                ("createdBy", "bob".to_string()),
            ]
        );
    }

    #[test]
    fn sparse_rows_deserialize() {
        let summary: ScenarioSummary = serde_json::from_value(json!({
            "id": "4b1a8e9e-8f0b-4a86-9e71-0a88a8c4d0f7",
            "name": "Legacy row",
            "status": "completed",
            "results": {"transport": {}}
        }))
        .unwrap();

        let record = ScenarioRecord::from(summary);
        assert_eq!(record.status, ScenarioStatus::Completed);
        assert_eq!(record.model_year, ModelYear::Y2030);
        assert!(record.results.is_some());
    }
}
