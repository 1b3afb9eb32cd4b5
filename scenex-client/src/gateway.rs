//! Submission gateway: draft in, provisional registry record out.

use std::fmt;
use std::sync::Arc;

use scenex_contracts::build::BuildScenarioRequest;
use scenex_contracts::listing::ListScenariosQuery;
use scenex_model::draft::ScenarioDraft;
use scenex_model::ids::ScenarioId;
use scenex_model::scenario::ScenarioRecord;

use crate::api::ScenarioApi;
use crate::error::SubmitError;
use crate::registry::{MergeOutcome, ScenarioPatch, ScenarioRegistry};
use crate::session::SessionContext;

/// Converts a validated draft into a canonical request and inserts the
/// resulting provisional record into the registry.
///
/// The gateway does not serialize concurrent `submit` calls; callers
/// must ensure at most one submission is in flight if that matters for
/// their UI.
pub struct SubmissionGateway {
    api: Arc<dyn ScenarioApi>,
    registry: Arc<ScenarioRegistry>,
    session: SessionContext,
}

impl fmt::Debug for SubmissionGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionGateway")
            .field("registry", &self.registry)
            .field("session", &self.session)
            .finish()
    }
}

impl SubmissionGateway {
    pub fn new(
        api: Arc<dyn ScenarioApi>,
        registry: Arc<ScenarioRegistry>,
        session: SessionContext,
    ) -> Self {
        SubmissionGateway {
            api,
            registry,
            session,
        }
    }

    /// Submit a draft for building.
    ///
    /// Revalidates the draft, issues exactly one request, and on success
    /// inserts a Building record exactly once and raises the session
    /// build flag. On any failure the registry is left untouched.
    ///
    /// The authoritative id is the server-assigned one from the build
    /// response; a locally generated id is used only when the response
    /// carries none.
    pub async fn submit(
        &self,
        draft: &ScenarioDraft,
    ) -> Result<ScenarioRecord, SubmitError> {
        if self.session.token().is_none() {
            return Err(SubmitError::Auth);
        }

        let violations = draft.validate();
        if !violations.is_empty() {
            return Err(SubmitError::Validation(violations));
        }

        let payload = BuildScenarioRequest::from_draft(draft);
        let response = self.api.submit_build(&payload).await?;

        let id = response.id.unwrap_or_else(|| {
            log::warn!(
                "build response carried no id; generating a local one"
            );
            ScenarioId::random()
        });

        let mut record = ScenarioRecord::building(
            id,
            draft.name.clone(),
            draft.created_by.clone(),
            draft.model_year,
        );
        record.description = draft.description.clone();

        self.registry.insert(record.clone())?;
        self.session.set_building(true);
        log::info!("scenario {} submitted for building", record.id);

        Ok(record)
    }

    /// Refresh the registry from the listing endpoint.
    ///
    /// New rows are inserted; known rows are merged through the
    /// terminal-state guard, so a stale listing can never regress a
    /// completed or failed record. Returns how many rows changed the
    /// registry.
    pub async fn load_scenarios(
        &self,
        query: &ListScenariosQuery,
    ) -> Result<usize, SubmitError> {
        if self.session.token().is_none() {
            return Err(SubmitError::Auth);
        }

        let summaries = self.api.list_scenarios(query).await?;
        let mut changed = 0;

        for summary in summaries {
            let record = ScenarioRecord::from(summary);
            let id = record.id;
            match self.registry.get_by_id(&id) {
                None => {
                    self.registry.insert(record)?;
                    changed += 1;
                }
                Some(_) => {
                    let patch = ScenarioPatch::from_record(&record);
                    if self.registry.merge(&id, patch)
                        == MergeOutcome::Applied
                    {
                        changed += 1;
                    }
                }
            }
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ScenarioPatch;
    use crate::testing::StubScenarioApi;
    use scenex_contracts::build::BuildScenarioResponse;
    use scenex_contracts::listing::ScenarioSummary;
    use scenex_model::draft::ModelYear;
    use scenex_model::results::ScenarioResults;
    use scenex_model::scenario::ScenarioStatus;
    use serde_json::json;

    fn valid_draft() -> ScenarioDraft {
        ScenarioDraft {
            name: "Core 2030".to_string(),
            created_by: "bob".to_string(),
            ..ScenarioDraft::default()
        }
    }

    fn harness() -> (
        Arc<StubScenarioApi>,
        Arc<ScenarioRegistry>,
        SessionContext,
        SubmissionGateway,
    ) {
        let api = Arc::new(StubScenarioApi::new());
        let registry = Arc::new(ScenarioRegistry::new());
        let session = SessionContext::new();
        session.set_token(Some("token".to_string()));
        let gateway = SubmissionGateway::new(
            Arc::clone(&api) as Arc<dyn ScenarioApi>,
            Arc::clone(&registry),
            session.clone(),
        );
        (api, registry, session, gateway)
    }

    #[tokio::test]
    async fn submit_inserts_building_record_and_raises_flag() {
        let (api, registry, session, gateway) = harness();
        let id = ScenarioId::random();
        api.queue_build_response(Ok(BuildScenarioResponse {
            id: Some(id),
            message: None,
        }));

        let record = gateway.submit(&valid_draft()).await.unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.status, ScenarioStatus::Building);
        assert!(record.results.is_none());

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get_by_id(&id).unwrap().status,
            ScenarioStatus::Building
        );
        assert!(session.is_building());
        assert_eq!(api.build_calls().len(), 1);
    }

    #[tokio::test]
    async fn submit_without_token_fails_before_any_call() {
        let (api, registry, session, gateway) = harness();
        session.set_token(None);

        let result = gateway.submit(&valid_draft()).await;
        assert!(matches!(result, Err(SubmitError::Auth)));
        assert!(api.build_calls().is_empty());
        assert!(registry.is_empty());
        assert!(!session.is_building());
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_network() {
        let (api, registry, session, gateway) = harness();

        let result = gateway.submit(&ScenarioDraft::default()).await;
        match result {
            Err(SubmitError::Validation(violations)) => {
                assert_eq!(violations.len(), 2);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(api.build_calls().is_empty());
        assert!(registry.is_empty());
        assert!(!session.is_building());
    }

    #[tokio::test]
    async fn failed_submit_leaves_registry_untouched() {
        let (api, registry, session, gateway) = harness();
        api.queue_build_response(Err(SubmitError::Http {
            status: 400,
            body: "missing required fields".to_string(),
        }));

        let result = gateway.submit(&valid_draft()).await;
        assert!(matches!(
            result,
            Err(SubmitError::Http { status: 400, .. })
        ));
        assert!(registry.is_empty());
        assert!(!session.is_building());
    }

    #[tokio::test]
    async fn missing_response_id_falls_back_to_local_generation() {
        let (api, registry, _session, gateway) = harness();
        api.queue_build_response(Ok(BuildScenarioResponse::default()));

        let record = gateway.submit(&valid_draft()).await.unwrap();
        assert!(registry.get_by_id(&record.id).is_some());
    }

    #[tokio::test]
    async fn payload_carries_canonical_mapping() {
        let (api, _registry, _session, gateway) = harness();
        let mut draft = valid_draft();
        draft.bus_weights.fare = 50.0;
        gateway.submit(&draft).await.unwrap();

        let calls = api.build_calls();
        assert_eq!(calls[0].bus_factors.bus_fare_factor, 0.5);
        assert!(!calls[0].highway_model.appraisal);
    }

    #[tokio::test]
    async fn load_scenarios_respects_terminal_guard() {
        let (api, registry, _session, gateway) = harness();

        // A record the channel already completed.
        let done = ScenarioRecord::building(
            ScenarioId::random(),
            "done",
            "bob",
            ModelYear::Y2030,
        );
        let done_id = done.id;
        registry.insert(done).unwrap();
        registry.merge(
            &done_id,
            ScenarioPatch::complete(ScenarioResults::new(
                json!({"transport": {}}),
            )),
        );

        // Listing is stale for the completed row and adds a new one.
        let fresh_id = ScenarioId::random();
        api.set_listing(vec![
            ScenarioSummary {
                id: done_id,
                name: "done".to_string(),
                description: None,
                created_by: "bob".to_string(),
                created_at: None,
                model_year: None,
                status: ScenarioStatus::Building,
                results: None,
            },
            ScenarioSummary {
                id: fresh_id,
                name: "fresh".to_string(),
                description: None,
                created_by: "alice".to_string(),
                created_at: None,
                model_year: None,
                status: ScenarioStatus::Building,
                results: None,
            },
        ]);

        let changed = gateway
            .load_scenarios(&ListScenariosQuery::default())
            .await
            .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get_by_id(&done_id).unwrap().status,
            ScenarioStatus::Completed
        );
        assert_eq!(
            registry.get_by_id(&fresh_id).unwrap().status,
            ScenarioStatus::Building
        );
    }
}
