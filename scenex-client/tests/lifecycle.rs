//! End-to-end lifecycle: submit over the stub API, complete over the
//! stub push transport, observe the registry converge.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use scenex_client::api::ScenarioApi;
use scenex_client::channel::{PushTransport, TransportEvent};
use scenex_client::testing::{StubScenarioApi, StubTransport};
use scenex_client::{
    ChannelClient, ChannelState, ScenarioRegistry, SessionContext,
    SubmissionGateway,
};
use scenex_contracts::build::BuildScenarioResponse;
use scenex_model::draft::ScenarioDraft;
use scenex_model::ids::ScenarioId;
use scenex_model::results::ScenarioResults;
use scenex_model::scenario::ScenarioStatus;

async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn submit_then_complete_over_the_push_channel() {
    let api = Arc::new(StubScenarioApi::new());
    let transport = StubTransport::live();
    let registry = Arc::new(ScenarioRegistry::new());
    let session = SessionContext::new();
    session.set_token(Some("token".to_string()));

    let gateway = SubmissionGateway::new(
        Arc::clone(&api) as Arc<dyn ScenarioApi>,
        Arc::clone(&registry),
        session.clone(),
    );
    let channel = ChannelClient::new(
        Arc::clone(&registry),
        session.clone(),
        Arc::clone(&transport) as Arc<dyn PushTransport>,
    );

    let id = ScenarioId::random();
    api.queue_build_response(Ok(BuildScenarioResponse {
        id: Some(id),
        message: None,
    }));

    let draft = ScenarioDraft {
        name: "Core 2030".to_string(),
        created_by: "bob".to_string(),
        ..ScenarioDraft::default()
    };
    let record = gateway.submit(&draft).await.unwrap();
    assert_eq!(record.id, id);
    assert_eq!(record.status, ScenarioStatus::Building);
    assert!(session.is_building());

    channel.connect();
    while !transport.emit(TransportEvent::Open) {
        settle().await;
    }
    while channel.state() != ChannelState::Connected {
        settle().await;
    }

    transport.emit_json(&json!({
        "type": "scenario_complete",
        "scenarioId": id.as_uuid(),
        "data": { "transport": { "totalTrips": 12.5 } }
    }));
    while session.is_building() {
        settle().await;
    }

    let record = registry.get_by_id(&id).unwrap();
    assert_eq!(record.status, ScenarioStatus::Completed);
    assert_eq!(
        record.results,
        Some(ScenarioResults::new(
            json!({ "transport": { "totalTrips": 12.5 } })
        ))
    );

    // A late duplicate of the same completion is a no-op.
    transport.emit_json(&json!({
        "type": "scenario_complete",
        "scenarioId": id.as_uuid(),
        "data": { "transport": { "totalTrips": 12.5 } }
    }));
    settle().await;
    assert_eq!(registry.terminal_rejections(), 0);
    assert_eq!(
        registry.get_by_id(&id).unwrap().status,
        ScenarioStatus::Completed
    );

    channel.disconnect();
    channel.disconnect();
    assert_eq!(channel.state(), ChannelState::Disconnected);
}
