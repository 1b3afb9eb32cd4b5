//! Push channel client.
//!
//! Maintains a reconnecting persistent connection to the scenario event
//! endpoint, demultiplexes inbound events and applies them to the
//! registry. Channel faults are contained here: they are logged and
//! retried, never surfaced to callers as hard failures.

pub mod sse;
pub mod transport;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use scenex_model::events::ScenarioEvent;
use scenex_model::scenario::ScenarioStatus;

use crate::registry::{MergeOutcome, ScenarioPatch, ScenarioRegistry};
use crate::session::{ScenarioFailure, SessionContext};

pub use transport::{PushTransport, TransportEvent, TransportStream};

/// Fixed delay between a close and the next connection attempt.
///
/// Deliberately not exponential: every close schedules exactly one
/// retry after this delay, indefinitely, until an explicit disconnect.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Connection state of the push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Initial state; also terminal after `disconnect` until the next
    /// `connect`.
    Disconnected,
    Connecting,
    Connected,
    /// Closed; one retry timer is pending.
    Reconnecting,
}

struct ChannelInner {
    registry: Arc<ScenarioRegistry>,
    session: SessionContext,
    transport: Arc<dyn PushTransport>,
    state: Mutex<ChannelState>,
    retry_delay: Duration,
}

/// Reconnecting client for the scenario event channel.
pub struct ChannelClient {
    inner: Arc<ChannelInner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for ChannelClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelClient")
            .field("state", &self.state())
            .field("retry_delay", &self.inner.retry_delay)
            .finish()
    }
}

impl ChannelClient {
    pub fn new(
        registry: Arc<ScenarioRegistry>,
        session: SessionContext,
        transport: Arc<dyn PushTransport>,
    ) -> Self {
        Self::with_retry_delay(
            registry,
            session,
            transport,
            DEFAULT_RETRY_DELAY,
        )
    }

    pub fn with_retry_delay(
        registry: Arc<ScenarioRegistry>,
        session: SessionContext,
        transport: Arc<dyn PushTransport>,
        retry_delay: Duration,
    ) -> Self {
        ChannelClient {
            inner: Arc::new(ChannelInner {
                registry,
                session,
                transport,
                state: Mutex::new(ChannelState::Disconnected),
                retry_delay,
            }),
            task: Mutex::new(None),
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ChannelState {
        *self.inner.state.lock()
    }

    /// Start (or restart) the connection loop.
    ///
    /// A no-op while a live connection is already up. Otherwise any
    /// previous loop, including a pending retry timer, is cancelled
    /// first; at most one retry timer is ever pending per client.
    pub fn connect(&self) {
        let mut task = self.task.lock();
        if task.is_some() && self.state() == ChannelState::Connected {
            log::debug!("push channel already connected");
            return;
        }
        if let Some(handle) = task.take() {
            handle.abort();
        }
        let inner = Arc::clone(&self.inner);
        *task = Some(tokio::spawn(run(inner)));
    }

    /// Stop the connection loop and cancel any pending retry.
    ///
    /// Idempotent and callable from any state.
    pub fn disconnect(&self) {
        let mut task = self.task.lock();
        if let Some(handle) = task.take() {
            handle.abort();
        }
        *self.inner.state.lock() = ChannelState::Disconnected;
    }

    /// Send an outbound frame.
    ///
    /// Permitted only while Connected; otherwise the frame is dropped
    /// silently since delivery on this channel is not confirmed anyway.
    pub async fn send(&self, frame: impl Into<String>) {
        if self.state() != ChannelState::Connected {
            log::warn!("push channel is not connected; dropping frame");
            return;
        }
        if !self.inner.transport.send(frame.into()).await {
            log::debug!("transport declined outbound frame");
        }
    }
}

impl Drop for ChannelClient {
    fn drop(&mut self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }
}

/// Connection loop: one transport attempt per iteration, one fixed-delay
/// retry per close.
async fn run(inner: Arc<ChannelInner>) {
    loop {
        inner.set_state(ChannelState::Connecting);
        match inner.transport.open().await {
            Ok(mut events) => {
                while let Some(event) = events.next().await {
                    match event {
                        TransportEvent::Open => {
                            log::info!("push channel connected");
                            inner.set_state(ChannelState::Connected);
                        }
                        TransportEvent::Frame(text) => {
                            inner.handle_frame(&text);
                        }
                        TransportEvent::Closed(reason) => {
                            log::warn!(
                                "push channel closed: {}",
                                reason
                            );
                            break;
                        }
                    }
                }
            }
            Err(err) => {
                log::warn!("{err}");
            }
        }

        inner.set_state(ChannelState::Reconnecting);
        tokio::time::sleep(inner.retry_delay).await;
    }
}

impl ChannelInner {
    fn set_state(&self, state: ChannelState) {
        *self.state.lock() = state;
    }

    /// Parse and apply one inbound frame.
    ///
    /// Only evaluated while Connected. A frame that fails to parse is
    /// logged and discarded; this is non-fatal and does not close the
    /// connection.
    fn handle_frame(&self, text: &str) {
        if *self.state.lock() != ChannelState::Connected {
            log::debug!("dropping frame received outside Connected");
            return;
        }
        if text.is_empty() || text == "keepalive" {
            log::debug!("received push channel keepalive");
            return;
        }

        match serde_json::from_str::<ScenarioEvent>(text) {
            Ok(event) => self.apply(event),
            Err(err) => {
                log::error!(
                    "Failed to parse push channel frame: {} - Data: {}",
                    err,
                    text
                );
            }
        }
    }

    fn apply(&self, event: ScenarioEvent) {
        match event {
            ScenarioEvent::ScenarioUpdate { scenario_id } => {
                let outcome = self.registry.merge(
                    &scenario_id,
                    ScenarioPatch::status(ScenarioStatus::Building),
                );
                match outcome {
                    MergeOutcome::UnknownId => log::debug!(
                        "update for unknown scenario {scenario_id}"
                    ),
                    MergeOutcome::TerminalRejected => log::debug!(
                        "stale update for terminal scenario {scenario_id}"
                    ),
                    _ => {}
                }
            }
            ScenarioEvent::ScenarioComplete { scenario_id, data } => {
                self.registry
                    .merge(&scenario_id, ScenarioPatch::complete(data));
                self.session.set_building(false);
                log::info!("scenario {scenario_id} completed");
            }
            ScenarioEvent::ScenarioError { scenario_id, error } => {
                self.registry.merge(
                    &scenario_id,
                    ScenarioPatch::status(ScenarioStatus::Failed),
                );
                self.session.set_building(false);
                log::error!(
                    "Scenario building failed: {}",
                    error.as_deref().unwrap_or("unknown error")
                );
                self.session.report_failure(ScenarioFailure {
                    id: scenario_id,
                    message: error,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubTransport;
    use scenex_model::draft::ModelYear;
    use scenex_model::ids::ScenarioId;
    use scenex_model::results::ScenarioResults;
    use scenex_model::scenario::ScenarioRecord;
    use serde_json::json;

    fn harness(
        transport: Arc<StubTransport>,
    ) -> (Arc<ScenarioRegistry>, SessionContext, ChannelClient) {
        let registry = Arc::new(ScenarioRegistry::new());
        let session = SessionContext::new();
        let client = ChannelClient::new(
            Arc::clone(&registry),
            session.clone(),
            transport as Arc<dyn PushTransport>,
        );
        (registry, session, client)
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    async fn wait_connected(
        transport: &StubTransport,
        client: &ChannelClient,
    ) {
        while !transport.emit(TransportEvent::Open) {
            settle().await;
        }
        while client.state() != ChannelState::Connected {
            settle().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn closes_schedule_exactly_one_fixed_delay_retry_each() {
        // Three sessions that close immediately, then a live one that
        // stays pending.
        let transport =
            StubTransport::scripted(vec![vec![], vec![], vec![]]);
        let (_registry, _session, client) =
            harness(Arc::clone(&transport));

        let started = tokio::time::Instant::now();
        client.connect();
        while transport.opens() < 4 {
            settle().await;
        }
        // Each of the three closes waited out the full fixed delay.
        assert!(started.elapsed() >= 3 * DEFAULT_RETRY_DELAY);

        // No additional timer is pending once a connection is live.
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(transport.opens(), 4);

        client.disconnect();
        assert_eq!(client.state(), ChannelState::Disconnected);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_frames_leave_state_and_registry_unchanged() {
        let transport = StubTransport::live();
        let (registry, _session, client) =
            harness(Arc::clone(&transport));
        client.connect();
        wait_connected(&transport, &client).await;

        assert!(transport
            .emit(TransportEvent::Frame("not json".to_string())));
        settle().await;

        assert_eq!(client.state(), ChannelState::Connected);
        assert!(registry.is_empty());
        assert_eq!(transport.opens(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn complete_event_merges_results_and_clears_flag() {
        let transport = StubTransport::live();
        let (registry, session, client) =
            harness(Arc::clone(&transport));

        let record = ScenarioRecord::building(
            ScenarioId::random(),
            "A",
            "bob",
            ModelYear::Y2030,
        );
        let id = record.id;
        registry.insert(record).unwrap();
        session.set_building(true);

        client.connect();
        wait_connected(&transport, &client).await;

        transport.emit_json(&json!({
            "type": "scenario_complete",
            "scenarioId": id.as_uuid(),
            "data": { "transport": { "totalTrips": 9.0 } }
        }));
        while session.is_building() {
            settle().await;
        }

        let record = registry.get_by_id(&id).unwrap();
        assert_eq!(record.status, ScenarioStatus::Completed);
        assert_eq!(
            record.results,
            Some(ScenarioResults::new(
                json!({ "transport": { "totalTrips": 9.0 } })
            ))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn error_event_fails_record_and_reports_message() {
        let transport = StubTransport::live();
        let (registry, session, client) =
            harness(Arc::clone(&transport));
        let mut failures = session.subscribe_failures();

        let record = ScenarioRecord::building(
            ScenarioId::random(),
            "A",
            "bob",
            ModelYear::Y2030,
        );
        let id = record.id;
        registry.insert(record).unwrap();
        session.set_building(true);

        client.connect();
        wait_connected(&transport, &client).await;

        transport.emit_json(&json!({
            "type": "scenario_error",
            "scenarioId": id.as_uuid(),
            "error": "solver diverged"
        }));

        let failure = failures.recv().await.unwrap();
        assert_eq!(failure.id, id);
        assert_eq!(failure.message.as_deref(), Some("solver diverged"));

        let record = registry.get_by_id(&id).unwrap();
        assert_eq!(record.status, ScenarioStatus::Failed);
        // The message is surfaced, never stored on the record.
        assert!(record.results.is_none());
        assert!(!session.is_building());
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_scenario_events_are_dropped() {
        let transport = StubTransport::live();
        let (registry, _session, client) =
            harness(Arc::clone(&transport));
        client.connect();
        wait_connected(&transport, &client).await;

        transport.emit_json(&json!({
            "type": "scenario_update",
            "scenarioId": ScenarioId::random().as_uuid(),
        }));
        settle().await;

        assert!(registry.is_empty());
        assert_eq!(registry.unknown_events(), 1);
        assert_eq!(client.state(), ChannelState::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn disconnect_is_idempotent() {
        let transport = StubTransport::live();
        let (_registry, _session, client) =
            harness(Arc::clone(&transport));
        client.connect();
        wait_connected(&transport, &client).await;

        client.disconnect();
        assert_eq!(client.state(), ChannelState::Disconnected);
        client.disconnect();
        assert_eq!(client.state(), ChannelState::Disconnected);

        // Disconnected is terminal until connect is called again.
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(transport.opens(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn send_is_dropped_unless_connected() {
        let transport = StubTransport::live();
        let (_registry, _session, client) =
            harness(Arc::clone(&transport));

        client.send("ping").await;
        assert!(transport.sent().is_empty());

        client.connect();
        wait_connected(&transport, &client).await;
        client.send("ping").await;
        assert_eq!(transport.sent(), vec!["ping".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn connect_while_connected_keeps_the_live_session() {
        let transport = StubTransport::live();
        let (registry, _session, client) =
            harness(Arc::clone(&transport));
        client.connect();
        wait_connected(&transport, &client).await;

        client.connect();
        settle().await;
        assert_eq!(transport.opens(), 1);
        assert_eq!(client.state(), ChannelState::Connected);

        // The original stream is still being consumed.
        let record = ScenarioRecord::building(
            ScenarioId::random(),
            "A",
            "bob",
            ModelYear::Y2030,
        );
        let id = record.id;
        registry.insert(record).unwrap();
        transport.emit_json(&json!({
            "type": "scenario_complete",
            "scenarioId": id.as_uuid(),
            "data": { "transport": {} }
        }));
        settle().await;
        assert_eq!(
            registry.get_by_id(&id).unwrap().status,
            ScenarioStatus::Completed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn reconnect_cancels_pending_retry_before_attempting() {
        // One immediately-closing session puts the loop into its retry
        // wait; a fresh connect must not stack a second timer.
        let transport = StubTransport::scripted(vec![vec![]]);
        let (_registry, _session, client) =
            harness(Arc::clone(&transport));

        client.connect();
        while transport.opens() < 1 {
            settle().await;
        }
        // The loop is now waiting out the retry delay.
        client.connect();
        while transport.opens() < 2 {
            settle().await;
        }

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(transport.opens(), 2);
    }
}
