//! Compiled-in stubs for exercising the engine without a backend.
//!
//! Mirrors the production seams: [`StubScenarioApi`] stands in for the
//! HTTP client behind [`crate::api::ScenarioApi`], and
//! [`StubTransport`] drives the push channel through
//! [`crate::channel::PushTransport`].

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::stream;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use scenex_contracts::build::{
    BuildScenarioRequest, BuildScenarioResponse,
};
use scenex_contracts::listing::{ListScenariosQuery, ScenarioSummary};
use scenex_model::ids::ScenarioId;

use crate::api::ScenarioApi;
use crate::channel::transport::{
    PushTransport, TransportEvent, TransportStream,
};
use crate::error::{ChannelError, SubmitError};

/// Scriptable stand-in for the backend API.
///
/// Build responses are consumed front-to-back; with the queue empty a
/// successful response with a fresh server id is synthesized.
#[derive(Debug, Default)]
pub struct StubScenarioApi {
    build_responses:
        Mutex<VecDeque<Result<BuildScenarioResponse, SubmitError>>>,
    build_calls: Mutex<Vec<BuildScenarioRequest>>,
    listing: Mutex<Vec<ScenarioSummary>>,
    list_calls: AtomicUsize,
}

impl StubScenarioApi {
    pub fn new() -> Self {
        StubScenarioApi::default()
    }

    pub fn queue_build_response(
        &self,
        response: Result<BuildScenarioResponse, SubmitError>,
    ) {
        self.build_responses.lock().push_back(response);
    }

    pub fn set_listing(&self, listing: Vec<ScenarioSummary>) {
        *self.listing.lock() = listing;
    }

    /// Payloads received so far, in call order.
    pub fn build_calls(&self) -> Vec<BuildScenarioRequest> {
        self.build_calls.lock().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ScenarioApi for StubScenarioApi {
    async fn submit_build(
        &self,
        payload: &BuildScenarioRequest,
    ) -> Result<BuildScenarioResponse, SubmitError> {
        self.build_calls.lock().push(payload.clone());
        match self.build_responses.lock().pop_front() {
            Some(response) => response,
            None => Ok(BuildScenarioResponse {
                id: Some(ScenarioId::random()),
                message: None,
            }),
        }
    }

    async fn list_scenarios(
        &self,
        _query: &ListScenariosQuery,
    ) -> Result<Vec<ScenarioSummary>, SubmitError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.listing.lock().clone())
    }
}

/// Scriptable push transport.
///
/// Each `open` first serves the next scripted session, if any; once the
/// scripts are exhausted it hands out a live stream that test code
/// feeds through [`StubTransport::emit`]. A scripted session's stream
/// ends when its events run out, which the channel client treats as a
/// close.
#[derive(Debug)]
pub struct StubTransport {
    opens: AtomicUsize,
    scripts: Mutex<VecDeque<Vec<TransportEvent>>>,
    live: Mutex<Option<mpsc::UnboundedSender<TransportEvent>>>,
    sent: Mutex<Vec<String>>,
}

impl StubTransport {
    /// Transport with no scripted sessions; every open is live.
    pub fn live() -> Arc<Self> {
        Self::scripted(Vec::new())
    }

    /// Transport that serves the given sessions before going live.
    pub fn scripted(sessions: Vec<Vec<TransportEvent>>) -> Arc<Self> {
        Arc::new(StubTransport {
            opens: AtomicUsize::new(0),
            scripts: Mutex::new(sessions.into()),
            live: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
        })
    }

    /// Number of connection attempts so far.
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::Relaxed)
    }

    /// Feed an event into the current live stream; returns whether a
    /// live stream was there to accept it.
    pub fn emit(&self, event: TransportEvent) -> bool {
        match &*self.live.lock() {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        }
    }

    /// Feed one JSON frame into the current live stream.
    pub fn emit_json(&self, value: &serde_json::Value) -> bool {
        self.emit(TransportEvent::Frame(value.to_string()))
    }

    /// Outbound frames the channel client handed to the transport.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl PushTransport for StubTransport {
    async fn open(&self) -> Result<TransportStream, ChannelError> {
        self.opens.fetch_add(1, Ordering::Relaxed);

        if let Some(script) = self.scripts.lock().pop_front() {
            return Ok(Box::pin(stream::iter(script)));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        *self.live.lock() = Some(tx);
        Ok(Box::pin(UnboundedReceiverStream::new(rx)))
    }

    async fn send(&self, frame: String) -> bool {
        self.sent.lock().push(frame);
        true
    }
}
