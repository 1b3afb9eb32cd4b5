//! Session-scoped coordination state.
//!
//! Replaces the ambient process-wide globals of earlier designs with an
//! explicit, cloneable context: the bearer credential, the
//! build-in-flight flag and the failure-reporting channel all live
//! here.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{broadcast, watch};

use scenex_model::ids::ScenarioId;

const FAILURE_CHANNEL_CAPACITY: usize = 32;

/// A failed build surfaced by the push channel.
///
/// The message is delivery metadata, not record state; it is never
/// stored on the registry record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioFailure {
    pub id: ScenarioId,
    pub message: Option<String>,
}

struct SessionInner {
    token: RwLock<Option<String>>,
    selected: RwLock<Option<ScenarioId>>,
    building_tx: watch::Sender<bool>,
    building_rx: watch::Receiver<bool>,
    failures: broadcast::Sender<ScenarioFailure>,
}

/// Shared handle to session state; cheap to clone.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("has_token", &self.inner.token.read().is_some())
            .field("is_building", &self.is_building())
            .field("selected", &*self.inner.selected.read())
            .finish()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        let (building_tx, building_rx) = watch::channel(false);
        let (failures, _) = broadcast::channel(FAILURE_CHANNEL_CAPACITY);
        SessionContext {
            inner: Arc::new(SessionInner {
                token: RwLock::new(None),
                selected: RwLock::new(None),
                building_tx,
                building_rx,
                failures,
            }),
        }
    }

    /// Store (or clear) the previously issued bearer token.
    pub fn set_token(&self, token: Option<String>) {
        *self.inner.token.write() = token;
    }

    pub fn token(&self) -> Option<String> {
        self.inner.token.read().clone()
    }

    /// Snapshot of the build-in-flight flag.
    pub fn is_building(&self) -> bool {
        *self.inner.building_rx.borrow()
    }

    /// Observable accessor for the build-in-flight flag.
    pub fn watch_building(&self) -> watch::Receiver<bool> {
        self.inner.building_rx.clone()
    }

    pub(crate) fn set_building(&self, building: bool) {
        self.inner.building_tx.send_replace(building);
    }

    /// Subscribe to build failures surfaced by the push channel.
    pub fn subscribe_failures(&self) -> broadcast::Receiver<ScenarioFailure> {
        self.inner.failures.subscribe()
    }

    pub(crate) fn report_failure(&self, failure: ScenarioFailure) {
        // No receivers is fine; failures are advisory.
        let _ = self.inner.failures.send(failure);
    }

    /// Track which scenario the presentation layer has focused.
    pub fn select_scenario(&self, id: Option<ScenarioId>) {
        *self.inner.selected.write() = id;
    }

    pub fn selected_scenario(&self) -> Option<ScenarioId> {
        *self.inner.selected.read()
    }
}
