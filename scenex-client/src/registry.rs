//! ScenarioRegistry - single source of truth for scenario records.
//!
//! Every mutation funnels through [`ScenarioRegistry::insert`] and
//! [`ScenarioRegistry::merge`]; the submission gateway and the push
//! channel client are independent producers and never touch records
//! directly. Reads return insertion-ordered snapshots, never live
//! views.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

use scenex_model::ids::ScenarioId;
use scenex_model::results::ScenarioResults;
use scenex_model::scenario::{ScenarioRecord, ScenarioStatus};

use crate::error::RegistryError;

/// Partial update applied through [`ScenarioRegistry::merge`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioPatch {
    pub name: Option<String>,
    pub status: Option<ScenarioStatus>,
    pub results: Option<ScenarioResults>,
}

impl ScenarioPatch {
    /// Patch that only moves the lifecycle status.
    pub fn status(status: ScenarioStatus) -> Self {
        ScenarioPatch {
            status: Some(status),
            ..ScenarioPatch::default()
        }
    }

    /// Terminal completion patch; pairs status and results so the
    /// results-iff-completed invariant holds by construction.
    pub fn complete(results: ScenarioResults) -> Self {
        ScenarioPatch {
            status: Some(ScenarioStatus::Completed),
            results: Some(results),
            ..ScenarioPatch::default()
        }
    }

    /// Patch carrying everything a listing row may refresh.
    pub fn from_record(record: &ScenarioRecord) -> Self {
        ScenarioPatch {
            name: Some(record.name.clone()),
            status: Some(record.status),
            results: record.results.clone(),
        }
    }
}

/// Result of a merge attempt, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Patch was applied to the record.
    Applied,
    /// Idempotent re-delivery of an identical terminal patch.
    Unchanged,
    /// No record with that id; dropped silently.
    UnknownId,
    /// Patch would regress a terminal record; dropped silently.
    TerminalRejected,
}

/// What changed, delivered to subscribers after each mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryChange {
    pub id: ScenarioId,
    pub kind: ChangeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Inserted,
    Updated,
    Removed,
}

/// Handle returned by [`ScenarioRegistry::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn(&RegistryChange) + Send + Sync>;

#[derive(Debug, Default)]
struct RegistryInner {
    /// Records in insertion order.
    records: Vec<ScenarioRecord>,
    /// ID index for O(1) lookups into `records`.
    index: HashMap<ScenarioId, usize>,
}

/// Authoritative in-memory table of scenario records.
pub struct ScenarioRegistry {
    inner: RwLock<RegistryInner>,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
    terminal_rejections: AtomicU64,
    unknown_events: AtomicU64,
}

impl fmt::Debug for ScenarioRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioRegistry")
            .field("len", &self.len())
            .field(
                "terminal_rejections",
                &self.terminal_rejections.load(Ordering::Relaxed),
            )
            .field(
                "unknown_events",
                &self.unknown_events.load(Ordering::Relaxed),
            )
            .finish()
    }
}

impl Default for ScenarioRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        ScenarioRegistry {
            inner: RwLock::new(RegistryInner::default()),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
            terminal_rejections: AtomicU64::new(0),
            unknown_events: AtomicU64::new(0),
        }
    }

    /// Add a new record; ids must be unique.
    pub fn insert(
        &self,
        record: ScenarioRecord,
    ) -> Result<(), RegistryError> {
        let id = record.id;
        {
            let mut inner = self.inner.write();
            if inner.index.contains_key(&id) {
                return Err(RegistryError::DuplicateId(id));
            }
            let slot = inner.records.len();
            inner.records.push(record);
            inner.index.insert(id, slot);
        }
        self.notify(RegistryChange {
            id,
            kind: ChangeKind::Inserted,
        });
        Ok(())
    }

    /// Apply a terminal-state-guarded partial update.
    ///
    /// Once a record is Completed or Failed, further merges are rejected
    /// except an idempotent re-delivery of the identical patch; this
    /// protects against a stale `Update` arriving after completion.
    /// Unknown ids are a counted no-op.
    pub fn merge(
        &self,
        id: &ScenarioId,
        patch: ScenarioPatch,
    ) -> MergeOutcome {
        let outcome = {
            let mut inner = self.inner.write();
            let Some(&slot) = inner.index.get(id) else {
                self.unknown_events.fetch_add(1, Ordering::Relaxed);
                return MergeOutcome::UnknownId;
            };
            let record = &mut inner.records[slot];

            if record.status.is_terminal() {
                if Self::is_redelivery(record, &patch) {
                    return MergeOutcome::Unchanged;
                }
                self.terminal_rejections.fetch_add(1, Ordering::Relaxed);
                return MergeOutcome::TerminalRejected;
            }

            if let Some(name) = patch.name {
                record.name = name;
            }
            if let Some(status) = patch.status {
                record.status = status;
                // Results are only meaningful on a completed record.
                if status != ScenarioStatus::Completed {
                    record.results = None;
                }
            }
            if let Some(results) = patch.results {
                if record.status == ScenarioStatus::Completed {
                    record.results = Some(results);
                }
            }
            MergeOutcome::Applied
        };

        self.notify(RegistryChange {
            id: *id,
            kind: ChangeKind::Updated,
        });
        outcome
    }

    fn is_redelivery(
        record: &ScenarioRecord,
        patch: &ScenarioPatch,
    ) -> bool {
        let same_status = patch.status == Some(record.status);
        let same_results = match &patch.results {
            None => true,
            Some(results) => record.results.as_ref() == Some(results),
        };
        let same_name = match &patch.name {
            None => true,
            Some(name) => name == &record.name,
        };
        same_status && same_results && same_name
    }

    /// Drop a record; returns whether it existed.
    pub fn remove(&self, id: &ScenarioId) -> bool {
        let removed = {
            let mut guard = self.inner.write();
            let inner = &mut *guard;
            let Some(slot) = inner.index.remove(id) else {
                return false;
            };
            inner.records.remove(slot);
            // Reindex records after the removed slot.
            for (offset, record) in
                inner.records[slot..].iter().enumerate()
            {
                inner.index.insert(record.id, slot + offset);
            }
            true
        };
        if removed {
            self.notify(RegistryChange {
                id: *id,
                kind: ChangeKind::Removed,
            });
        }
        removed
    }

    /// Snapshot of one record.
    pub fn get_by_id(&self, id: &ScenarioId) -> Option<ScenarioRecord> {
        let inner = self.inner.read();
        inner.index.get(id).map(|&slot| inner.records[slot].clone())
    }

    /// Insertion-ordered snapshot of records in the given status.
    pub fn list_by_status(
        &self,
        status: ScenarioStatus,
    ) -> Vec<ScenarioRecord> {
        self.inner
            .read()
            .records
            .iter()
            .filter(|record| record.status == status)
            .cloned()
            .collect()
    }

    /// Insertion-ordered snapshot of all records.
    pub fn snapshot(&self) -> Vec<ScenarioRecord> {
        self.inner.read().records.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().records.is_empty()
    }

    /// Count of merges dropped by the terminal-state guard.
    pub fn terminal_rejections(&self) -> u64 {
        self.terminal_rejections.load(Ordering::Relaxed)
    }

    /// Count of events referencing ids absent from the registry.
    pub fn unknown_events(&self) -> u64 {
        self.unknown_events.load(Ordering::Relaxed)
    }

    /// Subscribe to registry changes.
    ///
    /// Listeners are invoked after each successful mutation; consumers
    /// should read state through the snapshot queries rather than
    /// retaining references of their own.
    pub fn subscribe(
        &self,
        listener: impl Fn(&RegistryChange) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(
            self.next_listener.fetch_add(1, Ordering::Relaxed),
        );
        self.listeners.lock().push((id, Box::new(listener)));
        id
    }

    /// Remove a previously registered listener; unknown ids are a no-op.
    pub fn unsubscribe(&self, id: ListenerId) {
        self.listeners.lock().retain(|(lid, _)| *lid != id);
    }

    fn notify(&self, change: RegistryChange) {
        // Listener calls happen outside the data lock so a subscriber
        // may issue snapshot reads.
        let listeners = self.listeners.lock();
        for (_, listener) in listeners.iter() {
            listener(&change);
        }
    }
}
