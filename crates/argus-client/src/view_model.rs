//! Session view model.
//!
//! Owns the authoritative [`SessionSnapshot`] and keeps it consistent with
//! the latest `session_update` event. The snapshot is the only mutable state
//! in the core: it is replaced wholesale here and nowhere else, and every
//! consumer gets a shared read-only view.

use argus_proto::{Session, SessionSnapshot};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ListenerError;

/// Listener notified after every applied update.
pub type SnapshotListener = Box<dyn FnMut(&SessionSnapshot) -> Result<(), ListenerError> + Send>;

/// Handle for removing a subscribed listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

/// Lifecycle phase of the view.
///
/// One-directional: `Empty` only before the first applied update,
/// `Populated` from then on. An update with zero sessions is still
/// `Populated` - "no active sessions" is data, "no update yet" is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    /// No update applied yet.
    Empty,
    /// At least one update applied.
    Populated,
}

/// Result of applying one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Records accepted into the new snapshot.
    pub applied: usize,
    /// Malformed records dropped from the update.
    pub skipped: usize,
}

/// In-memory holder of the latest session snapshot.
///
/// The current snapshot is always exactly the (per-record filtered) payload
/// of the most recently applied update; partial updates are never merged.
pub struct SessionViewModel {
    snapshot: SessionSnapshot,
    phase: ViewPhase,
    listeners: Vec<(ListenerId, SnapshotListener)>,
    next_listener: u64,
    disposed: bool,
}

impl SessionViewModel {
    /// View model in the initial `Empty` phase.
    pub fn new() -> Self {
        Self {
            snapshot: SessionSnapshot::new(),
            phase: ViewPhase::Empty,
            listeners: Vec::new(),
            next_listener: 0,
            disposed: false,
        }
    }

    /// Replace the snapshot with the records of a `session_update` event.
    ///
    /// Records are decoded independently: a malformed record is dropped (and
    /// counted in [`UpdateOutcome::skipped`]) instead of discarding the rest
    /// of the update. Rejecting the whole update on one bad record was the
    /// alternative; filtering was chosen so a single corrupt session can
    /// never blank an otherwise valid dashboard.
    ///
    /// Listeners run synchronously, in subscription order, before this call
    /// returns. After [`dispose`](Self::dispose), updates are ignored.
    pub fn apply_update(&mut self, records: &[Value]) -> UpdateOutcome {
        if self.disposed {
            debug!("update ignored: view model disposed");
            return UpdateOutcome { applied: 0, skipped: 0 };
        }

        let mut sessions = Vec::with_capacity(records.len());
        let mut skipped = 0usize;
        for (index, record) in records.iter().enumerate() {
            match Session::from_record(index, record) {
                Ok(session) => sessions.push(session),
                Err(e) => {
                    warn!(error = %e, "dropping malformed session record");
                    skipped += 1;
                },
            }
        }

        let applied = sessions.len();
        self.snapshot = SessionSnapshot::from(sessions);
        self.phase = ViewPhase::Populated;
        self.notify();

        UpdateOutcome { applied, skipped }
    }

    /// Latest snapshot, in feed order. Read-only: the snapshot is only ever
    /// replaced through [`apply_update`](Self::apply_update).
    pub fn current(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    /// Lifecycle phase (`Empty` until the first update).
    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    /// Subscribe to update notifications.
    ///
    /// Listeners run synchronously after each applied update, in
    /// subscription order. A listener returning an error is reported as a
    /// diagnostic and the rest of the batch still runs.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&SessionSnapshot) -> Result<(), ListenerError> + Send + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. No-op for unknown or already-removed ids.
    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }

    /// Drop all listeners and ignore any further updates.
    ///
    /// No notification is delivered after this returns. A batch already
    /// running when disposal is triggered finishes delivering to its
    /// remaining listeners: dispatch and disposal share the host task, so
    /// the two can never interleave mid-batch.
    pub fn dispose(&mut self) {
        self.listeners.clear();
        self.disposed = true;
    }

    /// True once [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn notify(&mut self) {
        for (id, listener) in &mut self.listeners {
            if let Err(e) = listener(&self.snapshot) {
                warn!(listener = id.0, error = %e, "snapshot listener failed");
            }
        }
    }
}

impl Default for SessionViewModel {
    fn default() -> Self {
        Self::new()
    }
}
