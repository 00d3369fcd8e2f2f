//! UI events.
//!
//! Events fed into the App state machine from terminal input and from the
//! synchronization core.

use argus_client::{SessionSnapshot, ViewPhase};
use crossterm::event::KeyCode;

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyCode),

    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// The view model applied an update.
    SnapshotChanged {
        /// The new authoritative snapshot.
        snapshot: SessionSnapshot,
        /// View phase after the update.
        phase: ViewPhase,
        /// Malformed records dropped from the update.
        skipped: usize,
    },

    /// The event channel is live.
    ChannelUp,

    /// The event channel dropped; the transport is retrying.
    ChannelDown {
        /// Drop reason reported by the transport.
        reason: String,
    },

    /// Server-list metadata changed.
    ServersUpdated {
        /// Number of known backend servers, when the payload carried a list.
        count: Option<usize>,
    },

    /// A non-fatal feed diagnostic worth showing to the operator.
    Diagnostic {
        /// Human-readable message.
        message: String,
    },
}
