//! UI state types.

/// Connection state of the event channel, as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Channel not yet established.
    Connecting,

    /// Channel live.
    Connected,

    /// Transport dropped; reconnection in progress.
    Reconnecting {
        /// Drop reason reported by the transport.
        reason: String,
    },
}
