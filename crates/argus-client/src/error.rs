//! Error types for the synchronization core.

use thiserror::Error;

/// Channel setup and lifecycle failure.
///
/// Only connection establishment and API misuse are errors. Transport drops
/// after a successful connect are not: those surface as
/// [`ChannelStatus::Down`](crate::ChannelStatus) activity while the transport
/// task retries.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Initial connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// `connect` was called a second time on the same channel.
    #[error("channel is already connected")]
    AlreadyConnected,

    /// The channel was already torn down.
    #[error("channel is closed")]
    Closed,
}

/// Error returned by a snapshot listener.
///
/// Isolated by the view model: the failing listener is reported as a
/// diagnostic and the remaining listeners in the batch still run. Listener
/// failures can never corrupt the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ListenerError(String);

impl ListenerError {
    /// Wrap a listener failure description.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
