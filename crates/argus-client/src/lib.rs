//! Client-side live state synchronization for the Argus dashboard.
//!
//! One persistent event channel delivers push updates describing the current
//! full set of active media-playback sessions. This crate keeps a consistent
//! in-memory view of that set as the stream changes over time.
//!
//! # Architecture
//!
//! - [`EventChannel`]: owns the connection to the aggregator and a handler
//!   registry keyed by [`EventKind`]. Raw frames are decoded and dispatched
//!   synchronously inside [`EventChannel::poll_activity`], on the host's own
//!   task.
//! - [`SessionViewModel`]: holds the authoritative [`SessionSnapshot`],
//!   applies snapshot-replace updates and notifies subscribers.
//! - [`transport`]: the background socket task. It forwards raw frames over
//!   an mpsc channel and retries transient disconnects with backoff,
//!   opaquely to everything above it.
//!
//! All state mutation happens synchronously on the host task; the transport
//! task only forwards raw frames. There is no shared mutable state and no
//! locking anywhere in the core.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod channel;
mod error;
mod view_model;

pub mod transport;

pub use argus_proto::{DecodeError, EventKind, RawEvent, Session, SessionSnapshot};
pub use channel::{Activity, ChannelStatus, EventChannel, EventHandler};
pub use error::{ChannelError, ListenerError};
pub use transport::TransportConfig;
pub use view_model::{ListenerId, SessionViewModel, SnapshotListener, UpdateOutcome, ViewPhase};
