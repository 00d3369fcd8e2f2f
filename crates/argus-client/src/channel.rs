//! Event channel adapter.
//!
//! Owns the single long-lived connection to the aggregator plus the registry
//! of event handlers. Raw frames arrive from the transport task; decoding
//! and handler dispatch run synchronously inside
//! [`EventChannel::poll_activity`] on the host's task, so handlers never
//! race with host reads.

use argus_proto::{DecodeError, EventKind, RawEvent, decode_envelope};
use tracing::{debug, warn};

use crate::error::ChannelError;
use crate::transport::{self, ConnectedFeed, FeedSignal, TransportConfig};

/// Handler invoked for every decoded event of its registered kind.
pub type EventHandler = Box<dyn FnMut(&RawEvent) + Send>;

/// Connection status as observed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelStatus {
    /// Channel is live.
    Up,
    /// Transport dropped; reconnection is in progress.
    Down(String),
}

/// What one [`EventChannel::poll_activity`] call observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    /// An event was decoded and delivered to its handlers.
    Event(EventKind),
    /// A malformed inbound frame was dropped; delivery continues.
    Dropped(DecodeError),
    /// A frame with an unknown event name was ignored.
    Ignored,
    /// Connection status changed.
    Status(ChannelStatus),
}

/// Push-event channel to the aggregator.
///
/// Explicitly constructed and owned by its host - there is no process-wide
/// channel instance, so tests run any number of independent channels side by
/// side.
///
/// `connect` may be called once per channel. Handler registrations survive
/// transport reconnects and are released by [`off`](Self::off),
/// [`disconnect`](Self::disconnect), or drop.
pub struct EventChannel {
    handlers: Vec<(EventKind, EventHandler)>,
    feed: Option<ConnectedFeed>,
    config: TransportConfig,
    connected_once: bool,
    closed: bool,
}

impl EventChannel {
    /// Channel with default transport settings.
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Channel with explicit transport settings.
    pub fn with_config(config: TransportConfig) -> Self {
        Self {
            handlers: Vec::new(),
            feed: None,
            config,
            connected_once: false,
            closed: false,
        }
    }

    /// Register `handler` for `kind`.
    ///
    /// Any number of handlers may be registered per kind; handlers for the
    /// same kind run in registration order.
    pub fn on(&mut self, kind: EventKind, handler: impl FnMut(&RawEvent) + Send + 'static) {
        self.handlers.push((kind, Box::new(handler)));
    }

    /// Remove every handler registered for `kind`.
    ///
    /// Safe to call when none are registered.
    pub fn off(&mut self, kind: EventKind) {
        self.handlers.retain(|(k, _)| *k != kind);
    }

    /// Establish the channel. At most once per instance.
    ///
    /// # Errors
    ///
    /// [`ChannelError::AlreadyConnected`] on a second call,
    /// [`ChannelError::Closed`] after teardown, and
    /// [`ChannelError::Connect`] when the initial connection fails. Drops
    /// after a successful connect are not errors: they surface as
    /// [`ChannelStatus::Down`] activity while the transport retries.
    pub async fn connect(&mut self, endpoint: &str) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }
        if self.connected_once {
            return Err(ChannelError::AlreadyConnected);
        }

        let feed = transport::connect(endpoint, self.config.clone()).await?;
        self.connected_once = true;
        self.feed = Some(feed);
        Ok(())
    }

    /// Wait for the next inbound signal and process it.
    ///
    /// The host's single suspension point: decoding and handler dispatch
    /// both run synchronously here, before the call returns. Returns `None`
    /// when there is nothing left to poll (never connected, torn down, or
    /// the transport task is gone).
    pub async fn poll_activity(&mut self) -> Option<Activity> {
        let signal = self.feed.as_mut()?.signals.recv().await?;
        Some(match signal {
            FeedSignal::Frame(raw) => self.handle_frame(&raw),
            FeedSignal::Up => Activity::Status(ChannelStatus::Up),
            FeedSignal::Down(reason) => {
                warn!(%reason, "event channel down, transport retrying");
                Activity::Status(ChannelStatus::Down(reason))
            },
        })
    }

    /// Decode one raw frame and deliver it to the registered handlers.
    ///
    /// Decode failures drop the frame only: later frames and the handler
    /// registry are unaffected. After teardown, frames still queued from the
    /// transport are ignored outright.
    pub fn handle_frame(&mut self, raw: &str) -> Activity {
        if self.closed {
            debug!("frame ignored: channel closed");
            return Activity::Ignored;
        }

        match decode_envelope(raw) {
            Ok(Some(event)) => {
                let kind = event.kind();
                for (_, handler) in self.handlers.iter_mut().filter(|(k, _)| *k == kind) {
                    handler(&event);
                }
                Activity::Event(kind)
            },
            Ok(None) => {
                debug!("ignoring frame with unknown event name");
                Activity::Ignored
            },
            Err(e) => {
                warn!(error = %e, "dropping malformed event frame");
                Activity::Dropped(e)
            },
        }
    }

    /// Tear the channel down and release every handler registration.
    ///
    /// Idempotent, and also run on drop - release happens even when teardown
    /// is driven by an error elsewhere in the host.
    pub fn disconnect(&mut self) {
        if let Some(feed) = self.feed.take() {
            feed.stop();
        }
        self.handlers.clear();
        self.closed = true;
    }

    /// True until [`disconnect`](Self::disconnect) (or drop) tears the
    /// channel down.
    pub fn is_open(&self) -> bool {
        !self.closed
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventChannel {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use argus_proto::{SERVERS_UPDATED, SESSION_UPDATE, encode_envelope};
    use serde_json::json;

    use super::*;

    fn counting_handler(counter: &Arc<AtomicUsize>) -> impl FnMut(&RawEvent) + Send + 'static {
        let counter = Arc::clone(counter);
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn handlers_for_a_kind_run_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut channel = EventChannel::new();

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            channel.on(EventKind::SessionUpdate, move |_| {
                order.lock().unwrap().push(tag);
            });
        }

        let activity = channel.handle_frame(&encode_envelope(SESSION_UPDATE, &json!([])));
        assert_eq!(activity, Activity::Event(EventKind::SessionUpdate));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn handlers_only_see_their_own_kind() {
        let sessions = Arc::new(AtomicUsize::new(0));
        let servers = Arc::new(AtomicUsize::new(0));
        let mut channel = EventChannel::new();
        channel.on(EventKind::SessionUpdate, counting_handler(&sessions));
        channel.on(EventKind::ServersUpdated, counting_handler(&servers));

        channel.handle_frame(&encode_envelope(SERVERS_UPDATED, &json!({"nodes": []})));

        assert_eq!(sessions.load(Ordering::SeqCst), 0);
        assert_eq!(servers.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn servers_updated_payload_passes_through_opaquely() {
        let seen = Arc::new(Mutex::new(None));
        let mut channel = EventChannel::new();
        {
            let seen = Arc::clone(&seen);
            channel.on(EventKind::ServersUpdated, move |event| {
                if let RawEvent::ServersUpdated(data) = event {
                    *seen.lock().unwrap() = Some(data.clone());
                }
            });
        }

        let payload = json!({"nodes": [{"name": "node-1", "url": "http://10.0.0.2:32400/"}]});
        channel.handle_frame(&encode_envelope(SERVERS_UPDATED, &payload));

        assert_eq!(seen.lock().unwrap().as_ref(), Some(&payload));
    }

    #[test]
    fn off_removes_all_handlers_for_the_kind_and_is_idempotent() {
        let sessions = Arc::new(AtomicUsize::new(0));
        let servers = Arc::new(AtomicUsize::new(0));
        let mut channel = EventChannel::new();
        channel.on(EventKind::SessionUpdate, counting_handler(&sessions));
        channel.on(EventKind::SessionUpdate, counting_handler(&sessions));
        channel.on(EventKind::ServersUpdated, counting_handler(&servers));

        channel.off(EventKind::SessionUpdate);
        // Removing again, with nothing registered, is a no-op.
        channel.off(EventKind::SessionUpdate);

        channel.handle_frame(&encode_envelope(SESSION_UPDATE, &json!([])));
        channel.handle_frame(&encode_envelope(SERVERS_UPDATED, &json!(null)));

        assert_eq!(sessions.load(Ordering::SeqCst), 0);
        assert_eq!(servers.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn malformed_frame_does_not_break_later_delivery() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut channel = EventChannel::new();
        channel.on(EventKind::SessionUpdate, counting_handler(&count));

        assert!(matches!(channel.handle_frame("{not json"), Activity::Dropped(_)));
        assert!(matches!(
            channel.handle_frame(&json!({"event": SESSION_UPDATE}).to_string()),
            Activity::Dropped(DecodeError::MissingData(_))
        ));

        // The registry survived both malformed frames.
        channel.handle_frame(&encode_envelope(SESSION_UPDATE, &json!([])));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_event_is_ignored() {
        let mut channel = EventChannel::new();
        let activity = channel.handle_frame(&encode_envelope("heartbeat", &json!(1)));
        assert_eq!(activity, Activity::Ignored);
    }

    #[test]
    fn no_delivery_after_disconnect_even_for_queued_frames() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut channel = EventChannel::new();
        channel.on(EventKind::SessionUpdate, counting_handler(&count));

        // Frames that were already queued when teardown ran must not reach
        // the (now released) handlers.
        let queued = encode_envelope(SESSION_UPDATE, &json!([]));
        channel.disconnect();
        assert_eq!(channel.handle_frame(&queued), Activity::Ignored);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!channel.is_open());
    }

    #[tokio::test]
    async fn poll_activity_without_a_connection_returns_none() {
        let mut channel = EventChannel::new();
        assert_eq!(channel.poll_activity().await, None);
    }

    #[tokio::test]
    async fn connect_after_disconnect_is_rejected() {
        let mut channel = EventChannel::new();
        channel.disconnect();
        assert!(matches!(
            channel.connect("ws://127.0.0.1:1/").await,
            Err(ChannelError::Closed)
        ));
    }
}
