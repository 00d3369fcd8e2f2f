//! WebSocket transport for the event channel.
//!
//! Thin layer owning the socket I/O: it forwards raw text frames to the
//! adapter over an mpsc channel and handles reconnection after transient
//! drops. Decoding and dispatch stay in the Sans-IO
//! [`EventChannel`](crate::EventChannel).

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

use crate::error::ChannelError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport behavior knobs.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Deadline for the initial connection attempt.
    pub connect_timeout: Duration,

    /// Backoff before the first reconnection attempt.
    pub reconnect_initial: Duration,

    /// Backoff ceiling for repeated reconnection attempts.
    pub reconnect_max: Duration,
}

impl TransportConfig {
    /// Settings suited to tests: short timeouts, fast reconnects.
    pub fn development() -> Self {
        Self {
            connect_timeout: Duration::from_millis(500),
            reconnect_initial: Duration::from_millis(20),
            reconnect_max: Duration::from_millis(200),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            reconnect_initial: Duration::from_millis(500),
            reconnect_max: Duration::from_secs(15),
        }
    }
}

/// Signal from the socket task to the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSignal {
    /// A raw text frame arrived.
    Frame(String),

    /// The connection is (re-)established.
    Up,

    /// The connection dropped; the task is backing off and will retry.
    Down(String),
}

/// Handle to a connected feed.
///
/// Signals arrive on [`signals`](Self::signals); dropping the handle (or
/// calling [`stop`](Self::stop)) aborts the socket task.
#[derive(Debug)]
pub struct ConnectedFeed {
    /// Signals from the socket task, in arrival order.
    pub signals: mpsc::Receiver<FeedSignal>,
    abort_handle: tokio::task::AbortHandle,
}

impl ConnectedFeed {
    /// Stop the socket task.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

impl Drop for ConnectedFeed {
    fn drop(&mut self) {
        self.abort_handle.abort();
    }
}

/// Connect to the aggregator's event feed.
///
/// The initial attempt must succeed within `config.connect_timeout`. From
/// then on, drops are retried internally with exponential backoff and only
/// surface as [`FeedSignal::Down`]/[`FeedSignal::Up`] pairs - the caller's
/// registrations are unaffected.
///
/// # Errors
///
/// [`ChannelError::Connect`] if the initial connection fails.
pub async fn connect(
    endpoint: &str,
    config: TransportConfig,
) -> Result<ConnectedFeed, ChannelError> {
    let (ws, _) = tokio::time::timeout(config.connect_timeout, connect_async(endpoint))
        .await
        .map_err(|_| ChannelError::Connect(format!("timed out connecting to {endpoint}")))?
        .map_err(|e| ChannelError::Connect(e.to_string()))?;

    let (tx, rx) = mpsc::channel(64);
    let endpoint = endpoint.to_owned();
    let handle = tokio::spawn(run_feed(ws, endpoint, config, tx));

    Ok(ConnectedFeed { signals: rx, abort_handle: handle.abort_handle() })
}

/// Socket loop: drain one connection, then reconnect with backoff, until the
/// receiving side goes away.
async fn run_feed(
    mut ws: WsStream,
    endpoint: String,
    config: TransportConfig,
    signals: mpsc::Sender<FeedSignal>,
) {
    loop {
        if signals.send(FeedSignal::Up).await.is_err() {
            return;
        }

        let reason = drain_connection(&mut ws, &signals).await;
        debug!(%endpoint, %reason, "feed connection dropped");
        if signals.send(FeedSignal::Down(reason)).await.is_err() {
            return;
        }

        ws = match reconnect(&endpoint, &config, &signals).await {
            Some(ws) => ws,
            None => return,
        };
    }
}

/// Read frames until the connection drops. Returns the drop reason.
async fn drain_connection(ws: &mut WsStream, signals: &mpsc::Sender<FeedSignal>) -> String {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => {
                if signals.send(FeedSignal::Frame(text.to_string())).await.is_err() {
                    return "receiver dropped".to_owned();
                }
            },
            Some(Ok(Message::Ping(payload))) => {
                if let Err(e) = ws.send(Message::Pong(payload)).await {
                    return format!("pong failed: {e}");
                }
            },
            Some(Ok(Message::Close(_))) | None => return "closed by server".to_owned(),
            Some(Ok(other)) => debug!(?other, "ignoring non-text frame"),
            Some(Err(e)) => return e.to_string(),
        }
    }
}

/// Reconnect with exponential backoff. Returns `None` once the receiving
/// side has gone away and the task should exit.
async fn reconnect(
    endpoint: &str,
    config: &TransportConfig,
    signals: &mpsc::Sender<FeedSignal>,
) -> Option<WsStream> {
    let mut backoff = config.reconnect_initial;
    loop {
        tokio::time::sleep(backoff).await;
        if signals.is_closed() {
            return None;
        }
        match connect_async(endpoint).await {
            Ok((ws, _)) => return Some(ws),
            Err(e) => {
                debug!(%endpoint, error = %e, "reconnect attempt failed");
                backoff = (backoff * 2).min(config.reconnect_max);
            },
        }
    }
}
