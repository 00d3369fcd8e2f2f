//! In-process WebSocket feed server.

use std::net::SocketAddr;

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use argus_proto::encode_envelope;

/// Harness setup failure. Runtime fan-out is best-effort and never errors.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Could not bind the listener socket.
    #[error("failed to bind feed listener: {0}")]
    Bind(std::io::Error),
}

/// Commands fanned out to every connected client task.
#[derive(Debug, Clone)]
enum FanOut {
    /// Send a raw text frame.
    Send(String),
    /// Drop the socket without a close handshake.
    Kick,
}

/// Cheap cloneable push handle, usable independently of the server's
/// lifetime management (demo drivers run on their own task).
#[derive(Debug, Clone)]
pub struct FeedHandle {
    fan_out: broadcast::Sender<FanOut>,
}

impl FeedHandle {
    /// Push a well-formed envelope to every connected client.
    pub fn emit(&self, event: &str, data: &Value) {
        self.emit_raw(encode_envelope(event, data));
    }

    /// Push an arbitrary text frame (malformed-payload tests).
    pub fn emit_raw(&self, frame: String) {
        // A send error just means no clients are connected right now.
        let _ = self.fan_out.send(FanOut::Send(frame));
    }

    /// Drop every connected client without a close handshake.
    ///
    /// Clients observe a transport failure, exactly as with a crashed
    /// aggregator.
    pub fn kick_clients(&self) {
        let _ = self.fan_out.send(FanOut::Kick);
    }
}

/// Scripted feed server.
///
/// Accepts any number of WebSocket clients and pushes the same frames to all
/// of them, mimicking the aggregator's broadcast behavior.
pub struct FeedServer {
    addr: SocketAddr,
    handle: FeedHandle,
    accept_task: JoinHandle<()>,
}

impl FeedServer {
    /// Bind an ephemeral local port and start accepting clients.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Bind`] when the listener cannot be bound.
    pub async fn start() -> Result<Self, HarnessError> {
        let listener = TcpListener::bind("127.0.0.1:0").await.map_err(HarnessError::Bind)?;
        let addr = listener.local_addr().map_err(HarnessError::Bind)?;
        let (fan_out, _) = broadcast::channel(64);
        let handle = FeedHandle { fan_out };

        let accept_handle = handle.clone();
        let accept_task = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, peer)) => {
                        debug!(%peer, "feed client connected");
                        // Subscribe before the handshake so frames emitted
                        // from the moment `accept` returned are not lost.
                        let commands = accept_handle.fan_out.subscribe();
                        tokio::spawn(serve_client(stream, commands));
                    },
                    Err(e) => {
                        debug!(error = %e, "feed accept failed");
                        break;
                    },
                }
            }
        });

        Ok(Self { addr, handle, accept_task })
    }

    /// WebSocket URL clients should connect to.
    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Push handle, cloneable and independent of `self`'s lifetime.
    pub fn handle(&self) -> FeedHandle {
        self.handle.clone()
    }

    /// Push a well-formed envelope to every connected client.
    pub fn emit(&self, event: &str, data: &Value) {
        self.handle.emit(event, data);
    }

    /// Push an arbitrary text frame (malformed-payload tests).
    pub fn emit_raw(&self, frame: String) {
        self.handle.emit_raw(frame);
    }

    /// Drop every connected client without a close handshake.
    pub fn kick_clients(&self) {
        self.handle.kick_clients();
    }

    /// Stop accepting new clients. Live sockets close as their tasks notice
    /// the fan-out channel is gone.
    pub fn stop(&self) {
        self.accept_task.abort();
    }
}

impl Drop for FeedServer {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

/// Per-client task: run the WebSocket handshake, then forward fan-out
/// commands until the client leaves or is kicked.
async fn serve_client(stream: TcpStream, mut commands: broadcast::Receiver<FanOut>) {
    let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
        return;
    };

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Ok(FanOut::Send(frame)) => {
                    if ws.send(Message::text(frame)).await.is_err() {
                        return;
                    }
                },
                Ok(FanOut::Kick) | Err(broadcast::error::RecvError::Closed) => return,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "feed client lagged behind the fan-out");
                },
            },
            inbound = ws.next() => match inbound {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                Some(Ok(_)) => {},
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt as _;
    use serde_json::json;
    use tokio_tungstenite::connect_async;

    use super::*;

    #[tokio::test]
    async fn emitted_envelope_reaches_a_connected_client() {
        let server = FeedServer::start().await.unwrap();
        let (mut ws, _) = connect_async(server.url()).await.unwrap();

        server.emit("session_update", &json!([]));

        let frame = ws.next().await.unwrap().unwrap();
        let text = frame.into_text().unwrap();
        let envelope: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(envelope, json!({"event": "session_update", "data": []}));
    }

    #[tokio::test]
    async fn kicked_client_observes_a_transport_failure() {
        let server = FeedServer::start().await.unwrap();
        let (mut ws, _) = connect_async(server.url()).await.unwrap();

        server.kick_clients();

        // Either an error or a bare stream end, but never a clean close frame.
        match ws.next().await {
            None | Some(Err(_)) => {},
            Some(Ok(frame)) => assert!(!frame.is_close(), "unexpected close handshake"),
        }
    }
}
