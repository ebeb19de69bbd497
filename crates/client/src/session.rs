//! Manages the WebSocket connection lifecycle for one chat session.

use crate::{
    endpoint,
    error::ClientError,
    identity::Identity,
    protocol::{Decoded, InboundEvent, OutboundEvent, decode},
};
use futures_util::{SinkExt, StreamExt};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        client::IntoClientRequest, handshake::client::Request, protocol::Message as WsMessage,
    },
};
use tracing::{debug, error, info};

/// How long `stop` waits for the socket task to send its close frame before
/// aborting it outright (it may still be stuck in the handshake).
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Lifecycle states of one socket instance.
///
/// `Closed` is terminal for that socket; a new `start` call creates a
/// brand-new socket. There are no resume or reconnect semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Open,
    Closed,
}

/// Events a session emits to its subscriber, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The handshake completed and the socket is open.
    Opened,
    /// A decoded server event. Non-JSON payloads arrive wrapped in a
    /// synthesized system event rather than being dropped.
    Received(InboundEvent),
    /// The server closed the connection or the stream ended.
    Closed,
    /// The transport failed. The connection is presumed lost; nothing is
    /// retried.
    Errored(String),
}

/// One client's logical connection lifetime, from login to disconnect.
///
/// Owns the socket task and the outbound queue; inbound traffic is delivered
/// through the event receiver returned by [`ChatSession::start`]. All
/// rendering concerns live with the subscriber.
pub struct ChatSession {
    base_url: String,
    identity: Option<Identity>,
    state_tx: Arc<watch::Sender<SessionState>>,
    outbound_tx: Option<mpsc::Sender<OutboundEvent>>,
    task: Option<JoinHandle<()>>,
}

impl ChatSession {
    /// Creates an idle session pointed at a backend base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Idle);
        Self {
            base_url: base_url.into(),
            identity: None,
            state_tx: Arc::new(state_tx),
            outbound_tx: None,
            task: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    /// The identity of the most recent `start`, if any.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Validates the identity, opens a new socket to the backend, and returns
    /// the channel session events are delivered on.
    ///
    /// Validation failure leaves the session in its prior state. Any socket
    /// from an earlier `start` is shut down first; the new connection is
    /// independent of it.
    pub async fn start(
        &mut self,
        username: &str,
        room: Option<&str>,
    ) -> Result<mpsc::Receiver<SessionEvent>, ClientError> {
        let identity = Identity::new(username, room)?;
        let url = endpoint::session_url(&self.base_url, &identity);
        let request = url.as_str().into_client_request()?;

        self.shutdown_task().await;
        self.identity = Some(identity);
        self.state_tx.send_replace(SessionState::Connecting);

        let (event_tx, event_rx) = mpsc::channel(64);
        let (outbound_tx, outbound_rx) = mpsc::channel(64);
        let state_tx = self.state_tx.clone();
        info!(%url, "connecting to chat backend");
        self.task = Some(tokio::spawn(run_socket(
            request,
            state_tx,
            event_tx,
            outbound_rx,
        )));
        self.outbound_tx = Some(outbound_tx);
        Ok(event_rx)
    }

    /// Queues a chat message for the server.
    ///
    /// Returns `Ok(false)` without writing anything when the text trims to
    /// empty or the socket is absent or not open.
    pub async fn send(&self, text: &str) -> Result<bool, ClientError> {
        let text = text.trim();
        if text.is_empty() || self.state() != SessionState::Open {
            return Ok(false);
        }
        let Some(outbound_tx) = &self.outbound_tx else {
            return Ok(false);
        };
        let event = OutboundEvent::Message {
            text: text.to_string(),
        };
        // A dropped receiver means the socket task already exited; treat it
        // like any other not-open socket.
        Ok(outbound_tx.send(event).await.is_ok())
    }

    /// Closes the socket, if present, and marks the session `Closed`.
    pub async fn stop(&mut self) {
        self.shutdown_task().await;
        self.state_tx.send_replace(SessionState::Closed);
    }

    /// Tears down the socket task: dropping the outbound queue makes the task
    /// send a close frame and exit; a task still mid-handshake is aborted
    /// after the grace period.
    async fn shutdown_task(&mut self) {
        self.outbound_tx = None;
        if let Some(mut task) = self.task.take() {
            if tokio::time::timeout(SHUTDOWN_GRACE, &mut task).await.is_err() {
                task.abort();
            }
        }
    }
}

/// The socket task: connects, then bridges the outbound queue and the socket
/// stream until either side goes away.
async fn run_socket(
    request: Request,
    state_tx: Arc<watch::Sender<SessionState>>,
    event_tx: mpsc::Sender<SessionEvent>,
    mut outbound_rx: mpsc::Receiver<OutboundEvent>,
) {
    let stream = match connect_async(request).await {
        Ok((stream, _)) => stream,
        Err(e) => {
            error!(error = ?e, "failed to connect to chat backend");
            state_tx.send_replace(SessionState::Closed);
            let _ = event_tx.send(SessionEvent::Errored(e.to_string())).await;
            return;
        }
    };
    state_tx.send_replace(SessionState::Open);
    if event_tx.send(SessionEvent::Opened).await.is_err() {
        // Subscriber went away before the handshake finished.
        state_tx.send_replace(SessionState::Closed);
        return;
    }
    info!("connected to chat backend");

    let (mut socket_tx, mut socket_rx) = stream.split();
    loop {
        tokio::select! {
            outbound = outbound_rx.recv() => match outbound {
                Some(event) => {
                    let payload = match serde_json::to_string(&event) {
                        Ok(payload) => payload,
                        Err(e) => {
                            error!(error = ?e, "failed to encode outbound event");
                            continue;
                        }
                    };
                    if let Err(e) = socket_tx.send(WsMessage::Text(payload)).await {
                        error!(error = ?e, "failed to write to socket");
                        state_tx.send_replace(SessionState::Closed);
                        let _ = event_tx.send(SessionEvent::Errored(e.to_string())).await;
                        return;
                    }
                }
                // The session dropped the queue: explicit stop.
                None => {
                    let _ = socket_tx.send(WsMessage::Close(None)).await;
                    break;
                }
            },
            inbound = socket_rx.next() => match inbound {
                Some(Ok(WsMessage::Text(text))) => {
                    let event = match decode(&text) {
                        Decoded::Event(event) => event,
                        Decoded::Raw(raw) => {
                            debug!("non-JSON payload, degrading to plain text");
                            InboundEvent::system(raw)
                        }
                    };
                    if event_tx.send(SessionEvent::Received(event)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(WsMessage::Close(_))) | None => {
                    info!("server closed the connection");
                    state_tx.send_replace(SessionState::Closed);
                    let _ = event_tx.send(SessionEvent::Closed).await;
                    return;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!(error = ?e, "socket transport error");
                    state_tx.send_replace(SessionState::Closed);
                    let _ = event_tx.send(SessionEvent::Errored(e.to_string())).await;
                    return;
                }
            },
        }
    }
    state_tx.send_replace(SessionState::Closed);
}
