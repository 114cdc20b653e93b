//! Socket transport for the connection monitor.
//!
//! This module provides the seam between the monitor and the socket:
//! - `Transport` opens connections and hands back a `ConnectionHandle`
//! - Lifecycle events travel back on an mpsc channel, tagged with the
//!   `ConnectionId` of the handle that produced them
//! - `WsTransport` implements the seam with tokio-tungstenite
//!
//! **Panic-Free Policy:** This module follows the project's panic-free guidelines.
//! No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, or `todo!()`.

use futures_util::StreamExt;
use lrm_core::ConnectionId;
use lrm_protocol::{CloseCode, Endpoint};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode as WsCloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

// ============================================================================
// Events
// ============================================================================

/// A lifecycle event produced by one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake completed.
    Open,

    /// A text frame arrived.
    Message(String),

    /// The socket closed. Always the last event of a connection.
    Close {
        /// Close code from the closing handshake, or 1006 if there was none.
        code: CloseCode,
        /// Close reason, possibly empty.
        reason: String,
    },

    /// The transport failed. A `Close` always follows.
    Error(String),
}

/// A `TransportEvent` tagged with the connection that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionEvent {
    /// Generation of the producing handle.
    pub connection: ConnectionId,
    /// What happened.
    pub event: TransportEvent,
}

/// Sending half of the monitor's event channel, bound to one connection.
#[derive(Debug, Clone)]
pub struct EventSender {
    connection: ConnectionId,
    tx: mpsc::UnboundedSender<ConnectionEvent>,
}

impl EventSender {
    /// Binds a channel sender to a connection id.
    pub fn new(connection: ConnectionId, tx: mpsc::UnboundedSender<ConnectionEvent>) -> Self {
        Self { connection, tx }
    }

    /// Connection this sender reports for.
    pub fn connection_id(&self) -> ConnectionId {
        self.connection
    }

    /// Delivers an event. Returns false once the monitor is gone.
    pub fn send(&self, event: TransportEvent) -> bool {
        self.tx
            .send(ConnectionEvent {
                connection: self.connection,
                event,
            })
            .is_ok()
    }

    /// Reports a failure followed by an abnormal close.
    pub fn fail(&self, error: impl Into<String>) {
        if self.send(TransportEvent::Error(error.into())) {
            self.send(TransportEvent::Close {
                code: CloseCode::ABNORMAL,
                reason: String::new(),
            });
        }
    }
}

// ============================================================================
// Transport Seam
// ============================================================================

/// One live socket session.
pub trait ConnectionHandle: Send {
    /// Tears the connection down.
    ///
    /// After `close` returns the connection emits no further events.
    /// Calling it more than once is a no-op.
    fn close(&mut self);
}

/// Opens connections on behalf of the monitor.
pub trait Transport: Send {
    /// Starts connecting to `endpoint` and returns immediately.
    ///
    /// Lifecycle events for the new connection are delivered on `events`.
    fn open(&mut self, endpoint: &Endpoint, events: EventSender) -> Box<dyn ConnectionHandle>;
}

// ============================================================================
// WebSocket Transport
// ============================================================================

/// tokio-tungstenite transport. Each connection runs on its own task.
#[derive(Debug, Clone, Default)]
pub struct WsTransport;

impl WsTransport {
    /// Creates a new WebSocket transport.
    pub fn new() -> Self {
        Self
    }
}

impl Transport for WsTransport {
    fn open(&mut self, endpoint: &Endpoint, events: EventSender) -> Box<dyn ConnectionHandle> {
        let cancel = CancellationToken::new();
        tokio::spawn(drive_connection(
            endpoint.clone(),
            events,
            cancel.clone(),
        ));
        Box::new(WsHandle { cancel })
    }
}

/// Handle for a connection driven by `drive_connection`.
#[derive(Debug)]
pub struct WsHandle {
    cancel: CancellationToken,
}

impl ConnectionHandle for WsHandle {
    fn close(&mut self) {
        self.cancel.cancel();
    }
}

impl Drop for WsHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Runs one connection from handshake to close, forwarding lifecycle events.
///
/// Cancellation is checked with priority: once the handle is closed the
/// task sends a normal close frame and returns without reporting anything.
async fn drive_connection(endpoint: Endpoint, events: EventSender, cancel: CancellationToken) {
    let connection = events.connection_id();
    debug!(%connection, endpoint = %endpoint, "Opening WebSocket");

    let connect = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(%connection, "Connection closed before handshake finished");
            return;
        }
        result = tokio_tungstenite::connect_async(endpoint.as_str()) => result,
    };

    let mut ws = match connect {
        Ok((ws, _response)) => ws,
        Err(e) => {
            events.fail(e.to_string());
            return;
        }
    };

    if !events.send(TransportEvent::Open) {
        return;
    }

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                let frame = CloseFrame {
                    code: WsCloseCode::Normal,
                    reason: "".into(),
                };
                if let Err(e) = ws.close(Some(frame)).await {
                    debug!(%connection, error = %e, "Close handshake failed");
                }
                debug!(%connection, "Connection closed locally");
                return;
            }
            frame = ws.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if !events.send(TransportEvent::Message(text)) {
                        return;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = frame.map_or((CloseCode::NO_STATUS, String::new()), |f| {
                        (CloseCode::new(u16::from(f.code)), f.reason.into_owned())
                    });
                    // Completes the closing handshake; the reply is queued already.
                    let _ = ws.close(None).await;
                    events.send(TransportEvent::Close { code, reason });
                    return;
                }
                Some(Ok(Message::Binary(data))) => {
                    debug!(%connection, bytes = data.len(), "Ignoring binary frame");
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {
                    trace!(%connection, "Control frame");
                }
                Some(Err(e)) => {
                    events.fail(e.to_string());
                    return;
                }
                None => {
                    events.send(TransportEvent::Close {
                        code: CloseCode::ABNORMAL,
                        reason: String::new(),
                    });
                    return;
                }
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
