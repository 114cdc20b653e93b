//! Live-reload connection monitor.
//!
//! This module provides the `ConnectionMonitor` which handles:
//! - Keeping at most one connection to the dev server open
//! - Mirroring the connection lifecycle into the status display
//! - Reloading the page when the server sends `reload`
//! - Reconnecting after a fixed delay when the socket closes unexpectedly
//!
//! **Panic-Free Policy:** This module follows the project's panic-free guidelines.
//! No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, or `todo!()`.

use std::time::Duration;

use lrm_core::{ConnectionId, ConnectionStatus};
use lrm_protocol::{CloseCode, Endpoint, InboundSignal};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::host::{PageReloader, StatusSink};
use crate::transport::{ConnectionEvent, ConnectionHandle, EventSender, Transport, TransportEvent};

// ============================================================================
// Configuration
// ============================================================================

/// Delay between an unexpected close and the next connection attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(3000);

/// Configuration for the connection monitor.
///
/// # Example
///
/// ```rust
/// use lrm_tui::monitor::MonitorConfig;
/// use std::time::Duration;
///
/// let config = MonitorConfig {
///     reconnect_delay: Duration::from_millis(500),
///     ..Default::default()
/// };
/// assert_eq!(config.endpoint.as_str(), "ws://localhost:3000/ws");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Socket address of the dev server.
    pub endpoint: Endpoint,

    /// Fixed delay before reconnecting. There is no backoff.
    pub reconnect_delay: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

// ============================================================================
// Lifecycle Callbacks
// ============================================================================

/// The four lifecycle callbacks of a connection.
pub trait ConnectionEvents {
    /// The handshake completed.
    fn on_open(&mut self);

    /// A text payload arrived.
    fn on_message(&mut self, payload: &str);

    /// The socket closed with `code`.
    fn on_close(&mut self, code: CloseCode, reason: &str);

    /// The transport failed. `on_close` follows.
    fn on_error(&mut self, error: &str);
}

// ============================================================================
// Connection Monitor
// ============================================================================

/// Watches the dev server socket and reloads the page on request.
///
/// # Connection Lifecycle
///
/// 1. `run` calls `connect`, which opens a handle and shows "Connecting..."
/// 2. Open shows "Connected!"
/// 3. A `reload` payload closes the handle, reloads the page and connects
///    again, the way a freshly loaded page would
/// 4. A close shows "Disconnected"; unless the code is 1000 or 1001 one
///    reconnect is scheduled after `reconnect_delay`
/// 5. An error shows "Error"; the close that follows decides about retrying
///
/// Events and the reconnect timer are served from a single loop, so no two
/// callbacks ever run at the same time.
///
/// # Example
///
/// ```rust,ignore
/// use lrm_tui::host::ChannelHost;
/// use lrm_tui::monitor::{ConnectionMonitor, MonitorConfig};
/// use lrm_tui::transport::WsTransport;
/// use tokio_util::sync::CancellationToken;
///
/// let cancel_token = CancellationToken::new();
/// let mut monitor = ConnectionMonitor::new(
///     MonitorConfig::default(),
///     WsTransport::new(),
///     ChannelHost::new(event_tx),
///     cancel_token.clone(),
/// );
///
/// tokio::spawn(async move {
///     monitor.run().await;
/// });
/// ```
pub struct ConnectionMonitor<T, H> {
    /// Endpoint and retry delay.
    config: MonitorConfig,

    /// Opens connections.
    transport: T,

    /// Status display and page.
    host: H,

    /// Current lifecycle state.
    status: ConnectionStatus,

    /// The live handle, if any.
    handle: Option<Box<dyn ConnectionHandle>>,

    /// Connection whose events are currently accepted.
    current: Option<ConnectionId>,

    /// Id handed to the next connection.
    next_id: ConnectionId,

    /// When the pending reconnect fires. At most one is outstanding.
    reconnect_at: Option<Instant>,

    /// Number of `connect` calls so far.
    connect_attempts: u64,

    /// Channel the transport reports lifecycle events on.
    events_tx: mpsc::UnboundedSender<ConnectionEvent>,

    /// Receiving half, held by `run` while it executes.
    events_rx: Option<mpsc::UnboundedReceiver<ConnectionEvent>>,

    /// Cancellation token for graceful shutdown.
    cancel_token: CancellationToken,
}

impl<T, H> ConnectionMonitor<T, H>
where
    T: Transport,
    H: StatusSink + PageReloader,
{
    /// Creates a monitor. Nothing connects until `run` or `connect` is called.
    #[must_use]
    pub fn new(config: MonitorConfig, transport: T, host: H, cancel_token: CancellationToken) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            transport,
            host,
            status: ConnectionStatus::Connecting,
            handle: None,
            current: None,
            next_id: ConnectionId::default(),
            reconnect_at: None,
            connect_attempts: 0,
            events_tx,
            events_rx: Some(events_rx),
            cancel_token,
        }
    }

    /// Creates a monitor with the default endpoint and delay.
    #[must_use]
    pub fn with_defaults(transport: T, host: H, cancel_token: CancellationToken) -> Self {
        Self::new(MonitorConfig::default(), transport, host, cancel_token)
    }

    /// Current lifecycle state.
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Monitor configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Number of connection attempts made so far.
    pub fn connect_attempts(&self) -> u64 {
        self.connect_attempts
    }

    /// Deadline of the pending reconnect, if one is scheduled.
    pub fn reconnect_deadline(&self) -> Option<Instant> {
        self.reconnect_at
    }

    /// Connection whose events are currently accepted.
    pub fn current_connection(&self) -> Option<ConnectionId> {
        self.current
    }

    /// Opens a new connection, tearing down the previous one first.
    ///
    /// Also clears a pending reconnect so that at most one attempt is
    /// ever in flight.
    pub fn connect(&mut self) {
        self.teardown();

        let id = self.next_id;
        self.next_id = id.next();
        self.current = Some(id);
        self.connect_attempts = self.connect_attempts.saturating_add(1);

        info!(
            connection = %id,
            endpoint = %self.config.endpoint,
            attempt = self.connect_attempts,
            "Connecting to live-reload server"
        );
        self.set_status(ConnectionStatus::Connecting);

        let events = EventSender::new(id, self.events_tx.clone());
        self.handle = Some(self.transport.open(&self.config.endpoint, events));
    }

    /// Closes the current connection and drops any pending reconnect.
    pub fn stop(&mut self) {
        self.teardown();
        info!("Connection monitor stopped");
    }

    /// Main loop: connects, then serves events and the reconnect timer.
    ///
    /// Runs until the cancellation token is triggered, then calls `stop`.
    pub async fn run(&mut self) {
        let Some(mut events_rx) = self.events_rx.take() else {
            warn!("Connection monitor is already running");
            return;
        };
        let cancel_token = self.cancel_token.clone();

        info!(endpoint = %self.config.endpoint, "Connection monitor starting");

        if !cancel_token.is_cancelled() {
            self.connect();
        }

        while !cancel_token.is_cancelled() {
            let deadline = self.reconnect_at;

            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => {
                    debug!("Connection monitor cancelled");
                }
                event = events_rx.recv() => match event {
                    Some(event) => self.dispatch(event),
                    None => {
                        // The monitor owns a sender, so this only happens if it was dropped.
                        warn!("Event channel closed");
                        break;
                    }
                },
                () = wait_for(deadline) => {
                    self.reconnect_at = None;
                    info!("Reconnect timer fired");
                    self.connect();
                }
            }
        }

        self.stop();
        self.events_rx = Some(events_rx);
    }

    /// Routes an event to its callback if it belongs to the live connection.
    pub fn dispatch(&mut self, event: ConnectionEvent) {
        if self.current != Some(event.connection) {
            debug!(
                connection = %event.connection,
                event = ?event.event,
                "Ignoring event from a closed connection"
            );
            return;
        }

        match event.event {
            TransportEvent::Open => self.on_open(),
            TransportEvent::Message(payload) => self.on_message(&payload),
            TransportEvent::Close { code, reason } => self.on_close(code, &reason),
            TransportEvent::Error(error) => self.on_error(&error),
        }
    }

    /// Closes the live handle and forgets its connection id.
    fn teardown(&mut self) {
        self.reconnect_at = None;
        if let Some(mut handle) = self.handle.take() {
            if let Some(id) = self.current {
                debug!(connection = %id, "Closing connection handle");
            }
            handle.close();
        }
        self.current = None;
    }

    fn set_status(&mut self, next: ConnectionStatus) {
        if self.status != next && !self.status.can_transition_to(next) {
            warn!(from = %self.status, to = %next, "Unexpected status transition");
        }
        self.status = next;
        self.host.render(&next.view());
    }

    fn schedule_reconnect(&mut self) {
        let delay = self.config.reconnect_delay;
        self.reconnect_at = Some(Instant::now() + delay);
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        info!(delay_ms, "Reconnect scheduled");
    }
}

impl<T, H> ConnectionEvents for ConnectionMonitor<T, H>
where
    T: Transport,
    H: StatusSink + PageReloader,
{
    fn on_open(&mut self) {
        info!("WebSocket connected!");
        self.set_status(ConnectionStatus::Connected);
    }

    fn on_message(&mut self, payload: &str) {
        info!(payload = %payload, "Message from server");
        self.host.message_received(payload);

        if let InboundSignal::Reload = InboundSignal::parse(payload) {
            info!("Reloading page...");
            self.teardown();
            self.host.reload();
            self.connect();
        }
    }

    fn on_close(&mut self, code: CloseCode, reason: &str) {
        info!(code = %code, reason = %reason, "WebSocket disconnected");

        // The socket is gone; later events for this id are ignored.
        self.handle = None;
        self.current = None;
        self.set_status(ConnectionStatus::Disconnected);

        if code.is_terminal() {
            info!(code = %code, "Server closed the connection on purpose, not reconnecting");
        } else {
            self.schedule_reconnect();
        }
    }

    fn on_error(&mut self, error: &str) {
        error!(error = %error, "WebSocket error");
        self.set_status(ConnectionStatus::Error);
    }
}

/// Resolves at `deadline`, or never when there is none.
async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

// ============================================================================
// Tests
// ============================================================================
