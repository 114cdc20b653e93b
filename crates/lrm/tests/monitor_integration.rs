//! Integration tests for the connection monitor over real sockets.
//!
//! Each test starts a tokio-tungstenite server on an ephemeral port and
//! drives a `ConnectionMonitor` with `WsTransport` against it, observing
//! the monitor through a `ChannelHost`.
//!
//! Tests CAN use `.unwrap()` and `.expect()`.

use std::time::Duration;

use futures_util::SinkExt;
use lrm_core::ConnectionStatus;
use lrm_protocol::Endpoint;
use lrm_tui::host::ChannelHost;
use lrm_tui::input::Event;
use lrm_tui::monitor::{ConnectionMonitor, MonitorConfig};
use lrm_tui::transport::WsTransport;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Constants
// ============================================================================

/// Reconnect delay used by the monitor under test
const RECONNECT_DELAY: Duration = Duration::from_millis(50);

/// Maximum time to wait for an expected event or connection
const EVENT_TIMEOUT: Duration = Duration::from_secs(2);

/// How long to watch for a reconnect that must not happen
const QUIET_PERIOD: Duration = Duration::from_millis(300);

// ============================================================================
// Test Helpers
// ============================================================================

/// Live-reload server bound to an ephemeral local port.
struct TestServer {
    listener: TcpListener,
    endpoint: Endpoint,
}

impl TestServer {
    async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let port = listener.local_addr().expect("local addr").port();
        let endpoint = Endpoint::parse(&format!("ws://127.0.0.1:{port}/ws")).expect("endpoint");
        Self { listener, endpoint }
    }

    /// Accepts the next client and completes the WebSocket handshake.
    async fn accept(&self) -> WebSocketStream<TcpStream> {
        let (stream, _addr) = tokio::time::timeout(EVENT_TIMEOUT, self.listener.accept())
            .await
            .expect("client should connect in time")
            .expect("accept tcp");
        tokio_tungstenite::accept_async(stream)
            .await
            .expect("websocket handshake")
    }

    /// Returns true if a client connects within `period`.
    async fn connects_within(&self, period: Duration) -> bool {
        tokio::time::timeout(period, self.listener.accept())
            .await
            .is_ok()
    }
}

/// Monitor running on its own task, observed through a `ChannelHost`.
struct RunningMonitor {
    events: mpsc::UnboundedReceiver<Event>,
    cancel_token: CancellationToken,
    task: JoinHandle<()>,
}

impl RunningMonitor {
    fn spawn(endpoint: Endpoint) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        let cancel_token = CancellationToken::new();
        let config = MonitorConfig {
            endpoint,
            reconnect_delay: RECONNECT_DELAY,
        };

        let mut monitor = ConnectionMonitor::new(
            config,
            WsTransport::new(),
            ChannelHost::new(event_tx),
            cancel_token.clone(),
        );
        let task = tokio::spawn(async move {
            monitor.run().await;
        });

        Self {
            events,
            cancel_token,
            task,
        }
    }

    async fn next_event(&mut self) -> Event {
        tokio::time::timeout(EVENT_TIMEOUT, self.events.recv())
            .await
            .expect("monitor event in time")
            .expect("event channel open")
    }

    /// Waits for the next status update, skipping other events.
    async fn next_status(&mut self) -> ConnectionStatus {
        loop {
            if let Event::Status(view) = self.next_event().await {
                return view.status;
            }
        }
    }

    async fn shutdown(self) {
        self.cancel_token.cancel();
        tokio::time::timeout(EVENT_TIMEOUT, self.task)
            .await
            .expect("monitor stops in time")
            .expect("monitor task did not panic");
    }
}

async fn close_with(ws: &mut WebSocketStream<TcpStream>, code: CloseCode, reason: &str) {
    let frame = CloseFrame {
        code,
        reason: reason.to_string().into(),
    };
    ws.close(Some(frame)).await.expect("send close frame");
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_connects_and_reports_connected() {
    let server = TestServer::bind().await;
    let mut monitor = RunningMonitor::spawn(server.endpoint.clone());

    let _ws = server.accept().await;

    assert_eq!(monitor.next_status().await, ConnectionStatus::Connecting);
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connected);

    monitor.shutdown().await;
}

#[tokio::test]
async fn test_reload_signal_reloads_and_reconnects() {
    let server = TestServer::bind().await;
    let mut monitor = RunningMonitor::spawn(server.endpoint.clone());

    let mut first = server.accept().await;
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connecting);
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connected);

    first
        .send(Message::Text("reload".to_string()))
        .await
        .expect("send reload");

    assert!(matches!(monitor.next_event().await, Event::Message(m) if m == "reload"));
    assert!(matches!(monitor.next_event().await, Event::Reload));

    // The reloaded page opens a fresh connection right away.
    let _second = server.accept().await;
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connecting);
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connected);

    monitor.shutdown().await;
}

#[tokio::test]
async fn test_other_payloads_do_not_reload() {
    let server = TestServer::bind().await;
    let mut monitor = RunningMonitor::spawn(server.endpoint.clone());

    let mut ws = server.accept().await;
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connecting);
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connected);

    ws.send(Message::Text("Reload".to_string())).await.expect("send");
    ws.send(Message::Text("ping".to_string())).await.expect("send");

    assert!(matches!(monitor.next_event().await, Event::Message(m) if m == "Reload"));
    assert!(matches!(monitor.next_event().await, Event::Message(m) if m == "ping"));
    assert!(!server.connects_within(QUIET_PERIOD).await);

    monitor.shutdown().await;
}

#[tokio::test]
async fn test_normal_close_does_not_reconnect() {
    let server = TestServer::bind().await;
    let mut monitor = RunningMonitor::spawn(server.endpoint.clone());

    let mut ws = server.accept().await;
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connecting);
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connected);

    close_with(&mut ws, CloseCode::Normal, "server shutting down").await;

    assert_eq!(monitor.next_status().await, ConnectionStatus::Disconnected);
    assert!(!server.connects_within(QUIET_PERIOD).await);

    monitor.shutdown().await;
}

#[tokio::test]
async fn test_going_away_close_does_not_reconnect() {
    let server = TestServer::bind().await;
    let mut monitor = RunningMonitor::spawn(server.endpoint.clone());

    let mut ws = server.accept().await;
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connecting);
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connected);

    close_with(&mut ws, CloseCode::Away, "").await;

    assert_eq!(monitor.next_status().await, ConnectionStatus::Disconnected);
    assert!(!server.connects_within(QUIET_PERIOD).await);

    monitor.shutdown().await;
}

#[tokio::test]
async fn test_server_error_close_reconnects_after_delay() {
    let server = TestServer::bind().await;
    let mut monitor = RunningMonitor::spawn(server.endpoint.clone());

    let mut first = server.accept().await;
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connecting);
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connected);

    close_with(&mut first, CloseCode::Error, "restarting").await;
    assert_eq!(monitor.next_status().await, ConnectionStatus::Disconnected);

    let _second = server.accept().await;
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connecting);
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connected);

    monitor.shutdown().await;
}

#[tokio::test]
async fn test_unreachable_server_reports_error_then_retries() {
    // Reserve a port, then free it so nothing is listening there.
    let endpoint = {
        let server = TestServer::bind().await;
        server.endpoint.clone()
    };
    let mut monitor = RunningMonitor::spawn(endpoint);

    assert_eq!(monitor.next_status().await, ConnectionStatus::Connecting);
    assert_eq!(monitor.next_status().await, ConnectionStatus::Error);
    assert_eq!(monitor.next_status().await, ConnectionStatus::Disconnected);

    // The retry fails the same way; the monitor keeps trying.
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connecting);
    assert_eq!(monitor.next_status().await, ConnectionStatus::Error);

    monitor.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_closes_the_socket() {
    let server = TestServer::bind().await;
    let mut monitor = RunningMonitor::spawn(server.endpoint.clone());

    let mut ws = server.accept().await;
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connecting);
    assert_eq!(monitor.next_status().await, ConnectionStatus::Connected);

    monitor.shutdown().await;

    // The client ends with a normal close frame.
    let frame = tokio::time::timeout(EVENT_TIMEOUT, futures_util::StreamExt::next(&mut ws))
        .await
        .expect("close frame in time");
    match frame {
        Some(Ok(Message::Close(Some(frame)))) => assert_eq!(frame.code, CloseCode::Normal),
        other => panic!("expected close frame, got {other:?}"),
    }
    assert!(!server.connects_within(QUIET_PERIOD).await);
}
