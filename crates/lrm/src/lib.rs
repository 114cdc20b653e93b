//! lrm - Live-reload monitor library
//!
//! This library watches a dev server's live-reload socket, mirrors the
//! connection state into a status display, and reloads the page when the
//! server says so.
//!
//! # Architecture
//!
//! 1. **Connection Monitor Task**: owns the socket handle and the reconnect
//!    timer, and serves lifecycle events one at a time
//! 2. **Transport Tasks**: one per connection, forwarding socket events
//! 3. **Main Event Loop** (TUI mode): renders status, messages and reloads
//!
//! All tasks respect a shared `CancellationToken` for graceful shutdown.

pub mod app;
pub mod config;
pub mod error;
pub mod host;
pub mod input;
pub mod monitor;
pub mod transport;
pub mod ui;

// Re-export commonly used types
pub use app::App;
pub use config::Settings;
pub use error::{Result, TuiError};
pub use host::{ChannelHost, PageReloader, PlainHost, StatusSink};
pub use monitor::{ConnectionEvents, ConnectionMonitor, MonitorConfig};
pub use transport::{ConnectionHandle, Transport, WsTransport};
