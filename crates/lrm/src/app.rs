//! Application state for the lrm TUI.
//!
//! The TUI only mirrors what the monitor reports: the latest status view,
//! the payloads received, and the reloads performed.
//!
//! All code follows the panic-free policy: no `.unwrap()`, `.expect()`,
//! `panic!()`, `unreachable!()`, `todo!()`, or direct indexing `[i]`.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use lrm_core::{ConnectionStatus, StatusView};
use lrm_protocol::InboundSignal;

/// Number of payloads kept in the message log.
pub const MAX_MESSAGES: usize = 200;

// ============================================================================
// Message Log
// ============================================================================

/// One received payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// When the payload arrived.
    pub received_at: DateTime<Utc>,
    /// The payload text.
    pub payload: String,
    /// Whether this payload was the reload signal.
    pub is_reload: bool,
}

// ============================================================================
// Application
// ============================================================================

/// Core application state for the lrm TUI.
#[derive(Debug, Clone)]
pub struct App {
    /// Endpoint being watched, for display.
    pub endpoint: String,

    /// Most recent status view.
    pub status: StatusView,

    /// When the status last changed.
    pub status_since: DateTime<Utc>,

    /// Received payloads, newest first.
    pub messages: VecDeque<LogEntry>,

    /// Number of reloads performed.
    pub reload_count: u64,

    /// When the last reload happened.
    pub last_reload: Option<DateTime<Utc>>,

    /// Number of connection attempts seen.
    pub connect_attempts: u64,

    /// Flag indicating the application should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates a new App in the Connecting state.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            status: StatusView::default(),
            status_since: Utc::now(),
            messages: VecDeque::with_capacity(MAX_MESSAGES),
            reload_count: 0,
            last_reload: None,
            connect_attempts: 0,
            should_quit: false,
        }
    }

    /// Replaces the displayed status.
    pub fn apply_status(&mut self, view: StatusView) {
        if view.status == ConnectionStatus::Connecting {
            self.connect_attempts = self.connect_attempts.saturating_add(1);
        }
        if view != self.status {
            self.status_since = Utc::now();
        }
        self.status = view;
    }

    /// Adds a payload to the top of the message log.
    pub fn record_message(&mut self, payload: String) {
        let is_reload = InboundSignal::parse(&payload).is_reload();
        self.messages.push_front(LogEntry {
            received_at: Utc::now(),
            payload,
            is_reload,
        });
        self.messages.truncate(MAX_MESSAGES);
    }

    /// Records a page reload.
    pub fn record_reload(&mut self) {
        self.reload_count = self.reload_count.saturating_add(1);
        self.last_reload = Some(Utc::now());
    }

    /// Empties the message log.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    /// Requests application exit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

// ============================================================================
// Tests
// ============================================================================
