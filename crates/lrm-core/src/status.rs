//! Connection status state machine and its rendered form.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every status line.
pub const STATUS_PREFIX: &str = "WebSocket Status: ";

// ============================================================================
// Connection Status
// ============================================================================

/// Lifecycle state of the live-reload connection.
///
/// ```text
///              open              close
/// Connecting ───────► Connected ───────► Disconnected
///     │                   │                  ▲   │
///     │ error             │ error     close  │   │ reconnect timer
///     └──────► Error ◄────┘ ─────────────────┘   │ (non-terminal codes)
///                                                ▼
///                                           Connecting
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// A connection attempt is in flight.
    #[default]
    Connecting,

    /// The socket is open.
    Connected,

    /// The socket closed.
    Disconnected,

    /// The transport reported an error. A close always follows.
    Error,
}

impl ConnectionStatus {
    /// Short lowercase name, also used as the CSS-style class suffix.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Error => "error",
        }
    }

    /// Text written to the status display for this state.
    pub const fn text(&self) -> &'static str {
        match self {
            Self::Connecting => "WebSocket Status: Connecting...",
            Self::Connected => "WebSocket Status: Connected!",
            Self::Disconnected => "WebSocket Status: Disconnected. Reconnecting...",
            Self::Error => "WebSocket Status: Error. Reconnecting...",
        }
    }

    /// Class name written to the status display for this state.
    pub const fn class(&self) -> &'static str {
        match self {
            Self::Connecting => "status connecting",
            Self::Connected => "status connected",
            Self::Disconnected => "status disconnected",
            Self::Error => "status error",
        }
    }

    /// Returns the rendered view of this state.
    pub const fn view(self) -> StatusView {
        StatusView {
            status: self,
            text: self.text(),
            class: self.class(),
        }
    }

    /// Returns true if moving from `self` to `next` is an expected edge.
    ///
    /// Besides the primary lifecycle, these edges are accepted:
    /// `Connecting -> Disconnected` (handshake answered with a close), and
    /// `Connected -> Connecting` or `Error -> Connecting` (restart after a
    /// reload, which applies in any state).
    pub const fn can_transition_to(&self, next: ConnectionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Connecting, Self::Connected)
                | (Self::Connecting, Self::Error)
                | (Self::Connecting, Self::Disconnected)
                | (Self::Connected, Self::Disconnected)
                | (Self::Connected, Self::Error)
                | (Self::Connected, Self::Connecting)
                | (Self::Error, Self::Disconnected)
                | (Self::Error, Self::Connecting)
                | (Self::Disconnected, Self::Connecting)
        )
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Status View
// ============================================================================

/// What a status sink displays: the text and the class name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusView {
    /// State this view was rendered from.
    pub status: ConnectionStatus,
    /// Full status line.
    pub text: &'static str,
    /// Space-separated class list, always starting with `status`.
    pub class: &'static str,
}

impl StatusView {
    /// Status line with the common prefix removed.
    pub fn short_text(&self) -> &'static str {
        self.text.strip_prefix(STATUS_PREFIX).unwrap_or(self.text)
    }
}

impl Default for StatusView {
    fn default() -> Self {
        ConnectionStatus::default().view()
    }
}
