//! Close codes from the WebSocket closing handshake (RFC 6455 §7.4).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric close code reported when a socket closes.
///
/// Only two codes are treated as intentional: 1000 (normal closure) and
/// 1001 (going away). Everything else means the session ended unexpectedly
/// and the monitor should try again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CloseCode(u16);

impl CloseCode {
    /// Normal closure.
    pub const NORMAL: CloseCode = CloseCode(1000);
    /// Endpoint going away (server shutdown, page navigation).
    pub const GOING_AWAY: CloseCode = CloseCode(1001);
    /// Protocol error.
    pub const PROTOCOL_ERROR: CloseCode = CloseCode(1002);
    /// Close frame without a status code.
    pub const NO_STATUS: CloseCode = CloseCode(1005);
    /// Connection dropped without a close frame. Never sent on the wire.
    pub const ABNORMAL: CloseCode = CloseCode(1006);
    /// Server hit an unexpected condition.
    pub const INTERNAL_ERROR: CloseCode = CloseCode(1011);
    /// Server restarting.
    pub const SERVICE_RESTART: CloseCode = CloseCode(1012);

    /// Wraps a raw code.
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the raw code.
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Returns true if no reconnect should follow this close.
    pub const fn is_terminal(self) -> bool {
        matches!(self.0, 1000 | 1001)
    }

    /// Human readable name for logs.
    pub const fn description(self) -> &'static str {
        match self.0 {
            1000 => "normal closure",
            1001 => "going away",
            1002 => "protocol error",
            1003 => "unsupported data",
            1005 => "no status received",
            1006 => "abnormal closure",
            1007 => "invalid payload",
            1008 => "policy violation",
            1009 => "message too big",
            1010 => "missing extension",
            1011 => "internal error",
            1012 => "service restart",
            1013 => "try again later",
            1015 => "TLS handshake failure",
            3000..=4999 => "application defined",
            _ => "unknown",
        }
    }
}

impl From<u16> for CloseCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.0
    }
}

impl fmt::Display for CloseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.description())
    }
}
