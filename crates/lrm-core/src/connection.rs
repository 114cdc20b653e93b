//! Connection identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generation number of a connection handle.
///
/// Every call to `connect()` allocates the next id. Lifecycle events are
/// tagged with the id of the handle that produced them so the monitor can
/// drop events from handles it has already torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates an id from a raw generation number.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw generation number.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
