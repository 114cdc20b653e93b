//! Inbound payload classification.

/// The only payload with a meaning.
pub const RELOAD_SIGNAL: &str = "reload";

/// A text payload received from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundSignal<'a> {
    /// Exactly `reload`.
    Reload,
    /// Anything else. Logged, never acted on.
    Other(&'a str),
}

impl<'a> InboundSignal<'a> {
    /// Classifies a payload. The comparison is exact: no trimming, no case folding.
    pub fn parse(payload: &'a str) -> Self {
        if payload == RELOAD_SIGNAL {
            Self::Reload
        } else {
            Self::Other(payload)
        }
    }

    /// Returns true for the reload signal.
    pub fn is_reload(&self) -> bool {
        matches!(self, Self::Reload)
    }
}
