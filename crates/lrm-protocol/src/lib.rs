//! lrm Protocol - Wire contract for the live-reload socket
//!
//! This crate describes everything the monitor needs to know about the
//! other end of the socket: where it lives, which payload means "reload",
//! and which close codes end the session on purpose.

pub mod close;
pub mod endpoint;
pub mod signal;

pub use close::CloseCode;
pub use endpoint::{Endpoint, EndpointError, DEFAULT_ENDPOINT};
pub use signal::{InboundSignal, RELOAD_SIGNAL};
