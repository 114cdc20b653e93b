//! lrm Core - Shared types for live-reload connection monitoring
//!
//! This crate provides the domain types shared between the wire
//! protocol (lrm-protocol) and the monitor/TUI (lrm).
//!
//! All code follows the panic-free policy: no `.unwrap()`, `.expect()`,
//! `panic!()`, `unreachable!()`, `todo!()`, or direct indexing `[i]`.

pub mod connection;
pub mod status;

// Re-exports for convenience
pub use connection::ConnectionId;
pub use status::{ConnectionStatus, StatusView};
