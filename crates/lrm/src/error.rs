//! Error types for lrm.
//!
//! This module defines the errors that can occur during terminal
//! initialization, settings loading, and monitor setup.
//!
//! Transport failures are deliberately absent: a broken socket is a
//! lifecycle event reported through the status display, never an `Err`.
//!
//! **Panic-Free Policy:** This module follows the project's panic-free guidelines.
//! No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, or `todo!()`.

use std::io;
use std::path::PathBuf;

use lrm_protocol::EndpointError;
use thiserror::Error;

// ============================================================================
// TUI Error Type
// ============================================================================

/// lrm application errors.
///
/// # Example
///
/// ```rust,ignore
/// use lrm_tui::error::{TuiError, Result};
///
/// fn load() -> Result<()> {
///     Err(TuiError::Config("reconnect_delay_ms must be positive".to_string()))
/// }
/// ```
#[derive(Error, Debug)]
pub enum TuiError {
    /// Failed to initialize the terminal.
    ///
    /// Common causes include running in a non-TTY environment (pipes,
    /// scripts). Use `--plain` there.
    #[error("Failed to initialize terminal: {0}")]
    TerminalInit(String),

    /// Failed to cleanup/restore the terminal.
    ///
    /// The terminal may be left in an inconsistent state; running `reset`
    /// can help recover.
    #[error("Failed to restore terminal: {0}")]
    TerminalCleanup(String),

    /// Settings are present but unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A settings file could not be read or parsed.
    #[error("Failed to load settings from {path}: {reason}")]
    SettingsFile {
        /// File that failed to load.
        path: PathBuf,
        /// Read or parse error.
        reason: String,
    },

    /// The configured endpoint is not a usable `ws://` URL.
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] EndpointError),

    /// I/O error passthrough.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Convenience Result type alias for lrm operations.
pub type Result<T> = std::result::Result<T, TuiError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_init_error_display() {
        let error = TuiError::TerminalInit("not a TTY".to_string());
        let display = format!("{error}");
        assert!(display.contains("Failed to initialize terminal"));
        assert!(display.contains("not a TTY"));
    }

    #[test]
    fn test_terminal_cleanup_error_display() {
        let error = TuiError::TerminalCleanup("could not restore cursor".to_string());
        assert!(format!("{error}").contains("Failed to restore terminal"));
    }

    #[test]
    fn test_settings_file_error_display() {
        let error = TuiError::SettingsFile {
            path: PathBuf::from("/etc/lrm.toml"),
            reason: "expected `=`".to_string(),
        };
        let display = format!("{error}");
        assert!(display.contains("/etc/lrm.toml"));
        assert!(display.contains("expected `=`"));
    }

    #[test]
    fn test_endpoint_error_from_conversion() {
        let error: TuiError = EndpointError::UnsupportedScheme("wss".to_string()).into();
        assert!(matches!(error, TuiError::Endpoint(_)));
        assert!(format!("{error}").contains("Invalid endpoint"));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "log dir missing");
        let error: TuiError = io_error.into();
        assert!(matches!(error, TuiError::Io(_)));
        assert!(format!("{error}").contains("IO error"));
    }
}
