//! Host capabilities the monitor drives: the status display and the page.
//!
//! In a browser these are a DOM element and `location.reload()`. Here the
//! hosting application supplies them:
//! - `ChannelHost` forwards both to the TUI event loop
//! - `PlainHost` prints status lines to stdout for non-interactive use

use std::io::Write;

use chrono::Local;
use lrm_core::StatusView;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::input::Event;

// ============================================================================
// Capabilities
// ============================================================================

/// Receives the status text and class on every status transition.
pub trait StatusSink: Send {
    /// Replaces the displayed status.
    fn render(&mut self, view: &StatusView);

    /// Called with every inbound payload, after it has been classified.
    fn message_received(&mut self, _payload: &str) {}
}

/// Performs a full page reload.
pub trait PageReloader: Send {
    /// Reloads the page.
    fn reload(&mut self);
}

// ============================================================================
// Channel Host
// ============================================================================

/// Forwards status updates and reloads to the TUI event loop.
#[derive(Debug, Clone)]
pub struct ChannelHost {
    event_tx: mpsc::UnboundedSender<Event>,
}

impl ChannelHost {
    /// Creates a host that sends on `event_tx`.
    pub fn new(event_tx: mpsc::UnboundedSender<Event>) -> Self {
        Self { event_tx }
    }
}

impl StatusSink for ChannelHost {
    fn render(&mut self, view: &StatusView) {
        // Ignore send errors - TUI may be shutting down
        let _ = self.event_tx.send(Event::Status(*view));
    }

    fn message_received(&mut self, payload: &str) {
        let _ = self.event_tx.send(Event::Message(payload.to_string()));
    }
}

impl PageReloader for ChannelHost {
    fn reload(&mut self) {
        let _ = self.event_tx.send(Event::Reload);
    }
}

// ============================================================================
// Plain Host
// ============================================================================

/// Writes one line per status change or reload to a writer.
pub struct PlainHost<W: Write + Send> {
    out: W,
    on_reload: Option<String>,
    reloads: u64,
}

impl PlainHost<std::io::Stdout> {
    /// Creates a host printing to stdout.
    pub fn stdout(on_reload: Option<String>) -> Self {
        Self::new(std::io::stdout(), on_reload)
    }
}

impl<W: Write + Send> PlainHost<W> {
    /// Creates a host printing to `out`, running `on_reload` on each reload.
    pub fn new(out: W, on_reload: Option<String>) -> Self {
        Self {
            out,
            on_reload,
            reloads: 0,
        }
    }

    /// Number of reloads performed so far.
    pub fn reloads(&self) -> u64 {
        self.reloads
    }

    /// Consumes the host, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        let stamp = Local::now().format("%H:%M:%S");
        if let Err(e) = writeln!(self.out, "[{stamp}] {text}").and_then(|()| self.out.flush()) {
            warn!(error = %e, "Failed to write status line");
        }
    }
}

impl<W: Write + Send> StatusSink for PlainHost<W> {
    fn render(&mut self, view: &StatusView) {
        self.line(view.text);
    }
}

impl<W: Write + Send> PageReloader for PlainHost<W> {
    fn reload(&mut self) {
        self.reloads = self.reloads.saturating_add(1);
        let text = format!("Reloading page... (reload #{})", self.reloads);
        self.line(&text);
        if let Some(command) = &self.on_reload {
            spawn_reload_command(command);
        }
    }
}

// ============================================================================
// Reload Command
// ============================================================================

/// Runs `command` through `sh -c` in the background.
///
/// The exit status is logged; failures never reach the monitor.
pub fn spawn_reload_command(command: &str) {
    let command = command.to_string();
    tokio::spawn(async move {
        debug!(command = %command, "Running reload command");
        match Command::new("sh").arg("-c").arg(&command).status().await {
            Ok(status) if status.success() => {
                info!(command = %command, "Reload command finished");
            }
            Ok(status) => {
                warn!(command = %command, code = ?status.code(), "Reload command failed");
            }
            Err(e) => {
                warn!(command = %command, error = %e, "Failed to spawn reload command");
            }
        }
    });
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use lrm_core::ConnectionStatus;

    #[test]
    fn test_channel_host_forwards_status() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut host = ChannelHost::new(tx);

        host.render(&ConnectionStatus::Connected.view());

        match rx.try_recv().unwrap() {
            Event::Status(view) => assert_eq!(view.class, "status connected"),
            other => panic!("Expected Status event, got {other:?}"),
        }
    }

    #[test]
    fn test_channel_host_forwards_reload_and_messages() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut host = ChannelHost::new(tx);

        host.message_received("hello");
        host.reload();

        assert!(matches!(rx.try_recv().unwrap(), Event::Message(m) if m == "hello"));
        assert!(matches!(rx.try_recv().unwrap(), Event::Reload));
    }

    #[test]
    fn test_channel_host_survives_closed_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut host = ChannelHost::new(tx);

        // Must not panic
        host.render(&ConnectionStatus::Error.view());
        host.reload();
    }

    #[test]
    fn test_plain_host_writes_status_lines() {
        let mut host = PlainHost::new(Vec::new(), None);

        host.render(&ConnectionStatus::Connected.view());
        host.render(&ConnectionStatus::Disconnected.view());

        let output = String::from_utf8(host.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.first().unwrap().ends_with("WebSocket Status: Connected!"));
        assert!(lines
            .get(1)
            .unwrap()
            .ends_with("WebSocket Status: Disconnected. Reconnecting..."));
    }

    #[test]
    fn test_plain_host_counts_reloads() {
        let mut host = PlainHost::new(Vec::new(), None);

        host.reload();
        host.reload();

        assert_eq!(host.reloads(), 2);
        let output = String::from_utf8(host.into_inner()).unwrap();
        assert!(output.contains("reload #2"));
    }

    #[test]
    fn test_plain_host_ignores_messages() {
        let mut host = PlainHost::new(Vec::new(), None);
        host.message_received("noise");
        assert!(host.into_inner().is_empty());
    }

    /// Polls until `path` exists or two seconds pass.
    async fn wait_for_file(path: &std::path::Path) -> bool {
        for _ in 0..200 {
            if path.exists() {
                return true;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        path.exists()
    }

    #[tokio::test]
    async fn test_plain_host_runs_reload_command() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("reloaded");
        let command = format!("touch '{}'", marker.display());
        let mut host = PlainHost::new(Vec::new(), Some(command));

        host.reload();

        assert!(wait_for_file(&marker).await, "reload command did not run");
        assert_eq!(host.reloads(), 1);
    }

    #[tokio::test]
    async fn test_reload_command_runs_through_shell() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("piped");

        spawn_reload_command(&format!("echo reload > '{}'", marker.display()));

        assert!(wait_for_file(&marker).await);
        // The file appears before the shell finishes writing to it.
        for _ in 0..200 {
            if std::fs::read_to_string(&marker).unwrap_or_default() == "reload\n" {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("command output never arrived");
    }

    #[tokio::test]
    async fn test_failing_reload_command_is_contained() {
        let mut host = PlainHost::new(Vec::new(), Some("exit 3".to_string()));

        host.reload();
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        assert_eq!(host.reloads(), 1);
        let output = String::from_utf8(host.into_inner()).unwrap();
        assert!(output.contains("reload #1"));
    }
}
