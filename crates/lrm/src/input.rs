//! Keyboard input handling for the lrm TUI.
//!
//! This module provides event types and handlers for keyboard input,
//! terminal resizing, and monitor notifications.
//!
//! All code follows the panic-free policy: no `.unwrap()`, `.expect()`,
//! `panic!()`, `unreachable!()`, `todo!()`, or direct indexing `[i]`.

use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lrm_core::StatusView;

// ============================================================================
// Event Types
// ============================================================================

/// Events that the TUI can receive and process.
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input from the user.
    Key(KeyEvent),

    /// Terminal window resize event.
    Resize(u16, u16),

    /// The monitor changed the status display.
    Status(StatusView),

    /// A payload arrived from the server.
    Message(String),

    /// The server asked for a page reload.
    Reload,
}

// ============================================================================
// Action Types
// ============================================================================

/// Actions that can result from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action required.
    None,

    /// Quit the application.
    Quit,
}

// ============================================================================
// Input Handler
// ============================================================================

/// Handles a keyboard event and updates application state accordingly.
///
/// # Key Bindings
///
/// | Key          | Action                              |
/// |--------------|-------------------------------------|
/// | `q`, `Q`     | Quit the application                |
/// | `Esc`        | Quit the application                |
/// | `Ctrl+C`     | Quit the application                |
/// | `c`, `C`     | Clear the message log               |
#[must_use]
pub fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            app.quit();
            Action::Quit
        }

        KeyCode::Char('c') | KeyCode::Char('C') => {
            app.clear_messages();
            Action::None
        }

        _ => Action::None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn key_with_ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc] {
            let mut app = App::new("ws://localhost:3000/ws");
            assert_eq!(handle_key_event(key(code), &mut app), Action::Quit);
            assert!(app.should_quit);
        }
    }

    #[test]
    fn test_ctrl_c_quits_instead_of_clearing() {
        let mut app = App::new("ws://localhost:3000/ws");
        app.record_message("keep me".to_string());

        let action = handle_key_event(key_with_ctrl(KeyCode::Char('c')), &mut app);

        assert_eq!(action, Action::Quit);
        assert!(app.should_quit);
        assert_eq!(app.messages.len(), 1);
    }

    #[test]
    fn test_c_clears_messages() {
        let mut app = App::new("ws://localhost:3000/ws");
        app.record_message("one".to_string());
        app.record_message("two".to_string());

        let action = handle_key_event(key(KeyCode::Char('c')), &mut app);

        assert_eq!(action, Action::None);
        assert!(app.messages.is_empty());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_unbound_key_does_nothing() {
        let mut app = App::new("ws://localhost:3000/ws");
        assert_eq!(handle_key_event(key(KeyCode::Char('x')), &mut app), Action::None);
        assert!(!app.should_quit);
    }
}
