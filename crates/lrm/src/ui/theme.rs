//! Shared theme utilities for the lrm TUI.
//!
//! Provides consistent styling across all UI components.

use lrm_core::ConnectionStatus;
use ratatui::style::{Color, Modifier, Style};

/// Returns the color for a connection status.
///
/// Color coding:
/// - Green: Connected
/// - Yellow: Connecting
/// - Red: Disconnected or Error
pub fn status_color(status: ConnectionStatus) -> Color {
    match status {
        ConnectionStatus::Connected => Color::Green,
        ConnectionStatus::Connecting => Color::Yellow,
        ConnectionStatus::Disconnected | ConnectionStatus::Error => Color::Red,
    }
}

/// Bold style in the status color.
pub fn status_style(status: ConnectionStatus) -> Style {
    Style::default()
        .fg(status_color(status))
        .add_modifier(Modifier::BOLD)
}

/// Style for key hints in the footer.
pub fn key_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

/// Style for labels and separators.
pub fn dim_style() -> Style {
    Style::default().fg(Color::DarkGray)
}
