//! Header and footer status bar widgets for the lrm TUI.
//!
//! The status bar provides:
//! - Header: Application title, endpoint and the status line
//! - Footer: Keybinding hints

use crate::app::App;
use crate::ui::theme;
use lrm_core::StatusView;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Renders the header bar with title, endpoint and status line.
///
/// The border takes the status color so the state is visible at a glance.
pub fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let (status_text, status_style) = get_status_display(&app.status);

    let reloads = if app.reload_count > 0 {
        format!(
            " | {} reload{}",
            app.reload_count,
            if app.reload_count == 1 { "" } else { "s" }
        )
    } else {
        String::new()
    };

    let header_line = Line::from(vec![
        Span::styled(
            "lrm",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" - {} | ", app.endpoint)),
        Span::styled(status_text, status_style),
        Span::styled(reloads, theme::dim_style()),
    ]);

    let header = Paragraph::new(header_line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::status_color(app.status.status))),
    );

    frame.render_widget(header, area);
}

/// Renders the footer bar with keybinding hints.
pub fn render_footer(frame: &mut Frame, area: Rect) {
    let key_style = theme::key_style();
    let sep_style = theme::dim_style();

    let footer_line = Line::from(vec![
        Span::styled(" c", key_style),
        Span::raw(" clear log"),
        Span::styled("  |  ", sep_style),
        Span::styled("q", key_style),
        Span::raw(" quit"),
    ]);

    let footer = Paragraph::new(footer_line).block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

/// Returns the display text and style for a status view.
fn get_status_display(view: &StatusView) -> (&'static str, Style) {
    (view.short_text(), theme::status_style(view.status))
}
