//! Connection detail panel.

use crate::app::App;
use crate::ui::theme;
use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Renders status, class, attempts and reload statistics.
pub fn render_connection_panel(frame: &mut Frame, area: Rect, app: &App) {
    let label = theme::dim_style();
    let last_reload = app
        .last_reload
        .map_or_else(|| "never".to_string(), format_time);

    let lines = vec![
        Line::from(vec![
            Span::styled("Status:      ", label),
            Span::styled(app.status.short_text(), theme::status_style(app.status.status)),
        ]),
        Line::from(vec![
            Span::styled("Class:       ", label),
            Span::raw(app.status.class),
        ]),
        Line::from(vec![
            Span::styled("Since:       ", label),
            Span::raw(format_time(app.status_since)),
        ]),
        Line::from(vec![
            Span::styled("Attempts:    ", label),
            Span::raw(app.connect_attempts.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Reloads:     ", label),
            Span::raw(app.reload_count.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Last reload: ", label),
            Span::raw(last_reload),
        ]),
    ];

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Connection "));

    frame.render_widget(panel, area);
}

/// Formats a timestamp as local wall-clock time.
pub fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}
