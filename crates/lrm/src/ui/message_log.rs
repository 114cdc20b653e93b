//! Message log panel: received payloads, newest first.

use crate::app::App;
use crate::ui::connection_panel::format_time;
use crate::ui::theme;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Renders the message log, highlighting reload signals.
pub fn render_message_log(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(" Messages ({}) ", app.messages.len());
    let block = Block::default().borders(Borders::ALL).title(title);

    if app.messages.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "Waiting for messages from the server...",
            theme::dim_style(),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let reload_style = Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD);

    let items: Vec<ListItem> = app
        .messages
        .iter()
        .map(|entry| {
            let payload_style = if entry.is_reload {
                reload_style
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", format_time(entry.received_at)), theme::dim_style()),
                Span::styled(entry.payload.clone(), payload_style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
