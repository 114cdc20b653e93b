//! Layout helpers for the lrm TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main application layout areas.
///
/// The TUI is divided into three vertical sections:
/// - Header (3 lines): Title and status line
/// - Content (fills remaining): connection panel (35%) and message log (65%)
/// - Footer (3 lines): Keybinding help
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    /// Header area for title and status
    pub header: Rect,
    /// Left panel for connection details
    pub connection_area: Rect,
    /// Right panel for the message log
    pub log_area: Rect,
    /// Footer area for keybindings
    pub footer: Rect,
}

impl AppLayout {
    /// Creates a new AppLayout by splitting the given area.
    pub fn new(area: Rect) -> Self {
        let [header, content, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(5),    // Content
                Constraint::Length(3), // Footer
            ])
            .areas(area);

        let [connection_area, log_area] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .areas(content);

        Self {
            header,
            connection_area,
            log_area,
            footer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_fills_area() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30));

        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.footer.height, 3);
        assert_eq!(layout.connection_area.height, 24);
        assert_eq!(layout.connection_area.width + layout.log_area.width, 100);
        assert_eq!(layout.connection_area.width, 35);
    }
}
