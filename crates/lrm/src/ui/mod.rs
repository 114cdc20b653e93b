//! UI rendering module for the lrm TUI.
//!
//! # Layout Structure
//!
//! ```text
//! +--------------------------------------------------+
//! |  Header: Title, endpoint and status line         |  <- 3 lines
//! +----------------+---------------------------------+
//! | Connection     |  Messages                       |  <- fills remaining
//! | (35%)          |  (65%)                          |
//! |  Status: ...   |  12:00:01 reload                |
//! |  Reloads: 3    |  12:00:00 hello                 |
//! +----------------+---------------------------------+
//! |  Footer: Keybinding Hints                        |  <- 3 lines
//! +--------------------------------------------------+
//! ```

pub mod connection_panel;
pub mod layout;
pub mod message_log;
pub mod status_bar;
pub mod theme;

use crate::app::App;
use layout::AppLayout;
use ratatui::Frame;

pub use connection_panel::render_connection_panel;
pub use message_log::render_message_log;
pub use status_bar::{render_footer, render_header};

/// Renders the complete TUI interface.
///
/// # Example
///
/// ```ignore
/// terminal.draw(|frame| {
///     ui::render(frame, &app);
/// })?;
/// ```
pub fn render(frame: &mut Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    render_header(frame, layout.header, app);
    render_footer(frame, layout.footer);
    render_connection_panel(frame, layout.connection_area, app);
    render_message_log(frame, layout.log_area, app);
}
