//! Error banner: one full-width row shown when the catalog can't be used.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_BANNER_BG, C_BANNER_FG};

/// Rows the banner needs: one when there is a message, none otherwise.
pub fn banner_height(message: Option<&str>) -> u16 {
    u16::from(message.is_some())
}

pub fn draw_error_banner(frame: &mut Frame, area: Rect, message: &str) {
    if area.height == 0 {
        return;
    }
    let style = Style::default().fg(C_BANNER_FG).bg(C_BANNER_BG);
    let line = Line::from(vec![
        Span::styled(" ✗ ", style.add_modifier(Modifier::BOLD)),
        Span::styled(message, style),
    ]);
    frame.render_widget(Paragraph::new(line).style(style), area);
}
