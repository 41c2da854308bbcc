//! Footer: keybindings on the left, year stamp on the right.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MUTED, C_SECONDARY};

const KEYS: &str = " ↑↓/jk move  Enter play  g/G first/last  Tab pane  ? help  q quit";

/// Right-hand footer text: `"© 2026 Episodes"`, or just the name before the
/// year has been stamped.
pub fn year_text(year: Option<i32>) -> String {
    match year {
        Some(y) => format!("© {} Episodes ", y),
        None => "Episodes ".to_string(),
    }
}

pub fn draw_footer(frame: &mut Frame, area: Rect, year: Option<i32>) {
    let right = year_text(year);
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(right.chars().count() as u16),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(KEYS, Style::default().fg(C_MUTED)))),
        halves[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            right,
            Style::default().fg(C_SECONDARY).add_modifier(Modifier::DIM),
        ))),
        halves[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_text() {
        assert_eq!(year_text(Some(2026)), "© 2026 Episodes ");
        assert_eq!(year_text(None), "Episodes ");
    }
}
