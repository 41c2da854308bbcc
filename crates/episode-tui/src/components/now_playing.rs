//! NowPlaying component: right pane with the active episode's details.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_muted, style_secondary, C_LINK, C_MUTED, C_PRIMARY, C_TAG},
    widgets::pane_chrome::pane_chrome,
};

#[derive(Default)]
pub struct NowPlaying {
    scroll: u16,
}

impl NowPlaying {
    pub fn new() -> Self {
        Self::default()
    }

    fn detail_lines(state: &AppState) -> Vec<Line<'_>> {
        let surface = &state.surface;
        let label = |text: &'static str| Span::styled(format!("{:<8}", text), style_muted());

        let mut lines = vec![
            Line::from(Span::styled(
                surface.title.as_str(),
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        if let Some(card) = state.active_card() {
            let mut meta = vec![
                label("episode"),
                Span::styled(card.meta_number.as_str(), Style::default().fg(C_TAG)),
            ];
            if !card.meta_duration.is_empty() {
                meta.push(Span::styled(format!("  {}", card.meta_duration), style_secondary()));
            }
            lines.push(Line::from(meta));
        }

        if let Some(src) = surface.media_source.as_deref() {
            lines.push(Line::from(vec![
                label("source"),
                Span::styled(src, Style::default().fg(C_LINK)),
            ]));
        }

        if let Some(card) = state.active_card() {
            lines.push(Line::from(vec![
                label("thumb"),
                Span::styled(card.thumbnail.as_str(), Style::default().fg(C_LINK)),
            ]));
            lines.push(Line::from(vec![
                label(""),
                Span::styled(card.thumbnail_alt.as_str(), style_muted()),
            ]));
        }

        if !surface.description.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                surface.description.as_str(),
                style_secondary(),
            )));
        }

        lines
    }
}

impl Component for NowPlaying {
    fn id(&self) -> ComponentId {
        ComponentId::NowPlaying
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            MouseEventKind::ScrollDown => self.scroll = self.scroll.saturating_add(1),
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::SelectEpisode(_) | Action::CardsRendered = action {
            self.scroll = 0;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome("now playing", Some('2'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if state.active_card().is_none() {
            frame.render_widget(
                Paragraph::new(" nothing selected").style(Style::default().fg(C_MUTED)),
                inner,
            );
            return;
        }

        let lines = Self::detail_lines(state);
        // Keep at least the last line on screen
        let max_scroll = (lines.len() as u16).saturating_sub(1);
        self.scroll = self.scroll.min(max_scroll);

        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            inner,
        );
    }
}
