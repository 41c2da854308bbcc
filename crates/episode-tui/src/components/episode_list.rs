//! EpisodeList component: left pane, one three-row card per episode.
//!
//! The cursor (what Enter would play) is separate from the active card
//! (what is playing).  Enter or a click turns the cursor card into a
//! `SelectEpisode` action; the controller decides what becomes active.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use episode_tui::{EpisodeCard, EpisodeId};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        style_active_title, style_cursor, style_muted, style_secondary, C_ACTIVE, C_BADGE_ERR,
        C_BADGE_PENDING, C_PRIMARY, C_TAG,
    },
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
        text::fit_width,
    },
};

/// Rows per card: meta, title, description.
const CARD_HEIGHT: u16 = 3;

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub struct EpisodeList {
    list: ScrollableList,
    /// Cards that fit in the last drawn area.
    capacity: usize,
    spinner: usize,
}

impl EpisodeList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            capacity: 1,
            spinner: 0,
        }
    }

    fn sync_len(&mut self, state: &AppState) {
        self.list.set_len(state.surface.cards.len());
    }

    fn cursor_card<'a>(&self, state: &'a AppState) -> Option<&'a EpisodeCard> {
        state.surface.cards.get(self.list.selected)
    }

    fn select_cursor(&self, state: &AppState) -> Vec<Action> {
        self.cursor_card(state)
            .map(|card| vec![Action::SelectEpisode(card.id)])
            .unwrap_or_default()
    }

    fn card_item(card: &EpisodeCard, is_cursor: bool, width: usize) -> ListItem<'static> {
        let text_width = width.saturating_sub(2);

        let (marker, marker_style) = if card.active {
            ("▶ ", Style::default().fg(C_ACTIVE))
        } else {
            ("  ", Style::default())
        };
        let mut meta = vec![
            Span::styled(marker, marker_style),
            Span::styled(card.meta_number.clone(), Style::default().fg(C_TAG)),
        ];
        if !card.meta_duration.is_empty() {
            meta.push(Span::styled("  ", Style::default()));
            meta.push(Span::styled(card.meta_duration.clone(), style_secondary()));
        }

        let title_style = if card.active {
            style_active_title()
        } else {
            Style::default().fg(C_PRIMARY)
        };

        let lines = vec![
            Line::from(meta),
            Line::from(vec![
                Span::raw("  "),
                Span::styled(fit_width(&card.title, text_width), title_style),
            ]),
            Line::from(vec![
                Span::raw("  "),
                Span::styled(fit_width(&card.description, text_width), style_secondary()),
            ]),
        ];

        let item = ListItem::new(lines);
        if is_cursor {
            item.style(style_cursor())
        } else {
            item
        }
    }
}

impl Component for EpisodeList {
    fn id(&self) -> ComponentId {
        ComponentId::EpisodeList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        self.sync_len(state);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::PageUp => self.list.select_up(self.capacity.max(1)),
            KeyCode::PageDown => self.list.select_down(self.capacity.max(1)),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter | KeyCode::Char(' ') => return self.select_cursor(state),
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action> {
        self.sync_len(state);
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                // Inside the border only
                let top = area.y + 1;
                let bottom = area.y + area.height.saturating_sub(1);
                if event.row < top || event.row >= bottom {
                    return vec![];
                }
                let slot = ((event.row - top) / CARD_HEIGHT) as usize;
                if self.list.handle_click(slot).is_some() {
                    return self.select_cursor(state);
                }
            }
            _ => {}
        }
        vec![]
    }

    fn tick(&mut self, state: &AppState) -> Vec<Action> {
        if state.loading {
            self.spinner = (self.spinner + 1) % SPINNER_FRAMES.len();
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        match action {
            Action::CardsRendered => {
                self.sync_len(state);
                self.list.select_first();
            }
            Action::SelectEpisode(EpisodeId(idx)) => {
                self.sync_len(state);
                self.list.set_selected(*idx);
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.sync_len(state);

        let badge = if state.loading {
            Some(Badge {
                text: "LOADING",
                color: C_BADGE_PENDING,
            })
        } else if state.surface.error_banner.is_some() {
            Some(Badge {
                text: "ERR",
                color: C_BADGE_ERR,
            })
        } else {
            None
        };

        let title = format!("episodes · {}", state.source_label);
        let mut block = pane_chrome(&title, Some('1'), focused, badge);
        if let Some(card) = self.cursor_card(state) {
            let max = area.width.saturating_sub(4) as usize;
            block = block.title_bottom(Line::from(Span::styled(
                format!(" {} ", fit_width(&card.label, max.saturating_sub(2))),
                style_secondary(),
            )));
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            let text = if state.loading {
                format!(" {} loading {}", SPINNER_FRAMES[self.spinner], state.source_label)
            } else {
                " no episodes".to_string()
            };
            frame.render_widget(Paragraph::new(text).style(style_muted()), inner);
            return;
        }

        self.capacity = (inner.height / CARD_HEIGHT).max(1) as usize;
        self.list.ensure_visible(self.capacity);

        let width = inner.width as usize;
        let items: Vec<ListItem> = self
            .list
            .visible_range(self.capacity)
            .filter_map(|idx| state.surface.cards.get(idx).map(|c| (idx, c)))
            .map(|(idx, card)| Self::card_item(card, idx == self.list.selected, width))
            .collect();
        frame.render_widget(List::new(items), inner);
    }
}
