//! App: component-based event loop.
//!
//! - `App` owns the components and `AppState` (read-only for components).
//! - A `tokio::mpsc` channel carries `AppMessage`s in from the terminal
//!   reader and the catalog fetch.
//! - The loop draws a frame, then awaits the next message or UI tick.
//! - Components return `Vec<Action>`; the App dispatches each one.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use episode_proto::{load_catalog, Catalog, CatalogSource, LoadError};
use episode_tui::{apply_catalog, stamp_year, LoadOutcome, SelectionController};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{episode_list::EpisodeList, help_overlay::HelpOverlay, now_playing::NowPlaying},
    theme::C_BG,
    widgets::{
        error_banner::{banner_height, draw_error_banner},
        status_bar::draw_footer,
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    /// The one-shot catalog fetch finished.
    CatalogLoaded(Result<Catalog, LoadError>),
}

/// Last-drawn rects for mouse hit-testing.
#[derive(Default, Clone, Copy)]
struct PaneAreas {
    episode_list: Rect,
    now_playing: Rect,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub state: AppState,
    controller: SelectionController,
    source: CatalogSource,

    episode_list: EpisodeList,
    now_playing: NowPlaying,
    help_overlay: HelpOverlay,

    focus: ComponentId,
    pane_areas: PaneAreas,
    should_quit: bool,
}

impl App {
    pub fn new(state: AppState, source: CatalogSource) -> Self {
        Self {
            state,
            controller: SelectionController::new(),
            source,
            episode_list: EpisodeList::new(),
            now_playing: NowPlaying::new(),
            help_overlay: HelpOverlay::new(),
            focus: ComponentId::EpisodeList,
            pane_areas: PaneAreas::default(),
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Bootstrap: year stamp, then fetch in the background ───────────────
        stamp_year(&mut self.state.surface);
        self.state.loading = true;
        info!("bootstrap: loading catalog from {}", self.source);
        let load_tx = tx.clone();
        let source = self.source.clone();
        tokio::spawn(async move {
            let result = load_catalog(&source).await;
            let _ = load_tx.send(AppMessage::CatalogLoaded(result)).await;
        });
        drop(tx);

        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        loop {
            terminal.draw(|f| self.draw(f))?;

            if self.should_quit {
                break;
            }

            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(msg) => self.handle_message(msg),
                    None => break,
                },
                _ = ui_tick.tick() => {
                    let mut actions = self.episode_list.tick(&self.state);
                    actions.extend(self.now_playing.tick(&self.state));
                    for a in actions {
                        self.dispatch(a);
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                for a in self.handle_key(key) {
                    self.dispatch(a);
                }
            }
            AppMessage::Event(Event::Mouse(mouse)) => {
                for a in self.handle_mouse(mouse) {
                    self.dispatch(a);
                }
            }
            AppMessage::Event(_) => {}
            AppMessage::CatalogLoaded(result) => {
                self.state.loading = false;
                let outcome = apply_catalog(&mut self.state.surface, &self.controller, result);
                if let LoadOutcome::Rendered(_) = outcome {
                    self.dispatch(Action::CardsRendered);
                }
            }
        }
    }

    // ── Input routing ─────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        // Global keys
        match key.code {
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return vec![Action::Quit];
            }
            KeyCode::Char('q') if !self.help_overlay.visible => return vec![Action::Quit],
            KeyCode::Char('?') if !self.help_overlay.visible => return vec![Action::ToggleHelp],
            _ => {}
        }

        // Help overlay captures all keys when visible
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => return vec![Action::FocusNext],
            KeyCode::Char('1') => return vec![Action::FocusPane(ComponentId::EpisodeList)],
            KeyCode::Char('2') => return vec![Action::FocusPane(ComponentId::NowPlaying)],
            _ => {}
        }

        match self.focus {
            ComponentId::EpisodeList => self.episode_list.handle_key(key, &self.state),
            ComponentId::NowPlaying => self.now_playing.handle_key(key, &self.state),
            ComponentId::HelpOverlay => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_click = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click || self.help_overlay.visible {
            return vec![];
        }

        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }

        let (col, row) = (event.column, event.row);
        let areas = self.pane_areas;

        let (id, mut actions) = if hit(areas.episode_list, col, row) {
            (
                ComponentId::EpisodeList,
                self.episode_list
                    .handle_mouse(event, areas.episode_list, &self.state),
            )
        } else if hit(areas.now_playing, col, row) {
            (
                ComponentId::NowPlaying,
                self.now_playing
                    .handle_mouse(event, areas.now_playing, &self.state),
            )
        } else {
            return vec![];
        };

        // Focus follows the click
        if self.focus != id {
            actions.insert(0, Action::FocusPane(id));
        }
        actions
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        debug!("dispatch: {:?}", action);

        // Selection first so components see the new active card
        self.apply_action(&action);

        let s = &self.state;
        let mut secondary = Vec::new();
        secondary.extend(self.episode_list.on_action(&action, s));
        secondary.extend(self.now_playing.on_action(&action, s));
        secondary.extend(self.help_overlay.on_action(&action, s));

        // Depth-limited to one level
        for a in secondary {
            self.apply_action(&a);
        }
    }

    fn apply_action(&mut self, action: &Action) {
        match action {
            Action::SelectEpisode(id) => {
                self.controller.select(&mut self.state.surface, *id);
            }
            Action::CardsRendered | Action::ToggleHelp => {}
            Action::FocusNext => {
                self.focus = match self.focus {
                    ComponentId::EpisodeList => ComponentId::NowPlaying,
                    _ => ComponentId::EpisodeList,
                };
            }
            Action::FocusPane(id) => self.focus = *id,
            Action::Quit => self.should_quit = true,
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let banner = self.state.surface.error_banner.clone();
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(banner_height(banner.as_deref())),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        if let Some(msg) = banner.as_deref() {
            draw_error_banner(frame, outer[0], msg);
        }

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(outer[1]);

        self.pane_areas = PaneAreas {
            episode_list: body[0],
            now_playing: body[1],
        };

        let focus = self.focus;
        self.episode_list
            .draw(frame, body[0], focus == ComponentId::EpisodeList, &self.state);
        self.now_playing
            .draw(frame, body[1], focus == ComponentId::NowPlaying, &self.state);

        draw_footer(frame, outer[2], self.state.surface.year);

        self.help_overlay.draw(frame, area, true, &self.state);
    }
}
