//! Action enum: user intents and internal events flowing through the App.

use episode_tui::EpisodeId;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    EpisodeList,
    NowPlaying,
    HelpOverlay,
}

/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Selection ────────────────────────────────────────────────────────────
    /// A card was chosen (Enter or click).
    SelectEpisode(EpisodeId),
    /// A render pass replaced the card list.
    CardsRendered,

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPane(ComponentId),

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleHelp,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
