//! AppState: data shared read-only with every component.
//!
//! Only the App event loop writes to it, and only the renderer and the
//! selection controller touch `surface`.

use episode_tui::mpv::MpvSink;
use episode_tui::{DisplaySurface, EpisodeCard};

pub struct AppState {
    pub surface: DisplaySurface<MpvSink>,
    /// The catalog fetch is still in flight.
    pub loading: bool,
    /// Where the catalog comes from, for the list pane title.
    pub source_label: String,
}

impl AppState {
    pub fn new(surface: DisplaySurface<MpvSink>, source_label: String) -> Self {
        Self {
            surface,
            loading: false,
            source_label,
        }
    }

    pub fn active_card(&self) -> Option<&EpisodeCard> {
        self.surface.active_card()
    }
}
