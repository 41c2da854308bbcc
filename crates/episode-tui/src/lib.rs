//! Episode browser core: builds episode cards onto a display surface, keeps
//! exactly one of them active, and drives the media player.
//!
//! The `episodes` binary wraps this in a ratatui front end.

pub mod bootstrap;
pub mod card;
pub mod mpv;
pub mod render;
pub mod selection;
pub mod surface;

pub use bootstrap::{apply_catalog, bootstrap_and_load, stamp_year, BootstrapError, LoadOutcome};
pub use card::{build_card, EpisodeCard, EpisodeId};
pub use render::render_episode_list;
pub use selection::SelectionController;
pub use surface::{DisplaySurface, MediaSink, PlaybackError};
