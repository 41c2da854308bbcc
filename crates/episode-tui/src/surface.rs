//! DisplaySurface: the sinks the pipeline writes to.
//!
//! The list container, the media player, the title/description slots, the
//! error banner and the year stamp.  The renderer and the selection
//! controller receive it explicitly; nothing else mutates it.

use episode_proto::Episode;
use thiserror::Error;

use crate::card::{EpisodeCard, EpisodeId};

/// Playback could not be started.  Always swallowed by the controller.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("media player is not running")]
    Unavailable,
    #[error("media player rejected command: {0}")]
    Rejected(String),
}

/// The media element.  `load` must make the player drop whatever it was
/// playing and reload from `url`.
pub trait MediaSink {
    fn load(&mut self, url: &str) -> Result<(), PlaybackError>;
    fn play(&mut self) -> Result<(), PlaybackError>;
}

pub struct DisplaySurface<M> {
    /// Rendered cards, in catalog order.
    pub cards: Vec<EpisodeCard>,
    /// Backing data for `cards`; `cards[i]` was built from `episodes[i]`.
    pub episodes: Vec<Episode>,
    pub media: M,
    pub media_source: Option<String>,
    pub title: String,
    pub description: String,
    pub error_banner: Option<String>,
    pub year: Option<i32>,
}

impl<M: MediaSink> DisplaySurface<M> {
    pub fn new(media: M) -> Self {
        Self {
            cards: Vec::new(),
            episodes: Vec::new(),
            media,
            media_source: None,
            title: String::new(),
            description: String::new(),
            error_banner: None,
            year: None,
        }
    }

    /// Remove every rendered card.
    pub fn clear_cards(&mut self) {
        self.cards.clear();
        self.episodes.clear();
    }

    pub fn push_card(&mut self, card: EpisodeCard, episode: Episode) {
        self.cards.push(card);
        self.episodes.push(episode);
    }

    pub fn episode(&self, id: EpisodeId) -> Option<&Episode> {
        self.episodes.get(id.0)
    }

    pub fn active_card(&self) -> Option<&EpisodeCard> {
        self.cards.iter().find(|c| c.active)
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error_banner = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error_banner = None;
    }
}
