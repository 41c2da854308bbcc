//! Selection controller: keeps exactly one card active and mirrors the
//! active episode into the media source and the title/description slots.
//!
//! Each card is either inactive or active.  The only transition is a
//! selection event for some `EpisodeId`: that card becomes active, every
//! other card becomes inactive.

use tracing::{debug, info, warn};

use crate::card::EpisodeId;
use crate::surface::{DisplaySurface, MediaSink};

#[derive(Debug, Default, Clone, Copy)]
pub struct SelectionController;

impl SelectionController {
    pub fn new() -> Self {
        Self
    }

    /// Apply a selection.  Returns `false` if `id` does not name a rendered
    /// card (e.g. an event left over from a previous render pass).
    pub fn select<M: MediaSink>(&self, surface: &mut DisplaySurface<M>, id: EpisodeId) -> bool {
        let Some(episode) = surface.episode(id).cloned() else {
            warn!("select: no card for {:?} ({} rendered)", id, surface.cards.len());
            return false;
        };
        info!("select: ep {} '{}'", episode.number_text(), episode.title);

        // Source swap + reload, then best-effort play.
        surface.media_source = Some(episode.video_url.clone());
        if let Err(e) = surface.media.load(&episode.video_url) {
            debug!("select: media load failed: {}", e);
        }
        if let Err(e) = surface.media.play() {
            debug!("select: playback did not start: {}", e);
        }

        surface.title = episode.title.clone();
        surface.description = episode.description_text().to_string();

        for card in surface.cards.iter_mut() {
            card.active = card.id == id;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_episode_list;
    use crate::surface::test_support::{episodes, RecordingMedia};

    fn rendered(n: usize) -> DisplaySurface<RecordingMedia> {
        let mut surface = DisplaySurface::new(RecordingMedia::default());
        render_episode_list(&mut surface, &SelectionController::new(), episodes(n));
        surface
    }

    fn assert_consistent(surface: &DisplaySurface<RecordingMedia>, expected: EpisodeId) {
        let active: Vec<_> = surface.cards.iter().filter(|c| c.active).collect();
        assert_eq!(active.len(), 1, "exactly one active card");
        assert_eq!(active[0].id, expected);

        let episode = surface.episode(expected).unwrap();
        assert_eq!(surface.media_source.as_deref(), Some(episode.video_url.as_str()));
        assert_eq!(surface.title, episode.title);
        assert_eq!(surface.description, episode.description_text());
        assert_eq!(
            surface.media.loads.last().map(String::as_str),
            Some(episode.video_url.as_str())
        );
    }

    #[test]
    fn test_click_sequence_keeps_single_active_card() {
        let mut surface = rendered(5);
        let controller = SelectionController::new();

        for idx in [3, 0, 4, 4, 1, 2] {
            assert!(controller.select(&mut surface, EpisodeId(idx)));
            assert_consistent(&surface, EpisodeId(idx));
        }
        // Initial auto-select plus six clicks.
        assert_eq!(surface.media.loads.len(), 7);
        assert_eq!(surface.media.plays, 7);
    }

    #[test]
    fn test_refused_playback_is_swallowed() {
        let mut surface = DisplaySurface::new(RecordingMedia {
            refuse_play: true,
            ..Default::default()
        });
        let controller = SelectionController::new();
        render_episode_list(&mut surface, &controller, episodes(2));

        assert!(controller.select(&mut surface, EpisodeId(1)));
        assert_consistent(&surface, EpisodeId(1));
        assert!(surface.error_banner.is_none());
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let mut surface = rendered(2);
        let controller = SelectionController::new();

        assert!(!controller.select(&mut surface, EpisodeId(9)));
        assert_consistent(&surface, EpisodeId(0));
        assert_eq!(surface.media.loads.len(), 1);
    }

    #[test]
    fn test_missing_description_clears_slot() {
        let mut eps = episodes(2);
        eps[1].description = None;
        let mut surface = DisplaySurface::new(RecordingMedia::default());
        let controller = SelectionController::new();
        render_episode_list(&mut surface, &controller, eps);
        assert_eq!(surface.description, "About episode 1");

        controller.select(&mut surface, EpisodeId(1));
        assert_eq!(surface.description, "");
        assert_eq!(surface.title, "Episode 2");
    }
}
