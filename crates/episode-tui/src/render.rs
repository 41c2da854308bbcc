//! List renderer: rebuilds every card and auto-selects the first episode.

use episode_proto::Episode;
use tracing::debug;

use crate::card::{build_card, EpisodeId};
use crate::selection::SelectionController;
use crate::surface::{DisplaySurface, MediaSink};

/// Replace the rendered list with one card per episode, in order, and select
/// the first.  Callers check that `episodes` is non-empty.
pub fn render_episode_list<M: MediaSink>(
    surface: &mut DisplaySurface<M>,
    controller: &SelectionController,
    episodes: Vec<Episode>,
) {
    surface.clear_cards();
    surface.clear_error();
    debug!("render: {} episodes", episodes.len());

    for (idx, episode) in episodes.into_iter().enumerate() {
        let id = EpisodeId(idx);
        let card = build_card(id, &episode);
        surface.push_card(card, episode);
        if idx == 0 {
            controller.select(surface, id);
        }
    }
}
