//! Bootstrap: year stamp, then fetch → validate → render.
//!
//! Every catalog failure stops here and becomes one banner message; nothing
//! propagates further.

use chrono::Datelike;
use episode_proto::{load_catalog, Catalog, CatalogError, CatalogSource, Episode, LoadError};
use thiserror::Error;
use tracing::{error, info};

use crate::render::render_episode_list;
use crate::selection::SelectionController;
use crate::surface::{DisplaySurface, MediaSink};

pub const MSG_LOAD_FAILED: &str = "Unable to load episodes right now. Please try again later.";
pub const MSG_NO_SERIES: &str = "No series found. Add series data in videos.json.";
pub const MSG_NO_EPISODES: &str = "No episodes found in the first series.";

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl BootstrapError {
    /// User-facing banner text for this cause.
    pub fn banner_message(&self) -> &'static str {
        match self {
            Self::Load(_) => MSG_LOAD_FAILED,
            Self::Catalog(CatalogError::EmptyCatalog) => MSG_NO_SERIES,
            Self::Catalog(CatalogError::EmptyEpisodeList) => MSG_NO_EPISODES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Rendered(usize),
    Failed,
}

/// Write the current year into the footer slot.
pub fn stamp_year<M: MediaSink>(surface: &mut DisplaySurface<M>) {
    surface.year = Some(chrono::Local::now().year());
}

/// Episodes of the first series, or why there are none.
pub fn first_series(result: Result<Catalog, LoadError>) -> Result<Vec<Episode>, BootstrapError> {
    let mut catalog = result?;
    catalog.first_series_episodes()?;
    Ok(catalog.series.swap_remove(0).episodes)
}

/// Render a load result onto the surface.
pub fn apply_catalog<M: MediaSink>(
    surface: &mut DisplaySurface<M>,
    controller: &SelectionController,
    result: Result<Catalog, LoadError>,
) -> LoadOutcome {
    match first_series(result) {
        Ok(episodes) => {
            let n = episodes.len();
            render_episode_list(surface, controller, episodes);
            info!("bootstrap: rendered {} episodes", n);
            LoadOutcome::Rendered(n)
        }
        Err(e) => {
            error!("bootstrap: {}", e);
            surface.show_error(e.banner_message());
            LoadOutcome::Failed
        }
    }
}

/// Full startup sequence in one call.
pub async fn bootstrap_and_load<M: MediaSink>(
    surface: &mut DisplaySurface<M>,
    controller: &SelectionController,
    source: &CatalogSource,
) -> LoadOutcome {
    stamp_year(surface);
    let result = load_catalog(source).await;
    apply_catalog(surface, controller, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::test_support::RecordingMedia;

    fn apply(json: &str) -> (DisplaySurface<RecordingMedia>, LoadOutcome) {
        let mut surface = DisplaySurface::new(RecordingMedia::default());
        let result = Catalog::from_slice(json.as_bytes()).map_err(|e| LoadError::Parse(e.to_string()));
        let outcome = apply_catalog(&mut surface, &SelectionController::new(), result);
        (surface, outcome)
    }

    #[test]
    fn test_no_series_banner() {
        let (surface, outcome) = apply(r#"{"series": []}"#);
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(surface.error_banner.as_deref(), Some(MSG_NO_SERIES));
        assert!(surface.cards.is_empty());
    }

    #[test]
    fn test_no_episodes_banner() {
        let (surface, outcome) = apply(r#"{"series": [{"episodes": []}]}"#);
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(surface.error_banner.as_deref(), Some(MSG_NO_EPISODES));
        assert!(surface.cards.is_empty());
        assert!(surface.media.loads.is_empty());
    }

    #[test]
    fn test_null_lists_use_shape_banners() {
        let (surface, outcome) = apply(r#"{"series": null}"#);
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(surface.error_banner.as_deref(), Some(MSG_NO_SERIES));

        let (surface, outcome) = apply(r#"{"series": [{"episodes": null}]}"#);
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(surface.error_banner.as_deref(), Some(MSG_NO_EPISODES));
        assert!(surface.media.loads.is_empty());
    }

    #[test]
    fn test_parse_failure_uses_generic_banner() {
        let (surface, outcome) = apply("[1, 2");
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(surface.error_banner.as_deref(), Some(MSG_LOAD_FAILED));
    }

    #[test]
    fn test_only_first_series_is_rendered() {
        let (surface, outcome) = apply(
            r#"{"series": [
                {"episodes": [{"number": 1, "title": "A", "videoUrl": "a.mp4"}]},
                {"episodes": [{"number": 1, "title": "B", "videoUrl": "b.mp4"},
                              {"number": 2, "title": "C", "videoUrl": "c.mp4"}]}
            ]}"#,
        );
        assert_eq!(outcome, LoadOutcome::Rendered(1));
        assert_eq!(surface.cards.len(), 1);
        assert_eq!(surface.title, "A");
        assert!(surface.error_banner.is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_stamps_year_even_on_failure() {
        let mut surface = DisplaySurface::new(RecordingMedia::default());
        let source = CatalogSource::File("/nonexistent/videos.json".into());
        let outcome = bootstrap_and_load(&mut surface, &SelectionController::new(), &source).await;
        assert_eq!(outcome, LoadOutcome::Failed);
        assert!(surface.year.unwrap_or(0) >= 2024);
        assert_eq!(surface.error_banner.as_deref(), Some(MSG_LOAD_FAILED));
    }
}
