//! Card builder: one selectable display unit per episode.

use episode_proto::Episode;

/// Position of a card in the current render pass.  Selection events carry
/// this instead of a reference to the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpisodeId(pub usize);

/// Everything the list pane needs to draw one episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeCard {
    pub id: EpisodeId,
    pub thumbnail: String,
    pub thumbnail_alt: String,
    /// Accessible label: `"{title} ({duration})"`.
    pub label: String,
    pub meta_number: String,
    pub meta_duration: String,
    pub title: String,
    pub description: String,
    pub active: bool,
}

/// Build the card for `episode`.  Never fails; missing optional fields
/// render as their fallbacks.
pub fn build_card(id: EpisodeId, episode: &Episode) -> EpisodeCard {
    EpisodeCard {
        id,
        thumbnail: episode.thumbnail_or_placeholder().to_string(),
        thumbnail_alt: episode.title.clone(),
        label: format!("{} ({})", episode.title, episode.duration_label()),
        meta_number: format!("Ep {}", episode.number_text()),
        meta_duration: episode.duration_text().to_string(),
        title: episode.title.clone(),
        description: episode.description_text().to_string(),
        active: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use episode_proto::catalog::PLACEHOLDER_THUMBNAIL;

    fn episode(json: &str) -> Episode {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_full_card() {
        let ep = episode(
            r#"{"number": 3, "title": "Lanterns", "description": "Night falls.",
                "duration": "22:00", "thumbnail": "https://img/3.jpg", "videoUrl": "https://v/3.mp4"}"#,
        );
        let card = build_card(EpisodeId(2), &ep);
        assert_eq!(card.id, EpisodeId(2));
        assert_eq!(card.thumbnail, "https://img/3.jpg");
        assert_eq!(card.thumbnail_alt, "Lanterns");
        assert_eq!(card.label, "Lanterns (22:00)");
        assert_eq!(card.meta_number, "Ep 3");
        assert_eq!(card.meta_duration, "22:00");
        assert_eq!(card.title, "Lanterns");
        assert_eq!(card.description, "Night falls.");
        assert!(!card.active);
    }

    #[test]
    fn test_card_without_optional_fields() {
        let ep = episode(r#"{"number": 1, "title": "Bare", "videoUrl": "https://v/1.mp4"}"#);
        let card = build_card(EpisodeId(0), &ep);
        assert_eq!(card.thumbnail, PLACEHOLDER_THUMBNAIL);
        assert!(card.label.contains("Unknown length"));
        assert_eq!(card.label, "Bare (Unknown length)");
        assert_eq!(card.meta_duration, "");
        assert_eq!(card.description, "");
        assert_eq!(card.title, "Bare");
    }
}
