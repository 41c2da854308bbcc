//! Catalog data model: the decoded shape of `videos.json`.
//!
//! ```text
//! Catalog { series: [ Series { episodes: [ Episode, … ] }, … ] }
//! ```
//!
//! Only the first series is ever consumed.  Optional episode fields are plain
//! `Option<String>`; the fallbacks used for display live on `Episode` so that
//! no caller has to repeat them.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Thumbnail shown when an episode has none of its own.
pub const PLACEHOLDER_THUMBNAIL: &str =
    "https://via.placeholder.com/320x180/0d0d1a/ffffff?text=Episode";

/// Text used in the accessible label when the duration is unknown.
pub const UNKNOWN_LENGTH: &str = "Unknown length";

/// Shape problems found after a catalog decoded successfully.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog contains no series")]
    EmptyCatalog,
    #[error("first series contains no episodes")]
    EmptyEpisodeList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub episodes: Vec<Episode>,
}

/// One playable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    /// Display ordinal; kept as the JSON number it was written as.
    pub number: serde_json::Number,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub video_url: String,
}

impl Catalog {
    /// Parse a catalog from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Episodes of the first series, or the reason there are none.
    pub fn first_series_episodes(&self) -> Result<&[Episode], CatalogError> {
        let first = self.series.first().ok_or(CatalogError::EmptyCatalog)?;
        if first.episodes.is_empty() {
            return Err(CatalogError::EmptyEpisodeList);
        }
        Ok(&first.episodes)
    }
}

impl Episode {
    /// Thumbnail URL, falling back to `PLACEHOLDER_THUMBNAIL`.
    pub fn thumbnail_or_placeholder(&self) -> &str {
        non_empty(&self.thumbnail).unwrap_or(PLACEHOLDER_THUMBNAIL)
    }

    /// Duration for labels: `"Unknown length"` when absent.
    pub fn duration_label(&self) -> &str {
        non_empty(&self.duration).unwrap_or(UNKNOWN_LENGTH)
    }

    /// Duration for the metadata row: blank when absent.
    pub fn duration_text(&self) -> &str {
        non_empty(&self.duration).unwrap_or("")
    }

    /// Description text: blank when absent.
    pub fn description_text(&self) -> &str {
        non_empty(&self.description).unwrap_or("")
    }

    /// The episode number as it should be displayed (`1`, `2.5`, …).
    pub fn number_text(&self) -> String {
        // Integral floats ("3.0") read better without the fraction.
        match self.number.as_f64() {
            Some(f) if !self.number.is_i64() && !self.number.is_u64() && f.fract() == 0.0 => {
                format!("{}", f as i64)
            }
            _ => self.number.to_string(),
        }
    }
}

/// `null` decodes like a missing key.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
