use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::loader::CatalogSource;
use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub mpv: MpvConfig,
}

/// Where `videos.json` comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// URL or file path of the catalog.  A relative name is joined onto
    /// `base_url` when one is set, otherwise read from disk.
    #[serde(default = "default_source")]
    pub source: String,
    /// Optional http(s) origin that relative sources are served from.
    #[serde(default)]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MpvConfig {
    #[serde(default = "default_volume")]
    pub default_volume: f32,
    /// Open a video window.  `false` plays audio only.
    #[serde(default = "default_video")]
    pub video: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            base_url: String::new(),
        }
    }
}

impl Default for MpvConfig {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
            video: default_video(),
        }
    }
}

fn default_source() -> String {
    "videos.json".to_string()
}

fn default_volume() -> f32 {
    0.5
}

fn default_video() -> bool {
    true
}

impl CatalogConfig {
    pub fn resolve(&self) -> CatalogSource {
        CatalogSource::resolve(&self.source, &self.base_url)
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog.source, "videos.json");
        assert!(config.catalog.base_url.is_empty());
        assert_eq!(config.mpv.default_volume, 0.5);
        assert!(config.mpv.video);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml_str(
            r#"
            [catalog]
            base_url = "http://localhost:8000/"
            "#,
        )
        .unwrap();
        assert_eq!(config.catalog.source, "videos.json");
        assert_eq!(
            config.catalog.resolve(),
            CatalogSource::Url("http://localhost:8000/videos.json".to_string())
        );
        assert!(config.mpv.video);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = Config::default();
        config.mpv.video = false;
        let text = toml::to_string_pretty(&config).unwrap();
        let back = Config::from_toml_str(&text).unwrap();
        assert!(!back.mpv.video);
    }
}
