//! Data loader: one attempt at fetching and decoding the catalog.
//!
//! Shape validation (no series / no episodes) is left to the caller; see
//! `Catalog::first_series_episodes`.

use std::fmt;
use std::path::PathBuf;

use reqwest::Url;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;

/// Failures of the loader itself.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Transport failure or a non-success HTTP status (or an unreadable file).
    #[error("could not fetch catalog: {0}")]
    Fetch(String),
    /// The body was not a catalog-shaped JSON document.
    #[error("could not parse catalog: {0}")]
    Parse(String),
}

/// Catalog location: either an http(s) URL or a local file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Url(String),
    File(PathBuf),
}

impl CatalogSource {
    /// Resolve a configured `source` against an optional `base_url`.
    ///
    /// Absolute URLs are used as-is.  A relative source is joined onto
    /// `base_url` when that is an http(s) origin, otherwise treated as a path.
    pub fn resolve(source: &str, base_url: &str) -> Self {
        let source = source.trim();
        if is_http(source) {
            return Self::Url(source.to_string());
        }
        let base_url = base_url.trim();
        if is_http(base_url) {
            match Url::parse(base_url).and_then(|base| base.join(source)) {
                Ok(url) => return Self::Url(url.to_string()),
                Err(e) => warn!("catalog: cannot join '{}' onto '{}': {}", source, base_url, e),
            }
        }
        Self::File(PathBuf::from(source))
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn is_http(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Fetch and decode the catalog.  No retries.
pub async fn load_catalog(source: &CatalogSource) -> Result<Catalog, LoadError> {
    info!("catalog: loading from {}", source);
    let body = match source {
        CatalogSource::Url(url) => fetch_url(url).await?,
        CatalogSource::File(path) => tokio::fs::read(path)
            .await
            .map_err(|e| LoadError::Fetch(format!("{}: {}", path.display(), e)))?,
    };
    debug!("catalog: read {} bytes", body.len());
    Catalog::from_slice(&body).map_err(|e| LoadError::Parse(e.to_string()))
}

async fn fetch_url(url: &str) -> Result<Vec<u8>, LoadError> {
    let resp = reqwest::get(url)
        .await
        .map_err(|e| LoadError::Fetch(e.to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(LoadError::Fetch(format!("{} returned {}", url, status)));
    }
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| LoadError::Fetch(e.to_string()))?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute_url() {
        assert_eq!(
            CatalogSource::resolve("https://cdn.example.com/videos.json", "http://ignored/"),
            CatalogSource::Url("https://cdn.example.com/videos.json".to_string())
        );
    }

    #[test]
    fn test_resolve_relative_against_origin() {
        assert_eq!(
            CatalogSource::resolve("videos.json", "http://127.0.0.1:8080/site/"),
            CatalogSource::Url("http://127.0.0.1:8080/site/videos.json".to_string())
        );
    }

    #[test]
    fn test_resolve_path_without_base() {
        assert_eq!(
            CatalogSource::resolve("data/videos.json", ""),
            CatalogSource::File(PathBuf::from("data/videos.json"))
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = CatalogSource::File(dir.path().join("videos.json"));
        let err = load_catalog(&source).await.unwrap_err();
        assert!(matches!(err, LoadError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("videos.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_catalog(&CatalogSource::File(path)).await.unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[tokio::test]
    async fn test_reads_file_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("videos.json");
        std::fs::write(
            &path,
            r#"{"series": [{"episodes": [{"number": 1, "title": "A", "videoUrl": "a.mp4"}]}]}"#,
        )
        .unwrap();
        let catalog = load_catalog(&CatalogSource::File(path)).await.unwrap();
        assert_eq!(catalog.first_series_episodes().unwrap()[0].title, "A");
    }
}
