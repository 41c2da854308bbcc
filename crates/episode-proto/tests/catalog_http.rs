//! Loader tests against a local HTTP origin.
//!
//! Each test binds an axum router to 127.0.0.1:0 and points a
//! `CatalogSource` at it, the same way the app resolves `videos.json`
//! relative to a configured `base_url`.

use axum::{http::StatusCode, routing::get, Router};
use episode_proto::{load_catalog, CatalogError, CatalogSource, LoadError};
use tokio::net::TcpListener;

const FIXTURE: &str = include_str!("fixtures/videos.json");

/// Serve `router` on an ephemeral port and return its origin (with trailing slash).
async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{}/", addr)
}

fn source(origin: &str) -> CatalogSource {
    CatalogSource::resolve("videos.json", origin)
}

#[tokio::test]
async fn test_loads_first_series_from_origin() {
    let origin = serve(Router::new().route("/videos.json", get(|| async { FIXTURE }))).await;

    let catalog = load_catalog(&source(&origin)).await.unwrap();
    assert_eq!(catalog.series.len(), 2);

    let episodes = catalog.first_series_episodes().unwrap();
    assert_eq!(episodes.len(), 3);
    assert_eq!(episodes[0].title, "The Quiet Orbit");
    assert_eq!(episodes[2].duration, None);
    assert!(episodes.iter().all(|e| e.title != "Never Shown"));
}

#[tokio::test]
async fn test_not_found_is_fetch_error() {
    let origin = serve(Router::new()).await;

    let err = load_catalog(&source(&origin)).await.unwrap_err();
    match err {
        LoadError::Fetch(msg) => assert!(msg.contains("404"), "unexpected message: {msg}"),
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_fetch_error() {
    let origin = serve(Router::new().route(
        "/videos.json",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    ))
    .await;

    let err = load_catalog(&source(&origin)).await.unwrap_err();
    assert!(matches!(err, LoadError::Fetch(_)));
}

#[tokio::test]
async fn test_html_body_is_parse_error() {
    let origin = serve(Router::new().route(
        "/videos.json",
        get(|| async { "<html><body>not json</body></html>" }),
    ))
    .await;

    let err = load_catalog(&source(&origin)).await.unwrap_err();
    assert!(matches!(err, LoadError::Parse(_)));
}

#[tokio::test]
async fn test_empty_series_list_loads_but_fails_validation() {
    let origin = serve(Router::new().route("/videos.json", get(|| async { r#"{"series": []}"# }))).await;

    let catalog = load_catalog(&source(&origin)).await.unwrap();
    assert_eq!(
        catalog.first_series_episodes(),
        Err(CatalogError::EmptyCatalog)
    );
}

#[tokio::test]
async fn test_empty_episode_list_loads_but_fails_validation() {
    let origin = serve(Router::new().route(
        "/videos.json",
        get(|| async { r#"{"series": [{"episodes": []}]}"# }),
    ))
    .await;

    let catalog = load_catalog(&source(&origin)).await.unwrap();
    assert_eq!(
        catalog.first_series_episodes(),
        Err(CatalogError::EmptyEpisodeList)
    );
}

#[tokio::test]
async fn test_unreachable_origin_is_fetch_error() {
    // Bind then drop to get a port nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = load_catalog(&CatalogSource::Url(format!("http://{}/videos.json", addr)))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Fetch(_)));
}
