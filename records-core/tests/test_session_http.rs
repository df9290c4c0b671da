use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use records_core::{CatalogSession, Config, LoadOutcome, PageSource, RecordsClient, SessionError};
use serde_json::json;

async fn serve_pages() -> SocketAddr {
    let app = Router::new()
        .route(
            "/p1",
            get(|| async {
                Json(json!({
                    "results": [
                        {"album_title": "A", "year": 2001, "condition": "poor", "artist": {"id": 0, "name": "X"}},
                        {"album_title": "B", "year": 1999, "condition": "good", "artist": {"id": 1, "name": "Y"}}
                    ],
                    "nextPage": "/p2"
                }))
            }),
        )
        .route(
            "/p2",
            get(|| async {
                Json(json!({
                    "results": [
                        {"album_title": "C", "year": "1970s", "condition": "fair", "artist": {"id": 0, "name": "X"}}
                    ],
                    "nextPage": null
                }))
            }),
        )
        .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/garbage", get(|| async { "not json" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr) -> RecordsClient {
    RecordsClient::new(Some(format!("http://{addr}")), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_client_fetches_and_decodes_page() {
    let addr = serve_pages().await;
    let page = client(addr).fetch_page("/p1").await.unwrap();
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[1].artist.name, "Y");
    assert_eq!(page.next_page.as_deref(), Some("/p2"));
}

#[tokio::test]
async fn test_client_accepts_absolute_cursor() {
    let addr = serve_pages().await;
    let page = client(addr)
        .fetch_page(&format!("http://{addr}/p2"))
        .await
        .unwrap();
    assert_eq!(page.results.len(), 1);
    assert!(page.next_page.is_none());
}

#[tokio::test]
async fn test_client_reports_server_errors() {
    let addr = serve_pages().await;
    assert!(client(addr).fetch_page("/broken").await.is_err());
    assert!(client(addr).fetch_page("/garbage").await.is_err());
    assert!(client(addr).fetch_page("/nope").await.is_err());
}

#[tokio::test]
async fn test_session_walks_all_pages_over_http() {
    let addr = serve_pages().await;
    let config = Config {
        first_page_url: "/p1".to_string(),
        base_url: Some(format!("http://{addr}")),
        ..Config::default()
    };
    let session = records_core::connect(&config).unwrap();

    assert_eq!(
        session.load_next_page().await.unwrap(),
        LoadOutcome::Appended(2)
    );
    assert_eq!(
        session.load_next_page().await.unwrap(),
        LoadOutcome::Appended(1)
    );
    assert_eq!(
        session.load_next_page().await.unwrap(),
        LoadOutcome::Exhausted
    );

    let snap = session.snapshot();
    let ids: Vec<u64> = snap.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(snap.artists.len(), 2);
    assert_eq!(snap.records[2].artist, 0);
    assert!(!snap.has_more);
    assert!(snap.error.is_none());
}

#[tokio::test]
async fn test_session_surfaces_fetch_failure() {
    let addr = serve_pages().await;
    let session = CatalogSession::new(client(addr), "/broken", Duration::from_millis(500));

    let err = session.load_next_page().await.unwrap_err();
    assert!(matches!(err, SessionError::Fetch(_)));

    let snap = session.snapshot();
    assert!(snap.records.is_empty());
    assert_eq!(snap.error.as_deref(), Some("Couldn't load records!"));
    assert!(snap.has_more);
    assert!(!snap.loading);
}
