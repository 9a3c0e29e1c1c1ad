//! Server Tests: status routes over a snapshot channel

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use baccarat_oracle::reactor::{ChannelHealth, StatusSnapshot};
use baccarat_oracle::{create_router, Prediction, Suit};
use serde_json::Value;
use tokio::sync::watch;
use tower::ServiceExt;

fn snapshot() -> StatusSnapshot {
    StatusSnapshot {
        current_game: 430,
        prediction_offset: 2,
        channels: ChannelHealth { source_ok: true, prediction_ok: false },
        predictions: vec![Prediction::new(432, Suit::Heart, 430)],
        ..Default::default()
    }
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn health_is_plain_ok() {
    let (_tx, rx) = watch::channel(StatusSnapshot::default());
    let (status, body) = get(create_router(rx), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn status_reports_snapshot() {
    let (_tx, rx) = watch::channel(snapshot());
    let (status, body) = get(create_router(rx), "/status").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "running");
    assert_eq!(json["service"], "baccarat-oracle");
    assert_eq!(json["current_game"], 430);
    assert_eq!(json["pending_predictions"], 1);
    assert_eq!(json["prediction_offset"], 2);
    assert_eq!(json["source_channel_ok"], true);
    assert_eq!(json["prediction_channel_ok"], false);
    assert!(json["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn status_follows_updates() {
    let (tx, rx) = watch::channel(StatusSnapshot::default());
    let router = create_router(rx);

    tx.send_replace(snapshot());
    let (_, body) = get(router, "/status").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["current_game"], 430);
}

#[tokio::test]
async fn index_page_lists_predictions() {
    let (_tx, rx) = watch::channel(snapshot());
    let (status, body) = get(create_router(rx), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("#430"));
    assert!(body.contains("#432 ❤️ Cœur (⏳⏳)"));
    assert!(body.contains("N+2"));
    assert!(body.contains("❌ Erreur"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (_tx, rx) = watch::channel(StatusSnapshot::default());
    let (status, _) = get(create_router(rx), "/predictions").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
