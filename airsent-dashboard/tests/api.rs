//! Router tests against an in-memory dataset

use airsent_common::DashboardConfig;
use airsent_dashboard::{router, AppState};
use airsent_query::{Dataset, Post};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

fn app() -> Router {
    let dataset = Dataset::from_posts(vec![
        Post::new("great @Delta http://x RT")
            .with_sentiment("positive")
            .with_publisher("Delta")
            .with_coordinates("[40.7, -74.0]")
            .with_created_at("2015-02-24 09:05:00 -0500"),
        Post::new("bad flight")
            .with_sentiment("negative")
            .with_publisher("United")
            .with_coordinates("not coordinates")
            .with_created_at("2015-02-24 09:10:00 -0500"),
        Post::new("lost my bags")
            .with_sentiment("negative")
            .with_publisher("United")
            .with_created_at("2015-02-24 17:00:00 -0500"),
    ]);
    router(AppState::new(dataset, DashboardConfig::default()))
}

async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
    request(app(), uri).await
}

async fn request(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get_json("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["posts"], "3");
}

#[tokio::test]
async fn test_sentiment_counts_sorted() {
    let (status, body) = get_json("/api/sentiments").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["label"], "negative");
    assert_eq!(body["data"][0]["count"], 2);
    assert_eq!(body["data"][1]["label"], "positive");
}

#[tokio::test]
async fn test_publisher_counts() {
    let (_, body) = get_json("/api/publishers").await;
    assert_eq!(body["data"][0]["label"], "United");
    assert_eq!(body["data"][0]["count"], 2);
    assert_eq!(body["data"][1]["label"], "Delta");
}

#[tokio::test]
async fn test_sample() {
    let (status, body) = get_json("/api/sample?sentiment=positive").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["text"], "great @Delta http://x RT");
}

#[tokio::test]
async fn test_sample_without_candidates_is_not_found() {
    let (status, body) = get_json("/api/sample?sentiment=neutral").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("neutral"));
}

#[tokio::test]
async fn test_sample_requires_sentiment() {
    let (status, _) = get_json("/api/sample").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_geo() {
    let (status, body) = get_json("/api/geo?hour=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["caption"], "1 tweets between 9:00 and 10:00");
    assert_eq!(body["data"]["points"][0]["latitude"], 40.7);
}

#[tokio::test]
async fn test_geo_invalid_hour() {
    let (status, _) = get_json("/api/geo?hour=25").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get_json("/api/geo?hour=noon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_breakdown() {
    let (status, body) = get_json("/api/breakdown?publishers=United&publishers=Delta").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rows"][0]["publisher"], "United");
    assert_eq!(body["data"]["rows"][0]["counts"]["negative"], 2);
    assert_eq!(body["data"]["rows"][0]["counts"]["positive"], 0);
    assert_eq!(body["data"]["rows"][1]["counts"]["positive"], 1);
}

#[tokio::test]
async fn test_breakdown_publisher_with_comma() {
    let dataset = Dataset::from_posts(vec![
        Post::new("fine").with_sentiment("positive").with_publisher("Acme, Inc"),
        Post::new("meh").with_sentiment("neutral").with_publisher("Acme"),
    ]);
    let app = router(AppState::new(dataset, DashboardConfig::default()));
    let (status, body) = request(app, "/api/breakdown?publishers=Acme%2C%20Inc").await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    let rows = body["data"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["publisher"], "Acme, Inc");
    assert_eq!(rows[0]["counts"]["positive"], 1);
}

#[tokio::test]
async fn test_breakdown_empty_selection() {
    let (_, body) = get_json("/api/breakdown").await;
    assert_eq!(body["data"]["rows"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_words() {
    let (status, body) = get_json("/api/words?sentiment=positive").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["corpus"], "great");
    assert_eq!(body["data"]["words"][0]["word"], "great");

    let (status, _) = get_json("/api/words?sentiment=positive&max_words=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_index_renders_controls() {
    let (status, body) = get("/?hour=9&show_breakdown=true&publishers=United").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<form method=\"get\""));
    assert!(html.contains("1 tweets between 9:00 and 10:00"));
    assert!(html.contains("Breakdown Airline Tweets by Sentiment</h2>"));
    assert!(html.contains("<option value=\"United\" selected>United</option>"));
}

#[tokio::test]
async fn test_index_rejects_bad_chart() {
    let (status, _) = get("/?sentiment_chart=donut").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
