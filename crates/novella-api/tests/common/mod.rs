//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use novella_store::memory::{InMemoryFlagStoreFactory, InMemoryStoryStore};
use tower::ServiceExt;

use novella_api::routes;
use novella_api::state::AppState;

/// Build the full app router over an in-memory copy of `book`. Uses the same
/// route structure as `main.rs`.
pub fn build_test_app(book: &str) -> Router {
    let story = Arc::new(InMemoryStoryStore::from_yaml_str(book).unwrap());
    routes::app(AppState::new(story, Arc::new(InMemoryFlagStoreFactory), 64))
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a playback command and return the status with the `step` of a
/// successful response, or the error body otherwise.
pub async fn post_step(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let (status, json) = post_json(app, uri, body).await;
    if status.is_success() {
        (status, json["step"].clone())
    } else {
        (status, json)
    }
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a DELETE request and return the status.
pub async fn delete(app: Router, uri: &str) -> StatusCode {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    app.oneshot(request).await.unwrap().status()
}

/// Create a playthrough at `scene_id` and return its id with the first step.
pub async fn create_playthrough(app: Router, scene_id: i64) -> (String, serde_json::Value) {
    let (status, json) = post_json(
        app,
        "/api/v1/playthroughs",
        &serde_json::json!({ "scene_id": scene_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    (
        json["playthrough_id"].as_str().unwrap().to_owned(),
        json["step"].clone(),
    )
}
