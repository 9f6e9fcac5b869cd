//! Integration tests for the health endpoint.

mod common;

use axum::http::StatusCode;
use novella_test_support::fixtures;

#[tokio::test]
async fn test_health_returns_200_with_status_ok() {
    let app = common::build_test_app(fixtures::SCENARIO_BOOK);

    let (status, json) = common::get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "novella-api");
    assert!(json["version"].is_string());
    assert_eq!(json["playthroughs"], 0);
}

#[tokio::test]
async fn test_health_counts_live_playthroughs() {
    let app = common::build_test_app(fixtures::SCENARIO_BOOK);
    let (id, _) = common::create_playthrough(app.clone(), 1).await;
    common::create_playthrough(app.clone(), 1).await;
    common::delete(app.clone(), &format!("/api/v1/playthroughs/{id}")).await;

    let (status, json) = common::get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["playthroughs"], 1);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = common::build_test_app(fixtures::SCENARIO_BOOK);

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/v1/nonexistent")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
