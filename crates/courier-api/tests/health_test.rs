//! Integration tests for the health endpoint.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_returns_200_with_status_ok() {
    let world = common::TestWorld::new();

    let (status, json) = common::send(world.app(), "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let world = common::TestWorld::new();

    let (status, _) = common::send(world.app(), "GET", "/api/v1/nonexistent", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
