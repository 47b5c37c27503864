//! Integration tests for health check and general API functionality.

use axum::http::StatusCode;

use super::common::{get, test_app};

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "sqlmacro-api");
    assert!(response["version"].is_string());
    assert_eq!(response["macros"], 10);
}

#[tokio::test]
async fn test_expand_requires_post() {
    let (app, _state) = test_app();

    let (status, _) = get(app, "/api/v1/expand").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
