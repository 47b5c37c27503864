//! Health check endpoint.
//!
//! Reports whether the macro engine can serve expansions. An engine with an
//! empty registry would reject every template, so it reports as degraded.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when no macros are registered.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
    /// Number of registered macros.
    pub macros: usize,
}

/// Creates the health check routes.
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let macros = state.engine().registry().names().len();
    let (code, status) = if macros == 0 {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    } else {
        (StatusCode::OK, "healthy")
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            service: "sqlmacro-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            macros,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use engine::macros::MacroRegistry;
    use engine::MacroEngine;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn check(state: AppState) -> (StatusCode, HealthResponse) {
        let response = health_routes(state)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_reports_registered_macros() {
        let (status, health) = check(AppState::default()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(health.status, "healthy");
        assert_eq!(health.service, "sqlmacro-api");
        assert_eq!(health.macros, 10);
        assert!(!health.version.is_empty());
    }

    #[tokio::test]
    async fn test_health_degraded_without_macros() {
        let state = AppState::new(MacroEngine::with_registry(MacroRegistry::new()));
        let (status, health) = check(state).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(health.status, "degraded");
        assert_eq!(health.macros, 0);
    }
}
