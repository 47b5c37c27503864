//! Macro listing endpoint.

use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

/// The macros a template may use.
#[derive(Debug, Serialize, Deserialize)]
pub struct MacroListResponse {
    /// Registered macro names, sorted, without the leading `$`.
    pub macros: Vec<String>,
}

/// Creates the macro listing routes.
pub fn macros_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/macros", get(list_macros))
        .with_state(state)
}

async fn list_macros(State(state): State<AppState>) -> Json<MacroListResponse> {
    let macros = state
        .engine()
        .registry()
        .names()
        .into_iter()
        .map(str::to_string)
        .collect();

    Json(MacroListResponse { macros })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use engine::macros::{MacroRegistry, TimeFrom};
    use engine::MacroEngine;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn fetch(app: Router) -> MacroListResponse {
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/macros")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_list_mysql_macros() {
        let list = fetch(macros_routes(AppState::default())).await;

        assert_eq!(list.macros.len(), 10);
        assert_eq!(list.macros.first().map(String::as_str), Some("__time"));
        assert!(list.macros.contains(&"__timeGroup".to_string()));
        assert!(list.macros.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_list_custom_registry() {
        let mut registry = MacroRegistry::new();
        registry.register("__begin", TimeFrom);
        let state = AppState::new(MacroEngine::with_registry(registry));

        let list = fetch(macros_routes(state)).await;
        assert_eq!(list.macros, vec!["__begin".to_string()]);
    }
}
