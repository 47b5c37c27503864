//! SQL template expansion endpoint.
//!
//! Accepts a raw SQL template with the dashboard time range and returns the
//! executable SQL together with the query context the macros produced.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use engine::{FillPolicy, MacroError, QueryContext, TimeRange, TimeRangeError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// Request body for template expansion.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ExpandRequest {
    /// The raw SQL template.
    #[validate(length(min = 1, message = "SQL template cannot be empty"))]
    pub sql: String,

    /// Start of the time range (`now-6h`, epoch millis or RFC 3339).
    #[validate(length(min = 1, message = "Time range start cannot be empty"))]
    pub from: String,

    /// End of the time range.
    #[validate(length(min = 1, message = "Time range end cannot be empty"))]
    pub to: String,

    /// Initial query context; macros write their keys on top of it.
    #[serde(default)]
    pub model: Map<String, Value>,
}

/// Response body for a successful expansion.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpandResponse {
    /// The executable SQL.
    pub sql: String,
    /// The query context after expansion.
    pub model: Map<String, Value>,
    /// The gap-filling policy, when `$__timeGroup` requested one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillPolicy>,
}

/// Error response for a rejected expansion.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpandError {
    /// Error type.
    pub error: String,
    /// Detailed error message.
    pub message: String,
    /// The macro error kind, for `macro_error` responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ExpandError {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            kind: None,
        }
    }
}

impl From<TimeRangeError> for ExpandError {
    fn from(e: TimeRangeError) -> Self {
        Self::new("invalid_time_range", e.to_string())
    }
}

impl From<MacroError> for ExpandError {
    fn from(e: MacroError) -> Self {
        Self {
            kind: Some(e.kind().to_string()),
            ..Self::new("macro_error", e.to_string())
        }
    }
}

type Rejection = (StatusCode, Json<ExpandError>);

fn bad_request(error: impl Into<ExpandError>) -> Rejection {
    (StatusCode::BAD_REQUEST, Json(error.into()))
}

/// Creates the expansion routes.
pub fn expand_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/expand", post(expand))
        .with_state(state)
}

/// Handler for template expansion.
///
/// Returns 200 OK with the SQL and context on success, 400 Bad Request
/// for malformed input or any macro failure.
async fn expand(
    State(state): State<AppState>,
    payload: Result<Json<ExpandRequest>, JsonRejection>,
) -> Result<Json<ExpandResponse>, Rejection> {
    let Json(request) = payload.map_err(|rejection| {
        bad_request(ExpandError::new("invalid_json", rejection.body_text()))
    })?;

    request
        .validate()
        .map_err(|e| bad_request(ExpandError::new("validation_failed", e.to_string())))?;

    let range = TimeRange::parse(&request.from, &request.to).map_err(bad_request)?;

    let mut context = QueryContext::from(request.model);
    let sql = state
        .engine()
        .interpolate(&request.sql, &range, &mut context)
        .map_err(|e| {
            tracing::debug!(kind = e.kind(), error = %e, "Rejected SQL template");
            bad_request(e)
        })?;

    let fill = context.fill_policy();
    Ok(Json(ExpandResponse {
        sql,
        model: context.into_model(),
        fill,
    }))
}
