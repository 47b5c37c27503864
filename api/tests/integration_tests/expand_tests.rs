//! Integration tests for template expansion.
//!
//! Tests cover:
//! - Dashboard-style templates with several macros
//! - Fill policy round trip through the context
//! - Error responses and first-error selection

use axum::http::StatusCode;
use serde_json::json;

use super::common::{expand_fixed, post_json, test_app};

#[tokio::test]
async fn test_expand_dashboard_query() {
    let (app, _state) = test_app();

    let sql = "SELECT $__timeGroup(created_at, '1h') AS time, count(*) \
               FROM orders \
               WHERE $__timeFilter(created_at) AND $__wherein(region, 'eu', 'us') \
               GROUP BY 1 ORDER BY 1";

    let (status, response) = expand_fixed(app, sql).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response["sql"],
        "SELECT cast(cast(UNIX_TIMESTAMP(created_at)/(3600) as signed)*3600 as signed) AS time, count(*) \
         FROM orders \
         WHERE created_at >= FROM_UNIXTIME(1000) AND created_at <= FROM_UNIXTIME(2000) \
         AND region in ('eu','us') \
         GROUP BY 1 ORDER BY 1"
    );
    assert_eq!(response["model"], json!({}));
}

#[tokio::test]
async fn test_expand_epoch_column_query() {
    let (app, _state) = test_app();

    let (status, response) = expand_fixed(
        app,
        "SELECT $__time(t) FROM m WHERE $__unixEpochFilter(t) AND t > $__unixEpochFrom() - 60",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response["sql"],
        "SELECT UNIX_TIMESTAMP(t) as time_sec FROM m WHERE t >= 1000 AND t <= 2000 AND t > 1000 - 60"
    );
}

#[tokio::test]
async fn test_expand_wherein_variables() {
    let (app, _state) = test_app();

    let (_, all) = expand_fixed(app.clone(), "WHERE $__wherein('c', 'ALL')").await;
    assert_eq!(all["sql"], "WHERE 1 = 1");

    let (_, null) = expand_fixed(app.clone(), "WHERE $__wherein('c', 'NULL')").await;
    assert_eq!(null["sql"], "WHERE c IS NULL");

    let (_, mixed) = expand_fixed(app, "WHERE $__wherein('c', 'a', NULL)").await;
    assert_eq!(mixed["sql"], "WHERE c in ('a') or 'c' IS NULL");
}

#[tokio::test]
async fn test_expand_fill_null_is_reported() {
    let (app, _state) = test_app();

    let (status, response) = post_json(
        app,
        "/api/v1/expand",
        json!({
            "sql": "SELECT $__timeGroup(ts, '30s', NULL), avg(v) FROM m GROUP BY 1",
            "from": "now-15m",
            "to": "now",
            "model": { "refId": "B", "format": "time_series" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response["model"],
        json!({
            "refId": "B",
            "format": "time_series",
            "fill": true,
            "fillInterval": 30.0,
            "fillNull": true
        })
    );
    assert_eq!(
        response["fill"],
        json!({ "interval_secs": 30.0, "value": "null" })
    );
}

#[tokio::test]
async fn test_expand_rfc3339_range() {
    let (app, _state) = test_app();

    let (status, response) = post_json(
        app,
        "/api/v1/expand",
        json!({
            "sql": "$__timeFrom() $__timeTo()",
            "from": "1970-01-01T00:16:40Z",
            "to": "1970-01-01T00:33:20Z"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["sql"], "FROM_UNIXTIME(1000) FROM_UNIXTIME(2000)");
}

#[tokio::test]
async fn test_expand_template_without_macros() {
    let (app, _state) = test_app();

    let (status, response) = expand_fixed(app, "SELECT price FROM items WHERE cost > $5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["sql"], "SELECT price FROM items WHERE cost > $5");
}

#[tokio::test]
async fn test_expand_reports_first_error() {
    let (app, _state) = test_app();

    let (status, response) = expand_fixed(
        app,
        "SELECT $__timeGroup(ts, 'bogus') FROM m WHERE $__timeFilter(ts) AND $__nope()",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "macro_error");
    assert_eq!(response["kind"], "invalid_duration");
    assert_eq!(response["message"], "error parsing interval 'bogus'");
    assert!(response.get("sql").is_none());
}

#[tokio::test]
async fn test_expand_unknown_macro_after_valid_ones() {
    let (app, _state) = test_app();

    let (status, response) =
        expand_fixed(app, "SELECT $__timeFrom(), $__nope() FROM t").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["kind"], "unknown_macro");
}

#[tokio::test]
async fn test_expand_invalid_fill_value() {
    let (app, _state) = test_app();

    let (status, response) =
        expand_fixed(app, "SELECT $__timeGroup(ts, '1m', previous) FROM m").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["kind"], "invalid_numeric_literal");
    assert_eq!(response["message"], "error parsing fill value previous");
}

#[tokio::test]
async fn test_expand_invalid_time_range() {
    let (app, _state) = test_app();

    let (status, response) = post_json(
        app,
        "/api/v1/expand",
        json!({ "sql": "SELECT 1", "from": "now-1x", "to": "now" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_time_range");
}

#[tokio::test]
async fn test_expand_validation_failure() {
    let (app, _state) = test_app();

    let (status, response) = post_json(
        app,
        "/api/v1/expand",
        json!({ "sql": "SELECT 1", "from": "", "to": "now" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "validation_failed");
}
