//! Integration tests for the macro listing endpoint.

use axum::http::StatusCode;

use super::common::{get, test_app};

#[tokio::test]
async fn test_lists_every_mysql_macro() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/api/v1/macros").await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = response["macros"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();

    assert_eq!(
        names,
        vec![
            "__time",
            "__timeEpoch",
            "__timeFilter",
            "__timeFrom",
            "__timeGroup",
            "__timeTo",
            "__unixEpochFilter",
            "__unixEpochFrom",
            "__unixEpochTo",
            "__wherein",
        ]
    );
}

#[tokio::test]
async fn test_listing_matches_state() {
    let (app, state) = test_app();

    let (_, response) = get(app, "/api/v1/macros").await;
    let listed = response["macros"].as_array().unwrap().len();

    assert_eq!(listed, state.engine().registry().names().len());
}
