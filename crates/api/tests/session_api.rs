//! Integration tests for the live session and the archive flow.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post_json, sample_point};
use ouedguard_core::FloodStatus;
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: GET /session on a fresh server
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fresh_session_is_empty_with_a_start_time() {
    let (app, _) = build_test_app(Vec::new());
    let response = get(&app, "/api/v1/session").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["start"].is_string());
    assert_eq!(json["data"]["points"].as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// Test: GET /session reflects appended observations in order
// ---------------------------------------------------------------------------

#[tokio::test]
async fn session_lists_points_in_insertion_order() {
    let (app, handles) = build_test_app(Vec::new());
    handles.session.append(sample_point(25.0, FloodStatus::Flood));
    handles.session.append(sample_point(10.0, FloodStatus::Normal));

    let json = body_json(get(&app, "/api/v1/session").await).await;
    let points = json["data"]["points"].as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["level"], 25.0);
    assert_eq!(points[0]["status"], "Flood");
    assert_eq!(points[1]["level"], 10.0);
    assert_eq!(points[1]["status"], "Normal");
}

// ---------------------------------------------------------------------------
// Test: GET /session/recent windows without truncating
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recent_returns_last_points_only() {
    let (app, handles) = build_test_app(Vec::new());
    for i in 0..15 {
        handles
            .session
            .append(sample_point(i as f64, FloodStatus::Normal));
    }

    // Default window is 10.
    let json = body_json(get(&app, "/api/v1/session/recent").await).await;
    let points = json["data"].as_array().unwrap();
    assert_eq!(points.len(), 10);
    assert_eq!(points[0]["level"], 5.0);

    // Explicit limit.
    let json = body_json(get(&app, "/api/v1/session/recent?limit=3").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    // The full session is untouched.
    let json = body_json(get(&app, "/api/v1/session").await).await;
    assert_eq!(json["data"]["points"].as_array().unwrap().len(), 15);
}

// ---------------------------------------------------------------------------
// Test: DELETE /session discards without archiving
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reset_discards_the_session() {
    let (app, handles) = build_test_app(Vec::new());
    handles.session.append(sample_point(25.0, FloodStatus::Flood));

    let response = common::delete(&app, "/api/v1/session").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(handles.session.is_empty());
    // Nothing was archived.
    assert_eq!(handles.archives.len(), 0);
}

// ---------------------------------------------------------------------------
// Test: archiving moves the session into the archive store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn archive_snapshots_and_resets_the_session() {
    let (app, handles) = build_test_app(Vec::new());
    handles.session.append(sample_point(25.5, FloodStatus::Flood));
    handles.session.append(sample_point(10.0, FloodStatus::Normal));
    let (_, expected) = handles.session.snapshot();

    let response = post_json(
        &app,
        "/api/v1/session/archive",
        json!({ "name": "Oued Ourika" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Oued Ourika");
    assert!(json["data"]["id"].is_i64());
    assert_eq!(json["data"]["data"].as_array().unwrap().len(), 2);

    // The live session is now empty; the archive holds the exact points.
    assert!(handles.session.is_empty());
    let archived = handles.archives.list(None);
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].data, expected);
}

// ---------------------------------------------------------------------------
// Test: archiving an empty session is rejected, nothing mutated
// ---------------------------------------------------------------------------

#[tokio::test]
async fn archiving_empty_session_is_rejected() {
    let (app, handles) = build_test_app(Vec::new());

    let response = post_json(
        &app,
        "/api/v1/session/archive",
        json!({ "name": "Oued Ourika" }),
    )
    .await;
    common::assert_error_code(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    assert_eq!(handles.archives.len(), 0);
}

// ---------------------------------------------------------------------------
// Test: archiving without a name is rejected, session kept
// ---------------------------------------------------------------------------

#[tokio::test]
async fn archiving_with_blank_name_is_rejected() {
    let (app, handles) = build_test_app(Vec::new());
    handles.session.append(sample_point(25.0, FloodStatus::Flood));

    let response = post_json(&app, "/api/v1/session/archive", json!({ "name": "  " })).await;
    common::assert_error_code(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    assert_eq!(handles.archives.len(), 0);
    assert_eq!(handles.session.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: malformed archive request body is a client error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_archive_body_is_a_client_error() {
    let (app, _) = build_test_app(Vec::new());
    let response = post_json(&app, "/api/v1/session/archive", json!({})).await;
    assert!(response.status().is_client_error());
}
