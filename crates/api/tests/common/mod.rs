//! Shared harness for the API integration tests.
//!
//! Builds the full application router — identical middleware stack to
//! production — over in-memory storage and a deterministic stub frame
//! source, and exposes the underlying stores so tests can seed state
//! directly.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use ouedguard_api::config::ServerConfig;
use ouedguard_api::router::build_app_router;
use ouedguard_api::state::AppState;
use ouedguard_core::{FloodStatus, Observation, StatusPolicy, DEFAULT_ALERT_THRESHOLD};
use ouedguard_inference::{InferenceClient, InferenceError, SimulateFrame};
use ouedguard_playback::{EndBehavior, FrameSource, PlaybackController};
use ouedguard_store::{ArchiveStore, MemoryStorage, SessionStore};

/// Frame source stub: `a.jpg` floods at 25%, everything else is a calm
/// 10%. Listing returns whatever the test configured.
pub struct StubSource {
    pub files: Vec<String>,
}

#[async_trait]
impl FrameSource for StubSource {
    async fn list(&self) -> Result<Vec<String>, InferenceError> {
        Ok(self.files.clone())
    }

    async fn fetch(&self, filename: &str) -> Result<SimulateFrame, InferenceError> {
        if filename == "a.jpg" {
            Ok(SimulateFrame {
                image: "data:image/jpeg;base64,aaaa".into(),
                level: 25.0,
                status: FloodStatus::Flood,
                report: Some("crue en cours".into()),
            })
        } else {
            Ok(SimulateFrame {
                image: "data:image/jpeg;base64,bbbb".into(),
                level: 10.0,
                status: FloodStatus::Normal,
                report: None,
            })
        }
    }
}

/// Handles into the state behind the router, for seeding and asserting.
pub struct TestHandles {
    pub session: Arc<SessionStore>,
    pub archives: Arc<ArchiveStore>,
}

/// Build a test `ServerConfig` with safe defaults.
///
/// The inference URLs point at a closed local port so any accidental
/// network call fails fast as a connection error. The playback cadence is
/// long enough that no tick fires within a test.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        inference_url: "http://127.0.0.1:1".to_string(),
        dataset_url: "http://127.0.0.1:1".to_string(),
        storage_dir: "./unused".to_string(),
        playback_cadence_secs: 600,
        playback_end_behavior: EndBehavior::Loop,
        status_policy: StatusPolicy::ServerReported,
        alert_threshold: DEFAULT_ALERT_THRESHOLD,
        session_window: None,
    }
}

/// Build the full application router over in-memory state.
///
/// `files` is the dataset listing the playback controller sees (empty to
/// exercise the nothing-to-replay rejection).
pub fn build_test_app(files: Vec<String>) -> (Router, TestHandles) {
    let config = test_config();
    let storage = Arc::new(MemoryStorage::new());
    let session = Arc::new(SessionStore::open(storage.clone(), config.session_window));
    let archives = Arc::new(ArchiveStore::open(storage));

    let inference = Arc::new(InferenceClient::new(
        config.inference_url.clone(),
        config.dataset_url.clone(),
    ));
    let playback = PlaybackController::with_files(
        Arc::new(StubSource {
            files: files.clone(),
        }),
        session.clone(),
        config.playback(),
        files,
    );

    let state = AppState {
        session: session.clone(),
        archives: archives.clone(),
        inference,
        playback,
        config: Arc::new(config.clone()),
    };

    (
        build_app_router(state, &config),
        TestHandles { session, archives },
    )
}

/// A sample observation for seeding the live session.
pub fn sample_point(level: f64, status: FloodStatus) -> Observation {
    Observation {
        time: "12:00:00".into(),
        level,
        status,
        img: Some("data:image/jpeg;base64,xxxx".into()),
        report: Some("rapport".into()),
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_empty(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn delete(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a `{ "error": ..., "code": ... }` body with the given code.
pub async fn assert_error_code(response: Response, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code);
    assert!(json["error"].is_string());
}
