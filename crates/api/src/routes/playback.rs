//! Playback control for the dataset simulation.
//!
//! ```text
//! GET  /        -> get_status
//! POST /start   -> start_playback
//! POST /pause   -> pause_playback
//! ```

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use ouedguard_playback::PlaybackStatus;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_status))
        .route("/start", post(start_playback))
        .route("/pause", post(pause_playback))
}

/// GET /api/v1/playback
async fn get_status(State(state): State<AppState>) -> AppResult<Json<DataResponse<PlaybackStatus>>> {
    Ok(Json(DataResponse {
        data: state.playback.status(),
    }))
}

/// POST /api/v1/playback/start
///
/// 400 when the dataset file list is empty (nothing to replay).
async fn start_playback(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PlaybackStatus>>> {
    state.playback.start()?;
    Ok(Json(DataResponse {
        data: state.playback.status(),
    }))
}

/// POST /api/v1/playback/pause
///
/// Idempotent; no further tick runs after this returns.
async fn pause_playback(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PlaybackStatus>>> {
    state.playback.pause();
    Ok(Json(DataResponse {
        data: state.playback.status(),
    }))
}
