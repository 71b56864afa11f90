//! The live monitoring session.
//!
//! ```text
//! GET    /          -> get_session
//! DELETE /          -> reset_session
//! GET    /recent    -> get_recent (query: limit, default 10)
//! POST   /archive   -> archive_session
//! ```

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use ouedguard_core::{ArchivedSession, Observation, DEFAULT_RECENT_WINDOW};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_session).delete(reset_session))
        .route("/recent", get(get_recent))
        .route("/archive", post(archive_session))
}

/// The live session as rendered by the dashboard.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub start: String,
    pub points: Vec<Observation>,
}

/// GET /api/v1/session
async fn get_session(State(state): State<AppState>) -> AppResult<Json<DataResponse<SessionView>>> {
    let (start, points) = state.session.snapshot();
    Ok(Json(DataResponse {
        data: SessionView { start, points },
    }))
}

/// DELETE /api/v1/session
///
/// Discard the in-progress session without archiving it and stamp a
/// fresh start time. (The confirmation step lives in the presentation
/// layer.)
async fn reset_session(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.session.reset();
    tracing::info!("Live session discarded");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct RecentParams {
    limit: Option<usize>,
}

/// GET /api/v1/session/recent
///
/// Read-only chart window over the most recent points; the underlying
/// session is never truncated by this.
async fn get_recent(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> AppResult<Json<DataResponse<Vec<Observation>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_WINDOW);
    Ok(Json(DataResponse {
        data: state.session.recent(limit),
    }))
}

#[derive(Debug, Deserialize)]
struct ArchiveRequest {
    name: String,
}

/// POST /api/v1/session/archive
///
/// Snapshots the live session into a new archive and resets it, as one
/// atomic step. Rejected with 400 when the session is empty or the name
/// is blank — nothing is mutated in that case.
async fn archive_session(
    State(state): State<AppState>,
    Json(request): Json<ArchiveRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ArchivedSession>>)> {
    let archived = state.archives.archive_from(
        &request.name,
        &state.session,
        Some(state.config.alert_threshold),
    )?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: archived })))
}
