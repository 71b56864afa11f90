//! The archive collection.
//!
//! ```text
//! GET    /        -> list_archives (query: search)
//! GET    /{id}    -> get_archive
//! DELETE /{id}    -> delete_archive
//! ```

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use ouedguard_core::{ArchiveId, ArchivedSession, CoreError};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_archives))
        .route("/{id}", get(get_archive).delete(delete_archive))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    search: Option<String>,
}

/// GET /api/v1/archives
///
/// Case-insensitive name filtering via `?search=`; an absent or empty
/// filter returns every archive, most recently archived first.
async fn list_archives(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<ArchivedSession>>>> {
    let archives = state.archives.list(params.search.as_deref());
    Ok(Json(DataResponse { data: archives }))
}

/// GET /api/v1/archives/{id}
///
/// The full archived session for the detail view.
async fn get_archive(
    State(state): State<AppState>,
    Path(id): Path<ArchiveId>,
) -> AppResult<Json<DataResponse<ArchivedSession>>> {
    let archived = state
        .archives
        .get(id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Archive",
            id,
        }))?;
    Ok(Json(DataResponse { data: archived }))
}

/// DELETE /api/v1/archives/{id}
///
/// Idempotent: deleting an id that does not exist is a no-op, not an
/// error. (The "are you sure" confirmation belongs to the presentation
/// layer, which calls this only after the user confirmed.)
async fn delete_archive(
    State(state): State<AppState>,
    Path(id): Path<ArchiveId>,
) -> AppResult<StatusCode> {
    if !state.archives.delete(id) {
        tracing::debug!(id, "Delete of unknown archive id ignored");
    }
    Ok(StatusCode::NO_CONTENT)
}
