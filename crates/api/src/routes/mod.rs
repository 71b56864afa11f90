//! Route modules, one per resource.

use axum::Router;

use crate::state::AppState;

pub mod analyze;
pub mod archives;
pub mod health;
pub mod playback;
pub mod session;

/// All versioned API routes, mounted under `/api/v1` by the router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(analyze::router())
        .nest("/session", session::router())
        .nest("/archives", archives::router())
        .nest("/playback", playback::router())
}
