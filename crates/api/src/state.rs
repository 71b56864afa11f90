use std::sync::Arc;

use ouedguard_inference::InferenceClient;
use ouedguard_playback::PlaybackController;
use ouedguard_store::{ArchiveStore, SessionStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The monitoring session in progress.
    pub session: Arc<SessionStore>,
    /// Completed, immutable sessions.
    pub archives: Arc<ArchiveStore>,
    /// Client for the external inference service.
    pub inference: Arc<InferenceClient>,
    /// Dataset playback state machine (cheaply cloneable handle).
    pub playback: PlaybackController,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
