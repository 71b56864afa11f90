use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ouedguard_api::config::ServerConfig;
use ouedguard_api::router::build_app_router;
use ouedguard_api::state::AppState;
use ouedguard_inference::InferenceClient;
use ouedguard_playback::{FrameSource, PlaybackController};
use ouedguard_store::{ArchiveStore, FileStorage, SessionStore, Storage};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ouedguard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Durable storage ---
    let storage: Arc<dyn Storage> =
        Arc::new(FileStorage::open(&config.storage_dir).expect("Failed to open storage directory"));
    tracing::info!(dir = %config.storage_dir, "Durable storage opened");

    // Restores any session that was in progress when the server last
    // stopped, mirroring the dashboard's reload behavior.
    let session = Arc::new(SessionStore::open(storage.clone(), config.session_window));
    let archives = Arc::new(ArchiveStore::open(storage.clone()));

    // --- Inference client ---
    let inference = Arc::new(InferenceClient::new(
        config.inference_url.clone(),
        config.dataset_url.clone(),
    ));
    tracing::info!(
        inference_url = %config.inference_url,
        dataset_url = %config.dataset_url,
        "Inference client ready"
    );

    // --- Playback controller ---
    // The dataset file list is fetched once here; an unreachable dataset
    // service only disables playback, it does not prevent startup.
    let source: Arc<dyn FrameSource> = inference.clone();
    let playback = PlaybackController::init(source, session.clone(), config.playback()).await;

    // --- App state ---
    let state = AppState {
        session,
        archives,
        inference,
        playback: playback.clone(),
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    // Stop the playback loop so no tick lands after the server is gone.
    playback.pause();
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
