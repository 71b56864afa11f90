//! The playback state machine.
//!
//! Two states, Idle and Playing. While playing, a `tokio::time::interval`
//! drives one tick per cadence period: fetch the frame at the cursor,
//! append the observation, update the display state, advance the cursor.
//! The tick body awaits its fetch inline, so ticks never overlap and
//! observations land in issue order even under slow responses.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use ouedguard_core::{
    fallback_report, types, CoreError, FloodStatus, Observation, StatusPolicy,
    DEFAULT_ALERT_THRESHOLD,
};
use ouedguard_store::SessionStore;

use crate::source::FrameSource;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What happens when the cursor passes the last file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndBehavior {
    /// Wrap modulo the list length and replay forever (default).
    Loop,
    /// Transition to Idle after the last file; a later start replays from
    /// the beginning.
    Stop,
}

/// Playback tuning, fixed at construction.
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Time between ticks. The first tick fires one cadence after start.
    pub cadence: Duration,
    pub end_behavior: EndBehavior,
    /// How each frame's flood status is determined.
    pub status_policy: StatusPolicy,
    /// Threshold used by the fallback report narrative.
    pub alert_threshold: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            cadence: Duration::from_secs(3),
            end_behavior: EndBehavior::Loop,
            status_policy: StatusPolicy::ServerReported,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }
}

// ---------------------------------------------------------------------------
// Status snapshot
// ---------------------------------------------------------------------------

/// Point-in-time view of the controller for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackStatus {
    pub playing: bool,
    /// Index of the next frame to be fetched.
    pub cursor: usize,
    /// Number of dataset images available.
    pub total: usize,
    /// Preview of the most recently replayed frame.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub level: f64,
    pub status: FloodStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

struct Shared {
    files: Vec<String>,
    cursor: usize,
    playing: bool,
    /// Token of the active run; cancelling it prevents all further ticks.
    cancel: Option<CancellationToken>,
    // Auxiliary display state, mirrored from the latest replayed frame.
    image: Option<String>,
    level: f64,
    status: FloodStatus,
    report: Option<String>,
}

enum TickOutcome {
    Continue,
    ReachedEnd,
}

/// Timer-driven replay of the dataset image stream.
///
/// Cheaply cloneable handle; all clones drive the same state machine.
#[derive(Clone)]
pub struct PlaybackController {
    source: Arc<dyn FrameSource>,
    session: Arc<SessionStore>,
    config: PlaybackConfig,
    shared: Arc<Mutex<Shared>>,
}

impl PlaybackController {
    /// Build the controller, fetching the dataset file list once.
    ///
    /// A failed listing is tolerated: playback simply refuses to start
    /// until the service is back and the process restarted with it.
    pub async fn init(
        source: Arc<dyn FrameSource>,
        session: Arc<SessionStore>,
        config: PlaybackConfig,
    ) -> Self {
        let files = match source.list().await {
            Ok(files) => {
                tracing::info!(files = files.len(), "Dataset file list loaded");
                files
            }
            Err(err) => {
                tracing::warn!(error = %err, "Could not load dataset file list; playback disabled");
                Vec::new()
            }
        };
        Self::with_files(source, session, config, files)
    }

    /// Build the controller over an already-known file list.
    pub fn with_files(
        source: Arc<dyn FrameSource>,
        session: Arc<SessionStore>,
        config: PlaybackConfig,
        files: Vec<String>,
    ) -> Self {
        Self {
            source,
            session,
            config,
            shared: Arc::new(Mutex::new(Shared {
                files,
                cursor: 0,
                playing: false,
                cancel: None,
                image: None,
                level: 0.0,
                status: FloodStatus::Normal,
                report: None,
            })),
        }
    }

    /// Idle → Playing.
    ///
    /// Starting while already playing is a no-op; starting with an empty
    /// file list is a validation rejection (the terminal configuration
    /// case — there is nothing to replay).
    pub fn start(&self) -> Result<(), CoreError> {
        let token = {
            let mut shared = self.shared.lock().unwrap();
            if shared.playing {
                return Ok(());
            }
            if shared.files.is_empty() {
                return Err(CoreError::Validation(
                    "No dataset images available; cannot start playback".into(),
                ));
            }
            let token = CancellationToken::new();
            shared.cancel = Some(token.clone());
            shared.playing = true;
            token
        };

        tracing::info!(
            cadence_secs = self.config.cadence.as_secs_f64(),
            "Playback started"
        );
        let controller = self.clone();
        tokio::spawn(async move { controller.run(token).await });
        Ok(())
    }

    /// Playing → Idle.
    ///
    /// Cancels the pending tick; nothing further is scheduled. A fetch
    /// already in flight may still apply its result (best-effort), but no
    /// new tick begins after this returns. Idempotent.
    pub fn pause(&self) {
        let mut shared = self.shared.lock().unwrap();
        if let Some(cancel) = shared.cancel.take() {
            cancel.cancel();
            tracing::info!("Playback paused");
        }
        shared.playing = false;
    }

    /// Snapshot of the controller state for the dashboard.
    pub fn status(&self) -> PlaybackStatus {
        let shared = self.shared.lock().unwrap();
        PlaybackStatus {
            playing: shared.playing,
            cursor: shared.cursor,
            total: shared.files.len(),
            image: shared.image.clone(),
            level: shared.level,
            status: shared.status,
            report: shared.report.clone(),
        }
    }

    // ---- run loop ----

    async fn run(self, cancel: CancellationToken) {
        let mut ticker = interval_at(Instant::now() + self.config.cadence, self.config.cadence);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    // A pause that raced this tick wins: stop before fetching.
                    if cancel.is_cancelled() {
                        break;
                    }
                    match self.run_tick().await {
                        TickOutcome::Continue => {}
                        TickOutcome::ReachedEnd => {
                            self.finish(&cancel);
                            break;
                        }
                    }
                }
            }
        }
    }

    /// One playback tick: fetch, append, update display state, advance.
    async fn run_tick(&self) -> TickOutcome {
        let filename = {
            let shared = self.shared.lock().unwrap();
            shared.files[shared.cursor].clone()
        };

        let frame = match self.source.fetch(&filename).await {
            Ok(frame) => frame,
            Err(err) => {
                // Transient failure: keep the cursor so the next tick
                // retries this frame, and keep playing.
                tracing::warn!(file = %filename, error = %err, "Playback fetch failed; will retry next tick");
                return TickOutcome::Continue;
            }
        };

        let status = self.config.status_policy.resolve(frame.status, frame.level);
        let narrative = frame
            .report
            .clone()
            .unwrap_or_else(|| fallback_report(frame.level, self.config.alert_threshold));

        self.session.append(Observation {
            time: types::now_point_time(),
            level: frame.level,
            status,
            img: Some(frame.image.clone()),
            report: Some(narrative),
        });

        let mut shared = self.shared.lock().unwrap();
        shared.image = Some(frame.image);
        shared.level = frame.level;
        shared.status = status;
        // The displayed report only changes when the service produced one.
        if frame.report.is_some() {
            shared.report = frame.report;
        }

        let next = shared.cursor + 1;
        if next >= shared.files.len() {
            shared.cursor = 0;
            match self.config.end_behavior {
                EndBehavior::Loop => TickOutcome::Continue,
                EndBehavior::Stop => TickOutcome::ReachedEnd,
            }
        } else {
            shared.cursor = next;
            TickOutcome::Continue
        }
    }

    /// Natural end of a `Stop` run. Skipped when a pause already won the
    /// race and owns the state transition.
    fn finish(&self, cancel: &CancellationToken) {
        let mut shared = self.shared.lock().unwrap();
        if !cancel.is_cancelled() {
            shared.playing = false;
            shared.cancel = None;
            tracing::info!("Playback reached end of dataset");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
