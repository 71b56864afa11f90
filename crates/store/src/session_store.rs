//! The live session store: the in-progress buffer plus its durable mirror.

use std::sync::{Arc, Mutex};

use ouedguard_core::{types, Observation, SessionBuffer};

use crate::keys::{KEY_CHART, KEY_SESSION_START};
use crate::storage::{load_json_or_default, Storage};

/// The monitoring session currently in progress.
///
/// A single mutex guards the buffer, giving the multi-client server the
/// mutual exclusion the single-threaded dashboard got for free. Every
/// mutation is mirrored into durable storage under the session keys;
/// mirroring is best-effort — a failed write is logged and the in-memory
/// state stays authoritative, so a crash loses at most the latest point.
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    buffer: Mutex<SessionBuffer>,
}

impl SessionStore {
    /// Open the store, restoring any persisted in-progress session.
    ///
    /// `cap` of `None` keeps the full session (archival variant); `Some(n)`
    /// keeps a sliding window of the `n` most recent points.
    pub fn open(storage: Arc<dyn Storage>, cap: Option<usize>) -> Self {
        let points: Vec<Observation> = load_json_or_default(storage.as_ref(), KEY_CHART);
        let started_at = match storage.load(KEY_SESSION_START) {
            Ok(Some(saved)) if !saved.is_empty() => saved,
            Ok(_) => types::now_session_time(),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read session start; using now");
                types::now_session_time()
            }
        };

        if !points.is_empty() {
            tracing::info!(points = points.len(), started_at = %started_at, "Restored in-progress session");
        }

        Self {
            storage,
            buffer: Mutex::new(SessionBuffer::from_parts(points, started_at, cap)),
        }
    }

    /// Append one observation to the live session.
    ///
    /// The first observation of a fresh session re-stamps the session
    /// start, matching the dashboard behavior of starting a session
    /// implicitly on first analysis.
    pub fn append(&self, point: Observation) {
        let mut buffer = self.buffer.lock().unwrap();
        if buffer.is_empty() {
            buffer.set_started_at(types::now_session_time());
        }
        buffer.append(point);
        self.mirror(&buffer);
    }

    /// Clear the session and stamp a fresh start time.
    pub fn reset(&self) {
        let mut buffer = self.buffer.lock().unwrap();
        buffer.reset(types::now_session_time());
        self.mirror(&buffer);
    }

    /// Start timestamp and an immutable copy of the current points.
    pub fn snapshot(&self) -> (String, Vec<Observation>) {
        let buffer = self.buffer.lock().unwrap();
        (buffer.started_at().to_string(), buffer.snapshot())
    }

    /// Atomically take the whole session for archival, leaving a fresh
    /// empty one behind. Returns `None` (and leaves everything untouched)
    /// when the session is empty; no append can interleave between the
    /// emptiness check and the drain.
    pub fn try_drain(&self) -> Option<(String, Vec<Observation>)> {
        let mut buffer = self.buffer.lock().unwrap();
        if buffer.is_empty() {
            return None;
        }
        let drained = buffer.drain(types::now_session_time());
        self.mirror(&buffer);
        Some(drained)
    }

    /// The most recent `limit` points, in insertion order.
    pub fn recent(&self, limit: usize) -> Vec<Observation> {
        self.buffer.lock().unwrap().recent(limit).to_vec()
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().unwrap().is_empty()
    }

    /// Mirror the buffer into durable storage. Best-effort by design.
    fn mirror(&self, buffer: &SessionBuffer) {
        let encoded = match serde_json::to_string(buffer.points()) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to encode session points; skipping mirror");
                return;
            }
        };
        if let Err(err) = self.storage.save(KEY_CHART, &encoded) {
            tracing::warn!(error = %err, "Failed to mirror session points");
        }
        if let Err(err) = self.storage.save(KEY_SESSION_START, buffer.started_at()) {
            tracing::warn!(error = %err, "Failed to mirror session start");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
