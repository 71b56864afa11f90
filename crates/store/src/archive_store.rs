//! The archive store: completed sessions, most recently archived first.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use ouedguard_core::{
    filter_by_name, next_archive_id, types, validate_archive, ArchiveId, ArchivedSession,
    CoreError,
};

use crate::keys::KEY_ARCHIVES;
use crate::session_store::SessionStore;
use crate::storage::{load_json_or_default, Storage};

struct Inner {
    /// Stored order: most recently archived first.
    sessions: Vec<ArchivedSession>,
    /// Highest id handed out, so same-millisecond archives never collide.
    last_id: Option<ArchiveId>,
}

/// Durable collection of completed sessions, keyed by id.
///
/// Archived sessions are immutable: the only mutations are prepending a
/// new archive and removing one whole record by id. Id assignment happens
/// under the store's lock (duplicate ids are impossible even with several
/// dashboard clients archiving at once).
pub struct ArchiveStore {
    storage: Arc<dyn Storage>,
    inner: Mutex<Inner>,
}

impl ArchiveStore {
    /// Open the store, loading any persisted archives. Corrupt stored
    /// state degrades to an empty collection with a logged warning.
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let sessions: Vec<ArchivedSession> = load_json_or_default(storage.as_ref(), KEY_ARCHIVES);
        let last_id = sessions.iter().map(|s| s.id).max();

        if !sessions.is_empty() {
            tracing::info!(archives = sessions.len(), "Loaded archived sessions");
        }

        Self {
            storage,
            inner: Mutex::new(Inner { sessions, last_id }),
        }
    }

    /// Archive the live session under `name` and reset it.
    ///
    /// Rejected (nothing mutated, user-visible error) when the name is
    /// blank or the session has no observations. On success the new
    /// archive is prepended and the live session starts fresh; from the
    /// caller's point of view the whole step is atomic.
    pub fn archive_from(
        &self,
        name: &str,
        session: &SessionStore,
        final_threshold: Option<f64>,
    ) -> Result<ArchivedSession, CoreError> {
        let name = name.trim();
        validate_archive(name, session.len())?;

        // The length check above is advisory; try_drain re-checks under
        // the session lock so a concurrent archive cannot race us into
        // archiving an empty session.
        let Some((start, points)) = session.try_drain() else {
            return Err(CoreError::Validation(
                "Cannot archive a session with no observations".into(),
            ));
        };
        let end = types::now_session_time();

        let mut inner = self.inner.lock().unwrap();
        let id = next_archive_id(inner.last_id, Utc::now().timestamp_millis());
        inner.last_id = Some(id);

        let archived = ArchivedSession {
            id,
            name: name.to_string(),
            start,
            end,
            data: points,
            final_threshold,
        };
        inner.sessions.insert(0, archived.clone());
        self.persist(&inner.sessions);

        tracing::info!(id, name, points = archived.data.len(), "Session archived");
        Ok(archived)
    }

    /// Archives whose name contains `filter` (case-insensitive), in
    /// stored order. `None` or an empty filter returns everything.
    pub fn list(&self, filter: Option<&str>) -> Vec<ArchivedSession> {
        let inner = self.inner.lock().unwrap();
        match filter {
            Some(needle) if !needle.is_empty() => filter_by_name(&inner.sessions, needle)
                .into_iter()
                .cloned()
                .collect(),
            _ => inner.sessions.clone(),
        }
    }

    /// Look up a single archive by id.
    pub fn get(&self, id: ArchiveId) -> Option<ArchivedSession> {
        let inner = self.inner.lock().unwrap();
        inner.sessions.iter().find(|s| s.id == id).cloned()
    }

    /// Remove the archive with `id`. Idempotent: deleting an unknown id
    /// is a no-op (and writes nothing), not an error.
    pub fn delete(&self, id: ArchiveId) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.sessions.len();
        inner.sessions.retain(|session| session.id != id);
        if inner.sessions.len() == before {
            return false;
        }
        self.persist(&inner.sessions);
        tracing::info!(id, "Archive deleted");
        true
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().sessions.is_empty()
    }

    /// Write the collection to durable storage. Best-effort, like the
    /// session mirror: the in-memory state stays authoritative.
    fn persist(&self, sessions: &[ArchivedSession]) {
        let encoded = match serde_json::to_string(sessions) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to encode archives; skipping persist");
                return;
            }
        };
        if let Err(err) = self.storage.save(KEY_ARCHIVES, &encoded) {
            tracing::warn!(error = %err, "Failed to persist archives");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
