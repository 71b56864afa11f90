//! Archived sessions: record layout, validation, filtering, id assignment.
//!
//! An archived session is an immutable snapshot of a completed monitoring
//! run. The serde layout matches the durable `oued_archives` records, so
//! archives written by earlier deployments load unchanged.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::observation::Observation;
use crate::types::ArchiveId;

/// A completed, immutable monitoring session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedSession {
    /// Unique id, epoch milliseconds at archival time.
    pub id: ArchiveId,
    /// User-supplied label (the name of the monitored oued).
    pub name: String,
    /// Display-formatted session start.
    pub start: String,
    /// Display-formatted session end (archival time).
    pub end: String,
    /// Full ordered copy of the session's observations.
    pub data: Vec<Observation>,
    /// Alert threshold in force when the session was archived.
    #[serde(
        rename = "finalThreshold",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub final_threshold: Option<f64>,
}

/// Validate an archive request before any state is touched.
///
/// Both rejections are user-visible and mutate nothing: an unnamed archive
/// and an empty session are equally refused.
pub fn validate_archive(name: &str, point_count: usize) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "An archive needs a non-empty name".into(),
        ));
    }
    if point_count == 0 {
        return Err(CoreError::Validation(
            "Cannot archive a session with no observations".into(),
        ));
    }
    Ok(())
}

/// Sessions whose name contains `filter` as a case-insensitive substring,
/// in stored order. An empty filter matches everything. Pure read; never
/// mutates the collection.
pub fn filter_by_name<'a>(
    sessions: &'a [ArchivedSession],
    filter: &str,
) -> Vec<&'a ArchivedSession> {
    let needle = filter.to_lowercase();
    sessions
        .iter()
        .filter(|session| session.name.to_lowercase().contains(&needle))
        .collect()
}

/// Next archive id: time-derived but strictly monotonic.
///
/// Two archives created within the same millisecond (or a clock step
/// backwards) must not collide, so the id is bumped past the last one
/// handed out.
pub fn next_archive_id(last: Option<ArchiveId>, now_millis: i64) -> ArchiveId {
    match last {
        Some(last) => now_millis.max(last + 1),
        None => now_millis,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
