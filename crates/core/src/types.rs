//! Shared type aliases and display-timestamp formatting.

use chrono::{DateTime, Local};

/// Identifier of an archived session: epoch milliseconds at archival time,
/// kept strictly monotonic by [`crate::session::next_archive_id`].
pub type ArchiveId = i64;

/// Format used for individual observation timestamps (`14:32:07`).
const POINT_TIME_FORMAT: &str = "%H:%M:%S";

/// Format used for session start/end bounds (`07/08/2026 14:32:07`).
const SESSION_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Display timestamp for a single observation point.
///
/// These strings are for presentation only: insertion order, not the
/// timestamp text, is the temporal ordering guarantee within a session.
pub fn format_point_time(at: DateTime<Local>) -> String {
    at.format(POINT_TIME_FORMAT).to_string()
}

/// Display timestamp for session start/end bounds.
pub fn format_session_time(at: DateTime<Local>) -> String {
    at.format(SESSION_TIME_FORMAT).to_string()
}

/// Current local time formatted for an observation point.
pub fn now_point_time() -> String {
    format_point_time(Local::now())
}

/// Current local time formatted for a session bound.
pub fn now_session_time() -> String {
    format_session_time(Local::now())
}
