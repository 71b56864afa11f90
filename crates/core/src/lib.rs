//! OuedGuard domain types and session bookkeeping.
//!
//! This crate holds the pure domain model shared by the rest of the
//! workspace:
//!
//! - [`Observation`] — one analyzed-image result (timestamp, water level,
//!   flood status, optional preview and narrative report).
//! - [`SessionBuffer`] — the ordered, optionally windowed sequence of
//!   observations for the monitoring session in progress.
//! - [`ArchivedSession`] — an immutable, completed session, plus the
//!   validation and filtering rules of the archive collection.
//! - [`StatusPolicy`] — the named policy deciding whether flood status is
//!   trusted from the inference service or derived from the level.
//!
//! Nothing in here performs I/O; persistence and transport live in the
//! `ouedguard-store` and `ouedguard-inference` crates.

pub mod buffer;
pub mod error;
pub mod observation;
pub mod session;
pub mod types;

pub use buffer::{SessionBuffer, DEFAULT_RECENT_WINDOW};
pub use error::CoreError;
pub use observation::{
    fallback_report, round_level, FloodStatus, Observation, StatusPolicy, DEFAULT_ALERT_THRESHOLD,
};
pub use session::{filter_by_name, next_archive_id, validate_archive, ArchivedSession};
pub use types::ArchiveId;
