//! Durable state for OuedGuard sessions and archives.
//!
//! Persistence goes through an explicit port — the [`Storage`] trait — so
//! business logic never touches ambient global state:
//!
//! - [`MemoryStorage`] — in-memory implementation for tests.
//! - [`FileStorage`] — one JSON document per key under a data directory,
//!   the server-side analog of the browser-local store the dashboard
//!   originally persisted into (same keys, same layout).
//!
//! On top of the port sit the two stateful components:
//!
//! - [`SessionStore`] — the live session buffer, mirrored to storage on
//!   every mutation so a restart restores the in-progress session.
//! - [`ArchiveStore`] — the collection of completed sessions, most
//!   recently archived first.

pub mod archive_store;
pub mod keys;
pub mod session_store;
pub mod storage;

pub use archive_store::ArchiveStore;
pub use session_store::SessionStore;
pub use storage::{load_json_or_default, FileStorage, MemoryStorage, Storage, StorageError};
