//! HTTP surface of the OuedGuard monitoring backend.
//!
//! Exposes the live session, the archive collection, manual image
//! analysis, and playback control to dashboard clients. Route modules
//! live under [`routes`]; [`router::build_app_router`] assembles the full
//! middleware stack and is shared between the production binary and the
//! integration tests.

pub mod config;
pub mod error;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
