//! HTTP client for the external water-level inference service.
//!
//! The service exposes three endpoints: image analysis (`POST /predict`,
//! multipart), the dataset file listing (`GET /api/files`), and per-file
//! simulation (`GET /api/simulate/{filename}`). This crate wraps them with
//! typed results and a failure taxonomy that keeps a genuine zero-level
//! reading distinct from every error class.

pub mod client;
pub mod messages;

pub use client::{InferenceClient, InferenceError};
pub use messages::{Prediction, SimulateFrame};
