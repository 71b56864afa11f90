//! Timer-driven playback of the dataset image stream.
//!
//! The [`PlaybackController`] replays a fixed list of remote images
//! through the inference service at a steady cadence, appending each
//! result to the live session buffer — an automated stand-in for manual
//! uploads. Pause is a first-class operation backed by a cancellation
//! token: once requested, no further tick is ever scheduled.

pub mod controller;
pub mod source;

pub use controller::{EndBehavior, PlaybackConfig, PlaybackController, PlaybackStatus};
pub use source::FrameSource;
