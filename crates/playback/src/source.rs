//! The frame-source port consumed by the playback controller.

use async_trait::async_trait;

use ouedguard_inference::{InferenceClient, InferenceError, SimulateFrame};

/// Where playback frames come from.
///
/// The controller's state machine only ever talks to this trait, so tests
/// drive it with a deterministic fake and a different deployment can swap
/// the transport without touching the controller.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// The ordered list of available dataset image identifiers.
    async fn list(&self) -> Result<Vec<String>, InferenceError>;

    /// Fetch and analyze one dataset image.
    async fn fetch(&self, filename: &str) -> Result<SimulateFrame, InferenceError>;
}

#[async_trait]
impl FrameSource for InferenceClient {
    async fn list(&self) -> Result<Vec<String>, InferenceError> {
        self.list_files().await
    }

    async fn fetch(&self, filename: &str) -> Result<SimulateFrame, InferenceError> {
        self.simulate(filename).await
    }
}
