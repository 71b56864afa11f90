//! REST client for the inference service.
//!
//! Wraps the three service endpoints using [`reqwest`]. Every call is a
//! single best-effort attempt — no retries; the caller (a request handler
//! or the playback loop) decides whether to carry on after a failure.

use reqwest::multipart;

use ouedguard_core::{round_level, FloodStatus};

use crate::messages::{PredictResponse, Prediction, SimulateFrame, SimulateResponse};

/// Errors from the inference service layer.
///
/// The three classes are deliberately distinct from a successful reading:
/// a `level` of 0 is a valid result and never produces an error.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// The service could not be reached (connection, DNS, timeout, or a
    /// transport failure mid-response).
    #[error("Inference service unreachable: {0}")]
    Connection(String),

    /// The service responded but flagged a failure — either an explicit
    /// `error` field (surfaced verbatim) or a non-2xx status.
    #[error("Inference service error: {0}")]
    Service(String),

    /// The response body is not well-formed.
    #[error("Malformed inference response: {0}")]
    Decode(String),
}

/// HTTP client for the inference service.
///
/// Holds a pooled [`reqwest::Client`] plus the two base URLs: the predict
/// endpoint and the dataset (file-listing / simulate) endpoint. Most
/// deployments point both at the same host.
pub struct InferenceClient {
    client: reqwest::Client,
    predict_url: String,
    dataset_url: String,
}

impl InferenceClient {
    /// Create a client for the given base URLs (no trailing slash),
    /// e.g. `http://127.0.0.1:5001`.
    pub fn new(predict_url: String, dataset_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            predict_url,
            dataset_url,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, predict_url: String, dataset_url: String) -> Self {
        Self {
            client,
            predict_url,
            dataset_url,
        }
    }

    /// Analyze one image.
    ///
    /// Sends `POST /predict` with a single multipart file field named
    /// `image`. No local validation is performed on the bytes — any raster
    /// format the service accepts is fine.
    pub async fn predict(
        &self,
        image: Vec<u8>,
        filename: &str,
    ) -> Result<Prediction, InferenceError> {
        let part = multipart::Part::bytes(image).file_name(filename.to_string());
        let form = multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(format!("{}/predict", self.predict_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| InferenceError::Connection(e.to_string()))?;

        let raw: PredictResponse = Self::parse_response(response).await?;

        // An `error` field is a service-reported failure, surfaced
        // verbatim — never folded into a zero-level reading.
        if let Some(error) = raw.error {
            return Err(InferenceError::Service(error));
        }

        let level = raw
            .level
            .ok_or_else(|| InferenceError::Decode("response is missing `level`".into()))?;

        Ok(Prediction {
            level: round_level(level),
            status: raw
                .status
                .as_deref()
                .map(FloodStatus::from_service_label)
                .unwrap_or(FloodStatus::Normal),
            report: raw.report,
        })
    }

    /// Fetch the ordered list of dataset image filenames.
    ///
    /// Sends `GET /api/files`.
    pub async fn list_files(&self) -> Result<Vec<String>, InferenceError> {
        let response = self
            .client
            .get(format!("{}/api/files", self.dataset_url))
            .send()
            .await
            .map_err(|e| InferenceError::Connection(e.to_string()))?;

        Self::parse_response(response).await
    }

    /// Replay one dataset image through the service.
    ///
    /// Sends `GET /api/simulate/{filename}` and returns the embedded
    /// image plus its analysis.
    pub async fn simulate(&self, filename: &str) -> Result<SimulateFrame, InferenceError> {
        let response = self
            .client
            .get(format!("{}/api/simulate/{}", self.dataset_url, filename))
            .send()
            .await
            .map_err(|e| InferenceError::Connection(e.to_string()))?;

        let raw: SimulateResponse = Self::parse_response(response).await?;
        Ok(raw.into_frame())
    }

    // ---- private helpers ----

    /// Read the body, map a non-2xx status to a service error (status and
    /// body preserved), and decode the JSON into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, InferenceError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InferenceError::Connection(e.to_string()))?;

        if !status.is_success() {
            return Err(InferenceError::Service(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        serde_json::from_str(&body).map_err(|e| InferenceError::Decode(e.to_string()))
    }
}
