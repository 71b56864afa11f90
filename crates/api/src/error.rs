use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use ouedguard_core::CoreError;
use ouedguard_inference::InferenceError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain and inference error types and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON
/// error responses. Storage failures never appear here: durable
/// mirroring is best-effort and absorbed inside the stores.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `ouedguard-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure talking to the inference service.
    #[error(transparent)]
    Inference(#[from] InferenceError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Inference errors ---
            // All upstream failures map to 502; the message is surfaced
            // verbatim so a service-reported error reaches the user
            // unchanged (a zero-level reading never lands here).
            AppError::Inference(err) => match err {
                InferenceError::Connection(msg) => {
                    tracing::warn!(error = %msg, "Inference service unreachable");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_UNREACHABLE",
                        err.to_string(),
                    )
                }
                InferenceError::Service(_) => {
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", err.to_string())
                }
                InferenceError::Decode(_) => (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_MALFORMED",
                    err.to_string(),
                ),
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
