//! Manual image analysis.
//!
//! ```text
//! POST /analyze   multipart field `image` -> analyze
//! ```
//!
//! The uploaded bytes are forwarded to the inference service as-is — no
//! local size or format validation beyond "a file was provided". On
//! success the resulting observation is appended to the live session; on
//! any failure nothing is mutated and the user can simply retry.

use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use ouedguard_core::{fallback_report, types, Observation};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze))
}

/// POST /api/v1/analyze
async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<Observation>>> {
    let (filename, content_type, bytes) = read_image_field(&mut multipart).await?;

    // Build the self-contained preview before the bytes are handed to the
    // inference client; the observation owns its own copy of the image.
    let preview = format!("data:{};base64,{}", content_type, BASE64.encode(&bytes));

    let prediction = state.inference.predict(bytes, &filename).await?;
    let status = state
        .config
        .status_policy
        .resolve(prediction.status, prediction.level);
    let narrative = prediction
        .report
        .clone()
        .unwrap_or_else(|| fallback_report(prediction.level, state.config.alert_threshold));

    let point = Observation {
        time: types::now_point_time(),
        level: prediction.level,
        status,
        img: Some(preview),
        report: Some(narrative),
    };
    state.session.append(point.clone());

    tracing::info!(level = point.level, ?status, "Image analyzed");
    Ok(Json(DataResponse { data: point }))
}

/// Pull the `image` file field out of the multipart body.
async fn read_image_field(
    multipart: &mut Multipart,
) -> Result<(String, String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or("capture.jpg").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read image field: {e}")))?;
        return Ok((filename, content_type, bytes.to_vec()));
    }

    Err(AppError::BadRequest(
        "Missing multipart file field `image`".into(),
    ))
}
