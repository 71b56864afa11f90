//! Wire types for the inference service endpoints.
//!
//! The service is a small Flask application; field names follow its JSON
//! exactly, including the French `rapport` spelling (accepted alongside
//! `report`).

use serde::Deserialize;

use ouedguard_core::{round_level, FloodStatus};

// ---------------------------------------------------------------------------
// Raw responses
// ---------------------------------------------------------------------------

/// Body of a `POST /predict` response.
///
/// Every field is optional on the wire: a failing analysis carries only
/// `error`, and older service builds omit `status`/`report` entirely.
#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    pub level: Option<f64>,
    pub status: Option<String>,
    #[serde(alias = "rapport")]
    pub report: Option<String>,
    /// Service-side processing failure, to be surfaced verbatim.
    pub error: Option<String>,
}

/// Body of a `GET /api/simulate/{filename}` response.
#[derive(Debug, Deserialize)]
pub struct SimulateResponse {
    /// Self-contained encoded image (a data URL) for display.
    pub image_data: String,
    pub level: f64,
    pub status: String,
    #[serde(alias = "report")]
    pub rapport: Option<String>,
}

// ---------------------------------------------------------------------------
// Typed results
// ---------------------------------------------------------------------------

/// A successful analysis of one uploaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Water level percentage, rounded to 2 decimal places.
    pub level: f64,
    /// Status as reported by the service (before any local policy).
    pub status: FloodStatus,
    pub report: Option<String>,
}

/// One replayed dataset frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulateFrame {
    /// Embedded image preview, owned by the frame.
    pub image: String,
    pub level: f64,
    pub status: FloodStatus,
    pub report: Option<String>,
}

impl SimulateResponse {
    pub fn into_frame(self) -> SimulateFrame {
        SimulateFrame {
            image: self.image_data,
            level: round_level(self.level),
            status: FloodStatus::from_service_label(&self.status),
            report: self.rapport,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_response_accepts_rapport_alias() {
        let raw = r#"{"level": 25.5, "status": "Inondation", "rapport": "crue en cours"}"#;
        let parsed: PredictResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.level, Some(25.5));
        assert_eq!(parsed.report.as_deref(), Some("crue en cours"));
        assert!(parsed.error.is_none());
    }

    #[test]
    fn predict_response_accepts_report_spelling() {
        let raw = r#"{"level": 3.0, "report": "tout va bien"}"#;
        let parsed: PredictResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.report.as_deref(), Some("tout va bien"));
    }

    #[test]
    fn predict_response_with_only_error_field() {
        let raw = r#"{"error": "segmentation failed"}"#;
        let parsed: PredictResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.level.is_none());
        assert_eq!(parsed.error.as_deref(), Some("segmentation failed"));
    }

    #[test]
    fn simulate_response_maps_to_frame() {
        let raw = r#"{
            "image_data": "data:image/jpeg;base64,abcd",
            "level": 61.239,
            "status": "Inondation",
            "rapport": "débordement imminent"
        }"#;
        let frame: SimulateFrame = serde_json::from_str::<SimulateResponse>(raw)
            .unwrap()
            .into_frame();
        assert_eq!(frame.image, "data:image/jpeg;base64,abcd");
        assert_eq!(frame.level, 61.24);
        assert_eq!(frame.status, FloodStatus::Flood);
        assert_eq!(frame.report.as_deref(), Some("débordement imminent"));
    }

    #[test]
    fn simulate_response_without_report() {
        let raw = r#"{"image_data": "d", "level": 4.0, "status": "Normal"}"#;
        let frame = serde_json::from_str::<SimulateResponse>(raw)
            .unwrap()
            .into_frame();
        assert_eq!(frame.status, FloodStatus::Normal);
        assert!(frame.report.is_none());
    }
}
