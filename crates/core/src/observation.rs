//! Observation points and the flood-status / report policies.
//!
//! An [`Observation`] is one analyzed-image result. The inference service
//! reports water level as a percentage plus a status label; whether that
//! label is trusted or recomputed locally is an explicit [`StatusPolicy`]
//! choice, configured once and applied in one place.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Water-level percentage above which a reading counts as a flood when the
/// status is derived locally, and above which the fallback report switches
/// to the alert narrative.
pub const DEFAULT_ALERT_THRESHOLD: f64 = 20.0;

// ---------------------------------------------------------------------------
// Flood status
// ---------------------------------------------------------------------------

/// Flood status of a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloodStatus {
    Normal,
    Flood,
}

impl FloodStatus {
    /// Map a status label reported by the inference service.
    ///
    /// The deployed segmentation service labels flood readings in French
    /// (`"Inondation"`); `"Flood"` is accepted for compatibility. Matching
    /// is case-insensitive and anything unrecognized is treated as normal.
    pub fn from_service_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("inondation") || label.eq_ignore_ascii_case("flood") {
            Self::Flood
        } else {
            Self::Normal
        }
    }

    pub fn is_flood(self) -> bool {
        matches!(self, Self::Flood)
    }
}

// ---------------------------------------------------------------------------
// Status policy
// ---------------------------------------------------------------------------

/// How an observation's [`FloodStatus`] is determined.
///
/// The two deployed dashboard variants disagreed on this (one trusted the
/// service label, one compared the level against a threshold), so it is a
/// named policy rather than an implicit difference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusPolicy {
    /// Trust the status reported by the inference service verbatim.
    ServerReported,
    /// Ignore the reported status and derive it from the level:
    /// `level > threshold` is a flood.
    DerivedFromLevel { threshold: f64 },
}

impl StatusPolicy {
    /// Resolve the effective status for a reading.
    pub fn resolve(&self, reported: FloodStatus, level: f64) -> FloodStatus {
        match self {
            Self::ServerReported => reported,
            Self::DerivedFromLevel { threshold } => {
                if level > *threshold {
                    FloodStatus::Flood
                } else {
                    FloodStatus::Normal
                }
            }
        }
    }
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self::ServerReported
    }
}

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// One analyzed-image result.
///
/// `time` is a display-formatted local timestamp generated at receipt; it
/// is not globally orderable. Insertion order within a session is the only
/// temporal ordering guarantee. The preview image is owned by the point
/// (copied, never shared between sessions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Display timestamp (`%H:%M:%S`), assigned at client receipt time.
    pub time: String,
    /// Detected water level, percent, rounded to 2 decimal places.
    pub level: f64,
    /// Flood status after the configured [`StatusPolicy`] was applied.
    pub status: FloodStatus,
    /// Self-contained data-URL preview of the analyzed image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    /// Narrative report for this single observation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

/// Round a level to 2 decimal places.
///
/// Levels arrive from the service with arbitrary float precision; every
/// stored or displayed level goes through this first.
pub fn round_level(level: f64) -> f64 {
    (level * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Fallback report
// ---------------------------------------------------------------------------

/// Local narrative used when the inference service supplies no report.
///
/// Text follows what the service itself produces (French), switching on
/// the alert threshold.
pub fn fallback_report(level: f64, threshold: f64) -> String {
    if level > threshold {
        format!(
            "ALERTE CRUE : Le niveau de l'oued a atteint {level}%. Risque d'inondation détecté."
        )
    } else {
        format!("SITUATION NORMALE : Le niveau est de {level}%. Aucune menace immédiate détectée.")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
