//! Durable storage keys.
//!
//! The key names (and the JSON stored under them) are carried over from
//! the dashboard's original browser-local store, so existing exported
//! state loads unchanged.

/// JSON array of the current session's observation points.
pub const KEY_CHART: &str = "oued_chart_v2";

/// Display-formatted timestamp of the current session's start.
pub const KEY_SESSION_START: &str = "oued_session_start";

/// JSON array of archived sessions, most recently archived first.
pub const KEY_ARCHIVES: &str = "oued_archives";
