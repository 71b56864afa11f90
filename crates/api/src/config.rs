use std::time::Duration;

use ouedguard_core::{StatusPolicy, DEFAULT_ALERT_THRESHOLD};
use ouedguard_playback::{EndBehavior, PlaybackConfig};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the inference service's predict endpoint.
    pub inference_url: String,
    /// Base URL of the dataset (file-listing / simulate) endpoints.
    pub dataset_url: String,
    /// Directory holding the durable session/archive documents.
    pub storage_dir: String,
    /// Seconds between playback ticks.
    pub playback_cadence_secs: u64,
    /// Wrap around or go idle at the end of the dataset.
    pub playback_end_behavior: EndBehavior,
    /// Whether flood status is trusted from the service or derived locally.
    pub status_policy: StatusPolicy,
    /// Threshold for the derived status policy and the fallback report.
    pub alert_threshold: f64,
    /// Optional sliding-window cap on the live session. Unset keeps the
    /// full session so archives are complete.
    pub session_window: Option<usize>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `3000`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                     |
    /// | `INFERENCE_URL`         | `http://127.0.0.1:5001`  |
    /// | `DATASET_URL`           | value of `INFERENCE_URL` |
    /// | `STORAGE_DIR`           | `./data`                 |
    /// | `PLAYBACK_CADENCE_SECS` | `3`                      |
    /// | `PLAYBACK_END_BEHAVIOR` | `loop` (`loop`/`stop`)   |
    /// | `STATUS_SOURCE`         | `server` (`server`/`threshold`) |
    /// | `ALERT_THRESHOLD`       | `20`                     |
    /// | `SESSION_WINDOW`        | unset (unbounded)        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let inference_url = std::env::var("INFERENCE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:5001".into())
            .trim_end_matches('/')
            .to_string();

        let dataset_url = std::env::var("DATASET_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| inference_url.clone());

        let storage_dir = std::env::var("STORAGE_DIR").unwrap_or_else(|_| "./data".into());

        let playback_cadence_secs: u64 = std::env::var("PLAYBACK_CADENCE_SECS")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("PLAYBACK_CADENCE_SECS must be a valid u64");

        let playback_end_behavior = parse_end_behavior(
            &std::env::var("PLAYBACK_END_BEHAVIOR").unwrap_or_else(|_| "loop".into()),
        );

        let alert_threshold: f64 = std::env::var("ALERT_THRESHOLD")
            .unwrap_or_else(|_| DEFAULT_ALERT_THRESHOLD.to_string())
            .parse()
            .expect("ALERT_THRESHOLD must be a valid number");

        let status_policy = parse_status_policy(
            &std::env::var("STATUS_SOURCE").unwrap_or_else(|_| "server".into()),
            alert_threshold,
        );

        let session_window: Option<usize> = std::env::var("SESSION_WINDOW")
            .ok()
            .map(|v| v.parse().expect("SESSION_WINDOW must be a valid usize"));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            inference_url,
            dataset_url,
            storage_dir,
            playback_cadence_secs,
            playback_end_behavior,
            status_policy,
            alert_threshold,
            session_window,
        }
    }

    /// Playback tuning derived from this configuration.
    pub fn playback(&self) -> PlaybackConfig {
        PlaybackConfig {
            cadence: Duration::from_secs(self.playback_cadence_secs),
            end_behavior: self.playback_end_behavior,
            status_policy: self.status_policy,
            alert_threshold: self.alert_threshold,
        }
    }
}

/// Parse `PLAYBACK_END_BEHAVIOR`. Anything but `stop` loops.
fn parse_end_behavior(value: &str) -> EndBehavior {
    if value.eq_ignore_ascii_case("stop") {
        EndBehavior::Stop
    } else {
        EndBehavior::Loop
    }
}

/// Parse `STATUS_SOURCE`. Anything but `threshold` trusts the service.
fn parse_status_policy(value: &str, threshold: f64) -> StatusPolicy {
    if value.eq_ignore_ascii_case("threshold") {
        StatusPolicy::DerivedFromLevel { threshold }
    } else {
        StatusPolicy::ServerReported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_behavior_defaults_to_loop() {
        assert_eq!(parse_end_behavior("loop"), EndBehavior::Loop);
        assert_eq!(parse_end_behavior("anything"), EndBehavior::Loop);
        assert_eq!(parse_end_behavior("STOP"), EndBehavior::Stop);
    }

    #[test]
    fn status_policy_parses_both_sources() {
        assert_eq!(
            parse_status_policy("server", 20.0),
            StatusPolicy::ServerReported
        );
        assert_eq!(
            parse_status_policy("threshold", 35.0),
            StatusPolicy::DerivedFromLevel { threshold: 35.0 }
        );
    }
}
