//! Client configuration model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::camera::CAPTURE_JPEG_QUALITY;
use crate::friend::DEFAULT_PENDING_REQUEST_TTL_HOURS;
use crate::search::MAX_IMAGE_BYTES;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 30;
/// Upper bound for the expiry interval; larger values overflow timer deadlines.
pub const MAX_RECONCILE_INTERVAL_SECS: u64 = u32::MAX as u64;

/// Root of `config.toml`.
///
/// Every field has a default so a partial (or missing) file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin, e.g. `https://api.fyndd.in`.
    pub api_base_url: String,
    /// Age at which an unconfirmed friend request is dropped.
    pub pending_request_ttl_secs: u64,
    /// Interval of the background expiry pass.
    pub reconcile_interval_secs: u64,
    pub max_image_bytes: usize,
    pub jpeg_quality: f32,
    pub log_level: String,
    /// Overrides the location of the client state file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            pending_request_ttl_secs: DEFAULT_PENDING_REQUEST_TTL_HOURS as u64 * 60 * 60,
            reconcile_interval_secs: DEFAULT_RECONCILE_INTERVAL_SECS,
            max_image_bytes: MAX_IMAGE_BYTES,
            jpeg_quality: CAPTURE_JPEG_QUALITY,
            log_level: "info".to_string(),
            state_file: None,
        }
    }
}

impl ClientConfig {
    /// Saturates at `chrono::Duration::MAX` for out-of-range values.
    pub fn pending_request_ttl(&self) -> chrono::Duration {
        i64::try_from(self.pending_request_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_secs(
            self.reconcile_interval_secs
                .clamp(1, MAX_RECONCILE_INTERVAL_SECS),
        )
    }

    /// Base URL without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
