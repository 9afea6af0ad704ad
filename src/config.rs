//! Gateway configuration.
//!
//! Two canonical configurations exist, built by [`ApnsConfig::production`]
//! and [`ApnsConfig::sandbox`]. They differ only in host names and in the
//! sandbox having no default expiration offset. A configuration is passed
//! explicitly to every call that needs one; there is no global default.
//!
//! Configurations (de)serialize with the `APNS_*` keys used by config
//! files, timeouts and offsets expressed in seconds:
//!
//! ```
//! use apns_wire::ApnsConfig;
//!
//! let config = ApnsConfig::from_json(r#"{"APNS_MAX_NOTIFICATION_SIZE": 4096}"#).unwrap();
//! assert_eq!(config.max_notification_size, 4096);
//! assert_eq!(config.host, "gateway.push.apple.com");
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Production gateway host.
pub const PRODUCTION_HOST: &str = "gateway.push.apple.com";

/// Production feedback host.
pub const PRODUCTION_FEEDBACK_HOST: &str = "feedback.push.apple.com";

/// Sandbox gateway host.
pub const SANDBOX_HOST: &str = "gateway.sandbox.push.apple.com";

/// Sandbox feedback host.
pub const SANDBOX_FEEDBACK_HOST: &str = "feedback.sandbox.push.apple.com";

/// Gateway port.
pub const DEFAULT_PORT: u16 = 2195;

/// Feedback port.
pub const DEFAULT_FEEDBACK_PORT: u16 = 2196;

/// How long to wait for an error response after a send.
pub const DEFAULT_ERROR_TIMEOUT: Duration = Duration::from_millis(500);

/// Default expiration offset in seconds (30 days, production only).
pub const DEFAULT_EXPIRATION_OFFSET: u32 = 60 * 60 * 24 * 30;

/// Maximum serialized payload size in bytes.
pub const DEFAULT_MAX_NOTIFICATION_SIZE: usize = 2048;

/// Gateway and feedback service parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApnsConfig {
    /// Gateway host.
    #[serde(rename = "APNS_HOST")]
    pub host: String,
    /// Gateway port.
    #[serde(rename = "APNS_PORT")]
    pub port: u16,
    /// Feedback service host.
    #[serde(rename = "APNS_FEEDBACK_HOST")]
    pub feedback_host: String,
    /// Feedback service port.
    #[serde(rename = "APNS_FEEDBACK_PORT")]
    pub feedback_port: u16,
    /// Client certificate used by the TLS layer.
    #[serde(rename = "APNS_CERTIFICATE")]
    pub certificate: Option<PathBuf>,
    /// How long to wait for an error response after each send.
    #[serde(rename = "APNS_ERROR_TIMEOUT", with = "seconds")]
    pub error_timeout: Duration,
    /// Seconds added to "now" when a notification has no explicit expiration.
    #[serde(rename = "APNS_DEFAULT_EXPIRATION_OFFSET")]
    pub default_expiration_offset: Option<u32>,
    /// Maximum serialized payload size in bytes.
    #[serde(rename = "APNS_MAX_NOTIFICATION_SIZE")]
    pub max_notification_size: usize,
}

impl ApnsConfig {
    /// Production gateway configuration.
    pub fn production() -> Self {
        Self {
            host: PRODUCTION_HOST.to_string(),
            port: DEFAULT_PORT,
            feedback_host: PRODUCTION_FEEDBACK_HOST.to_string(),
            feedback_port: DEFAULT_FEEDBACK_PORT,
            certificate: None,
            error_timeout: DEFAULT_ERROR_TIMEOUT,
            default_expiration_offset: Some(DEFAULT_EXPIRATION_OFFSET),
            max_notification_size: DEFAULT_MAX_NOTIFICATION_SIZE,
        }
    }

    /// Sandbox (development) gateway configuration.
    pub fn sandbox() -> Self {
        Self {
            host: SANDBOX_HOST.to_string(),
            feedback_host: SANDBOX_FEEDBACK_HOST.to_string(),
            default_expiration_offset: None,
            ..Self::production()
        }
    }

    /// Parse a JSON object of `APNS_*` keys. Missing keys take production
    /// values.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the client certificate path.
    pub fn with_certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.certificate = Some(path.into());
        self
    }

    /// Set the error response timeout.
    pub fn with_error_timeout(mut self, timeout: Duration) -> Self {
        self.error_timeout = timeout;
        self
    }

    /// Set or clear the default expiration offset (seconds).
    pub fn with_default_expiration_offset(mut self, offset: Option<u32>) -> Self {
        self.default_expiration_offset = offset;
        self
    }

    /// Set the maximum payload size.
    pub fn with_max_notification_size(mut self, size: usize) -> Self {
        self.max_notification_size = size;
        self
    }

    /// `host:port` of the gateway.
    pub fn gateway_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `host:port` of the feedback service.
    pub fn feedback_addr(&self) -> String {
        format!("{}:{}", self.feedback_host, self.feedback_port)
    }

    /// Absolute default expiration for a send happening at `now` (epoch
    /// seconds), or `None` when no offset is configured.
    pub fn default_expiration(&self, now: u64) -> Option<u32> {
        self.default_expiration_offset.map(|offset| {
            let at = now.saturating_add(u64::from(offset));
            u32::try_from(at).unwrap_or(u32::MAX)
        })
    }
}

impl Default for ApnsConfig {
    fn default() -> Self {
        Self::production()
    }
}

/// Durations as fractional seconds.
mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
