//! A single notification ready to be framed.
//!
//! Bundles the payload attributes with the per-send frame fields and
//! applies configuration defaults:
//!
//! - identifier defaults to 0
//! - priority defaults to 10 (immediate)
//! - expiration, when not given, is `now + APNS_DEFAULT_EXPIRATION_OFFSET`
//!   if the configuration has an offset, else 0 (the gateway does not
//!   store the notification)
//!
//! Explicit expirations are absolute epoch seconds and are written as-is.
//!
//! # Example
//!
//! ```
//! use apns_wire::{ApnsConfig, Notification, PayloadBuilder};
//!
//! let frame = Notification::new("11".repeat(32))
//!     .payload(PayloadBuilder::new().alert("sample").field("foo", "bar"))
//!     .identifier(10)
//!     .expiration(30)
//!     .encode(&ApnsConfig::production())
//!     .unwrap();
//!
//! assert_eq!(frame.len(), 5 + 94);
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;

use crate::config::ApnsConfig;
use crate::error::Result;
use crate::payload::PayloadBuilder;
use crate::protocol::{encode_frame, PRIORITY_IMMEDIATE};
use crate::token::DeviceToken;

/// One notification for one device.
#[derive(Debug, Clone)]
pub struct Notification {
    token: String,
    payload: PayloadBuilder,
    identifier: u32,
    expiration: Option<u32>,
    priority: u8,
}

impl Notification {
    /// Create a notification for a hex device token with an empty payload.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            payload: PayloadBuilder::new(),
            identifier: 0,
            expiration: None,
            priority: PRIORITY_IMMEDIATE,
        }
    }

    /// Set the payload attributes.
    pub fn payload(mut self, payload: PayloadBuilder) -> Self {
        self.payload = payload;
        self
    }

    /// Set the identifier echoed back in error responses.
    pub fn identifier(mut self, identifier: u32) -> Self {
        self.identifier = identifier;
        self
    }

    /// Set an absolute expiration (epoch seconds).
    pub fn expiration(mut self, expiration: u32) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Set the delivery priority.
    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// The device token as given.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The notification identifier.
    pub fn id(&self) -> u32 {
        self.identifier
    }

    /// Expiration that will be written for a send at `now`.
    pub fn resolve_expiration(&self, config: &ApnsConfig, now: u64) -> u32 {
        self.expiration
            .or_else(|| config.default_expiration(now))
            .unwrap_or(0)
    }

    /// Encode using the current system time for the default expiration.
    pub fn encode(&self, config: &ApnsConfig) -> Result<Bytes> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.encode_at(config, now)
    }

    /// Encode for a send happening at `now` (epoch seconds).
    ///
    /// The payload is size-checked and the token validated before any
    /// frame bytes exist.
    ///
    /// # Errors
    ///
    /// - `DataOverflow` if the payload exceeds `config.max_notification_size`
    /// - `InvalidTokenFormat` if the token is not 64 hex digits
    /// - `InvalidPayload` if a custom key is `aps`
    pub fn encode_at(&self, config: &ApnsConfig, now: u64) -> Result<Bytes> {
        let payload = self.payload.build(config.max_notification_size)?;
        let token = DeviceToken::parse(&self.token)?;
        let expiration = self.resolve_expiration(config, now);

        encode_frame(&token, &payload, self.identifier, expiration, self.priority)
    }
}
