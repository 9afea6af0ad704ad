//! # apns-wire
//!
//! Binary framing for Apple's legacy push notification gateway.
//!
//! This crate turns a device token and notification attributes into the
//! gateway's enhanced notification frame, enforces the payload size limit,
//! and decodes the feedback service's expired-token records.
//!
//! ## Architecture
//!
//! - **Payload** ([`payload`]): attributes → compact JSON, size-checked
//! - **Protocol** ([`protocol`]): token + payload + identifier/expiration/priority
//!   → length-prefixed binary frame; error responses; feedback records
//! - **Transport** ([`transport`]): async adapters over an established stream
//!
//! Encoding and decoding are pure and synchronous. TLS and certificates are
//! the caller's concern.
//!
//! ## Example
//!
//! ```
//! use apns_wire::{ApnsConfig, Notification, PayloadBuilder};
//!
//! let config = ApnsConfig::sandbox();
//! let frame = Notification::new("abcdef0123456789".repeat(4))
//!     .payload(
//!         PayloadBuilder::new()
//!             .alert("Hello world")
//!             .badge(1)
//!             .sound("chime"),
//!     )
//!     .identifier(1)
//!     .encode(&config)
//!     .unwrap();
//!
//! assert_eq!(frame[0], 0x02);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod payload;
pub mod protocol;
pub mod transport;

mod notification;
mod token;

pub use config::ApnsConfig;
pub use error::{ApnsError, Result};
pub use notification::Notification;
pub use payload::PayloadBuilder;
pub use protocol::{decode_feedback, encode_frame, pack_frame, ErrorResponse, FeedbackRecord};
pub use token::{is_valid_token, DeviceToken, TOKEN_HEX_LEN};
