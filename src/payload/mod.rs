//! Payload module - notification JSON construction and size limits.
//!
//! - [`Alert`] - plain or localized alert
//! - [`Aps`] / [`Payload`] - typed payload, serialized compactly
//! - [`PayloadBuilder`] - fluent construction from loose attributes
//!
//! The serialized payload must fit the configured maximum
//! (`APNS_MAX_NOTIFICATION_SIZE`, 2048 bytes by default); larger payloads
//! are rejected, never truncated.

mod alert;
mod aps;
mod builder;

pub use alert::{Alert, LocalizedAlert};
pub use aps::{Aps, Payload, APS_KEY};
pub use builder::PayloadBuilder;
