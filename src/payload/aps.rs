//! Typed notification payload: the `aps` dictionary plus custom keys.

use bytes::Bytes;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::Alert;
use crate::codec::JsonCodec;
use crate::error::{ApnsError, Result};

/// Root key reserved for Apple's dictionary.
pub const APS_KEY: &str = "aps";

/// The `aps` dictionary.
///
/// Keys are emitted in declaration order: `alert`, `badge`, `sound`,
/// `category`, `content-available`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aps {
    /// Alert text or localization dictionary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<Alert>,
    /// Badge number; `Some(0)` clears the badge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<u32>,
    /// Sound file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    /// Notification category identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Background update flag, emitted as `1` when set.
    #[serde(
        rename = "content-available",
        skip_serializing_if = "is_unset",
        serialize_with = "flag_as_int"
    )]
    pub content_available: bool,
}

fn is_unset(flag: &bool) -> bool {
    !*flag
}

fn flag_as_int<S: Serializer>(flag: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

/// A complete notification payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Payload {
    /// Apple's dictionary.
    pub aps: Aps,
    /// Custom keys, siblings of `aps` at the root.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Payload {
    /// Serialize to compact JSON without a size check.
    ///
    /// # Errors
    ///
    /// `InvalidPayload` when `extra` carries an `aps` key.
    pub fn to_json(&self) -> Result<Bytes> {
        if self.extra.contains_key(APS_KEY) {
            return Err(ApnsError::InvalidPayload(format!(
                "custom key `{}` collides with the reserved dictionary",
                APS_KEY
            )));
        }
        JsonCodec::encode(self)
    }

    /// Serialize and enforce `max_size`.
    ///
    /// # Errors
    ///
    /// `DataOverflow` when the JSON is longer than `max_size` bytes. Nothing
    /// is truncated.
    pub fn encode(&self, max_size: usize) -> Result<Bytes> {
        let json = self.to_json()?;
        if json.len() > max_size {
            return Err(ApnsError::DataOverflow {
                size: json.len(),
                limit: max_size,
            });
        }
        Ok(json)
    }
}
