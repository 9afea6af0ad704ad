//! Compact JSON codec using `serde_json`.
//!
//! The gateway counts payload bytes against a hard limit, so output is
//! always compact: no whitespace after `:` or `,`. Map keys keep their
//! insertion order (`serde_json` is built with `preserve_order`).
//!
//! # Example
//!
//! ```
//! use apns_wire::codec::JsonCodec;
//! use serde_json::json;
//!
//! let encoded = JsonCodec::encode(&json!({"aps": {"badge": 1}})).unwrap();
//! assert_eq!(&encoded[..], br#"{"aps":{"badge":1}}"#);
//! ```

use bytes::Bytes;

use crate::error::Result;

/// JSON codec for notification payloads.
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a value to compact JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized (e.g. a map with
    /// non-string keys).
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(value)?))
    }

    /// Decode JSON bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes cannot be deserialized to type T.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
