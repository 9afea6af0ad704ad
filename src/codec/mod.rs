//! Codec module - serialization for notification payloads.
//!
//! - [`JsonCodec`] - compact JSON using `serde_json`, the only payload
//!   format the gateway accepts
//!
//! Codecs are marker structs with static methods, so callers pick them at
//! compile time.

mod json;

pub use json::JsonCodec;
