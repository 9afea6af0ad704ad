//! Device token parsing and validation.
//!
//! Tokens arrive as hex strings, sometimes in the `<aabb ccdd ...>` form
//! produced by `NSData.description`. Whitespace and angle brackets are
//! stripped; the rest must be exactly 64 hex digits.
//!
//! # Example
//!
//! ```
//! use apns_wire::DeviceToken;
//!
//! let token = DeviceToken::parse(&"ab".repeat(32)).unwrap();
//! assert_eq!(token.as_bytes()[0], 0xab);
//!
//! assert!(DeviceToken::parse("1").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{ApnsError, Result};
use crate::protocol::TOKEN_SIZE;

/// Length of a device token in hex characters.
pub const TOKEN_HEX_LEN: usize = TOKEN_SIZE * 2;

/// A validated 32-byte device token.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceToken([u8; TOKEN_SIZE]);

impl DeviceToken {
    /// Parse a hex token, ignoring whitespace and `<`/`>` framing.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTokenFormat` naming the original input when the
    /// normalized token is not 64 hex digits.
    pub fn parse(token: &str) -> Result<Self> {
        let normalized = normalize(token);
        if normalized.len() != TOKEN_HEX_LEN {
            return Err(ApnsError::InvalidTokenFormat(token.to_string()));
        }

        let mut bytes = [0u8; TOKEN_SIZE];
        hex::decode_to_slice(&normalized, &mut bytes)
            .map_err(|_| ApnsError::InvalidTokenFormat(token.to_string()))?;
        Ok(Self(bytes))
    }

    /// Build a token from its raw bytes.
    #[inline]
    pub fn from_bytes(bytes: [u8; TOKEN_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw token bytes as sent in the frame.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; TOKEN_SIZE] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Check whether `token` would parse as a device token.
pub fn is_valid_token(token: &str) -> bool {
    DeviceToken::parse(token).is_ok()
}

fn normalize(token: &str) -> String {
    token
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '<' && *c != '>')
        .collect()
}

impl FromStr for DeviceToken {
    type Err = ApnsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&[u8]> for DeviceToken {
    type Error = ApnsError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; TOKEN_SIZE] = bytes
            .try_into()
            .map_err(|_| ApnsError::InvalidTokenFormat(hex::encode(bytes)))?;
        Ok(Self(raw))
    }
}

impl fmt::Display for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DeviceToken").field(&self.to_hex()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repeated_digit() {
        let token = DeviceToken::parse(&"1".repeat(64)).unwrap();
        assert_eq!(token.as_bytes(), &[0x11; 32]);
    }

    #[test]
    fn test_parse_mixed_case() {
        let lower = DeviceToken::parse(&"abcdef0123456789".repeat(4)).unwrap();
        let upper = DeviceToken::parse(&"ABCDEF0123456789".repeat(4)).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.to_hex(), "abcdef0123456789".repeat(4));
    }

    #[test]
    fn test_parse_strips_brackets_and_spaces() {
        let framed = format!("<{}>", vec!["11111111"; 8].join(" "));
        let token = DeviceToken::parse(&framed).unwrap();
        assert_eq!(token.as_bytes(), &[0x11; 32]);
    }

    #[test]
    fn test_too_short() {
        let err = DeviceToken::parse("1").unwrap_err();
        assert!(err.to_string().contains("Invalid token format"));
        assert!(err.to_string().contains(": 1"));
    }

    #[test]
    fn test_too_long() {
        assert!(DeviceToken::parse(&"1".repeat(66)).is_err());
    }

    #[test]
    fn test_non_hex() {
        let token = "x".repeat(64);
        let err = DeviceToken::parse(&token).unwrap_err();
        assert!(matches!(err, ApnsError::InvalidTokenFormat(ref t) if *t == token));
    }

    #[test]
    fn test_multibyte_characters_rejected() {
        // 32 two-byte chars = 64 bytes of UTF-8
        assert!(DeviceToken::parse(&"é".repeat(32)).is_err());
    }

    #[test]
    fn test_from_str_and_display() {
        let hex = "0f".repeat(32);
        let token: DeviceToken = hex.parse().unwrap();
        assert_eq!(token.to_string(), hex);
        assert!(is_valid_token(&hex));
        assert!(!is_valid_token(""));
    }

    #[test]
    fn test_try_from_bytes() {
        let raw = [0x22u8; 32];
        let token = DeviceToken::try_from(&raw[..]).unwrap();
        assert_eq!(token, DeviceToken::from_bytes(raw));
        assert!(DeviceToken::try_from(&raw[..31]).is_err());
    }
}
