//! Gateway error response (command 8).
//!
//! When the gateway rejects a notification it writes a single 6-byte
//! packet and closes the connection:
//! ```text
//! ┌─────────┬────────┬────────────┐
//! │ Command │ Status │ Identifier │
//! │ 1 byte  │ 1 byte │ uint32 BE  │
//! │ 0x08    │        │            │
//! └─────────┴────────┴────────────┘
//! ```

use std::fmt;

use super::wire_format::{read_u32, COMMAND_ERROR_RESPONSE};
use crate::error::{ApnsError, Result};

/// Error response size in bytes.
pub const ERROR_RESPONSE_SIZE: usize = 6;

/// Status code carried by an error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// 0: no errors encountered.
    NoErrors,
    /// 1: processing error.
    ProcessingError,
    /// 2: device token item absent.
    MissingDeviceToken,
    /// 3: missing topic.
    MissingTopic,
    /// 4: payload item absent.
    MissingPayload,
    /// 5: token item is not 32 bytes.
    InvalidTokenSize,
    /// 6: invalid topic size.
    InvalidTopicSize,
    /// 7: payload too large.
    InvalidPayloadSize,
    /// 8: token unknown to the gateway.
    InvalidToken,
    /// 10: gateway closing the connection for maintenance.
    Shutdown,
    /// 128: unrecognized frame item id.
    InvalidFrameItemId,
    /// 255: no status given.
    Unknown,
    /// A code not listed in the gateway documentation.
    Other(u8),
}

impl Status {
    /// Raw status byte.
    pub fn code(&self) -> u8 {
        match self {
            Status::NoErrors => 0,
            Status::ProcessingError => 1,
            Status::MissingDeviceToken => 2,
            Status::MissingTopic => 3,
            Status::MissingPayload => 4,
            Status::InvalidTokenSize => 5,
            Status::InvalidTopicSize => 6,
            Status::InvalidPayloadSize => 7,
            Status::InvalidToken => 8,
            Status::Shutdown => 10,
            Status::InvalidFrameItemId => 128,
            Status::Unknown => 255,
            Status::Other(code) => *code,
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Status::NoErrors => "No errors encountered",
            Status::ProcessingError => "Processing error",
            Status::MissingDeviceToken => "Missing device token",
            Status::MissingTopic => "Missing topic",
            Status::MissingPayload => "Missing payload",
            Status::InvalidTokenSize => "Invalid token size",
            Status::InvalidTopicSize => "Invalid topic size",
            Status::InvalidPayloadSize => "Invalid payload size",
            Status::InvalidToken => "Invalid token",
            Status::Shutdown => "Shutdown",
            Status::InvalidFrameItemId => "Invalid frame item id",
            Status::Unknown => "None (unknown)",
            Status::Other(_) => "Unrecognized status",
        }
    }
}

impl From<u8> for Status {
    fn from(code: u8) -> Self {
        match code {
            0 => Status::NoErrors,
            1 => Status::ProcessingError,
            2 => Status::MissingDeviceToken,
            3 => Status::MissingTopic,
            4 => Status::MissingPayload,
            5 => Status::InvalidTokenSize,
            6 => Status::InvalidTopicSize,
            7 => Status::InvalidPayloadSize,
            8 => Status::InvalidToken,
            10 => Status::Shutdown,
            128 => Status::InvalidFrameItemId,
            255 => Status::Unknown,
            other => Status::Other(other),
        }
    }
}

/// Decoded error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Why the notification was rejected.
    pub status: Status,
    /// Identifier of the rejected notification.
    pub identifier: u32,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(status: Status, identifier: u32) -> Self {
        Self { status, identifier }
    }

    /// Encode to wire bytes.
    pub fn encode(&self) -> [u8; ERROR_RESPONSE_SIZE] {
        let mut buf = [0u8; ERROR_RESPONSE_SIZE];
        buf[0] = COMMAND_ERROR_RESPONSE;
        buf[1] = self.status.code();
        buf[2..6].copy_from_slice(&self.identifier.to_be_bytes());
        buf
    }

    /// Decode from wire bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use apns_wire::protocol::{ErrorResponse, Status};
    ///
    /// let response = ErrorResponse::decode(&[8, 8, 0, 0, 0, 42]).unwrap();
    /// assert_eq!(response.status, Status::InvalidToken);
    /// assert_eq!(response.identifier, 42);
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < ERROR_RESPONSE_SIZE {
            return Err(ApnsError::Protocol(format!(
                "Error response needs {} bytes, got {}",
                ERROR_RESPONSE_SIZE,
                buf.len()
            )));
        }
        if buf[0] != COMMAND_ERROR_RESPONSE {
            return Err(ApnsError::Protocol(format!(
                "Unexpected command {} in error response",
                buf[0]
            )));
        }
        Ok(Self {
            status: Status::from(buf[1]),
            identifier: read_u32(&buf[2..6])?,
        })
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (status {}, identifier {})",
            self.status.description(),
            self.status.code(),
            self.identifier
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_status() {
        let response = ErrorResponse::decode(&[8, 7, 0, 0, 1, 0]).unwrap();
        assert_eq!(response.status, Status::InvalidPayloadSize);
        assert_eq!(response.identifier, 256);
    }

    #[test]
    fn test_unlisted_status_preserved() {
        let response = ErrorResponse::decode(&[8, 42, 0, 0, 0, 1]).unwrap();
        assert_eq!(response.status, Status::Other(42));
        assert_eq!(response.status.code(), 42);
    }

    #[test]
    fn test_status_codes_roundtrip() {
        for code in [0u8, 1, 2, 3, 4, 5, 6, 7, 8, 10, 128, 255] {
            let status = Status::from(code);
            assert!(!matches!(status, Status::Other(_)), "code {code}");
            assert_eq!(status.code(), code);
        }
    }

    #[test]
    fn test_encode_layout() {
        let bytes = ErrorResponse::new(Status::Shutdown, 0x01020304).encode();
        assert_eq!(bytes, [8, 10, 1, 2, 3, 4]);
    }

    #[test]
    fn test_decode_too_short() {
        assert!(ErrorResponse::decode(&[8, 8, 0]).is_err());
    }

    #[test]
    fn test_decode_wrong_command() {
        let err = ErrorResponse::decode(&[2, 8, 0, 0, 0, 1]).unwrap_err();
        assert!(err.to_string().contains("Unexpected command 2"));
    }

    #[test]
    fn test_display() {
        let response = ErrorResponse::new(Status::InvalidToken, 9);
        assert_eq!(
            response.to_string(),
            "Invalid token (status 8, identifier 9)"
        );
    }
}
