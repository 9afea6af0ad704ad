//! Error types for apns-wire.

use thiserror::Error;

use crate::protocol::ErrorResponse;

/// Main error type for all gateway and feedback operations.
#[derive(Debug, Error)]
pub enum ApnsError {
    /// Device token is not 64 hexadecimal characters after normalization.
    #[error("Invalid token format: {0}")]
    InvalidTokenFormat(String),

    /// Serialized payload is larger than the configured limit.
    #[error("Payload size {size} exceeds maximum {limit}")]
    DataOverflow {
        /// Actual serialized size in bytes.
        size: usize,
        /// Maximum allowed size in bytes.
        limit: usize,
    },

    /// Payload attributes cannot form a valid notification.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error during socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed frame or packet.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Gateway rejected a notification with an error response.
    #[error("Gateway error: {0}")]
    Service(ErrorResponse),

    /// Connection closed unexpectedly.
    #[error("Connection closed")]
    ConnectionClosed,
}

/// Result type alias using ApnsError.
pub type Result<T> = std::result::Result<T, ApnsError>;
