//! Enhanced notification frame (command 2).
//!
//! A frame carries five items: device token, JSON payload, notification
//! identifier, expiration and priority. Encoding is pure; writing the
//! bytes is up to the caller.
//!
//! # Example
//!
//! ```
//! use apns_wire::protocol::{decode_frame, pack_frame};
//!
//! let token = "11".repeat(32);
//! let bytes = pack_frame(&token, br#"{"aps":{}}"#, 7, 0, 10).unwrap();
//!
//! let frame = decode_frame(&bytes).unwrap();
//! assert_eq!(frame.identifier(), 7);
//! assert_eq!(frame.payload(), br#"{"aps":{}}"#);
//! ```

use bytes::{Bytes, BytesMut};

use super::wire_format::{
    item_id, put_item, put_u32_item, put_u8_item, read_u32, read_u8, take_item, FrameHeader,
    COMMAND_NOTIFICATION, FRAME_HEADER_SIZE, ITEM_HEADER_SIZE, MAX_ITEM_DATA_SIZE,
    PRIORITY_IMMEDIATE, TOKEN_SIZE,
};
use crate::error::{ApnsError, Result};
use crate::token::DeviceToken;

/// Size of the item section for a payload of `payload_len` bytes.
fn items_length(payload_len: usize) -> usize {
    5 * ITEM_HEADER_SIZE + TOKEN_SIZE + payload_len + 4 + 4 + 1
}

/// One notification as carried by a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationFrame {
    /// Target device.
    pub token: DeviceToken,
    /// JSON payload bytes.
    pub payload: Bytes,
    /// Identifier echoed back in error responses.
    pub identifier: u32,
    /// Absolute expiration, epoch seconds (0 = do not store).
    pub expiration: u32,
    /// Delivery priority (10 immediate, 5 power-conserving).
    pub priority: u8,
}

impl NotificationFrame {
    /// Create a new frame.
    pub fn new(
        token: DeviceToken,
        payload: Bytes,
        identifier: u32,
        expiration: u32,
        priority: u8,
    ) -> Self {
        Self {
            token,
            payload,
            identifier,
            expiration,
            priority,
        }
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the notification identifier.
    #[inline]
    pub fn identifier(&self) -> u32 {
        self.identifier
    }

    /// Get the expiration timestamp.
    #[inline]
    pub fn expiration(&self) -> u32 {
        self.expiration
    }

    /// Get the priority.
    #[inline]
    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// Encode into wire bytes.
    pub fn encode(&self) -> Result<Bytes> {
        encode_frame(
            &self.token,
            &self.payload,
            self.identifier,
            self.expiration,
            self.priority,
        )
    }
}

/// Build a complete frame from a validated token.
///
/// # Errors
///
/// `DataOverflow` if the payload cannot fit an item (over 65 535 bytes).
/// Nothing is produced in that case.
pub fn encode_frame(
    token: &DeviceToken,
    payload: &[u8],
    identifier: u32,
    expiration: u32,
    priority: u8,
) -> Result<Bytes> {
    if payload.len() > MAX_ITEM_DATA_SIZE {
        return Err(ApnsError::DataOverflow {
            size: payload.len(),
            limit: MAX_ITEM_DATA_SIZE,
        });
    }

    let body_len = items_length(payload.len());
    let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + body_len);
    // body_len is bounded by MAX_ITEM_DATA_SIZE + 59, well inside u32
    buf.extend_from_slice(&FrameHeader::new(COMMAND_NOTIFICATION, body_len as u32).encode());
    put_item(&mut buf, item_id::DEVICE_TOKEN, token.as_bytes())?;
    put_item(&mut buf, item_id::PAYLOAD, payload)?;
    put_u32_item(&mut buf, item_id::NOTIFICATION_ID, identifier);
    put_u32_item(&mut buf, item_id::EXPIRATION, expiration);
    put_u8_item(&mut buf, item_id::PRIORITY, priority);

    tracing::debug!(
        identifier,
        expiration,
        priority,
        payload_len = payload.len(),
        "Encoded notification frame"
    );

    Ok(buf.freeze())
}

/// Validate a hex token and build a complete frame.
///
/// # Errors
///
/// - `InvalidTokenFormat` if the token is not 64 hex digits
/// - `DataOverflow` if the payload cannot fit an item
pub fn pack_frame(
    token: &str,
    payload: &[u8],
    identifier: u32,
    expiration: u32,
    priority: u8,
) -> Result<Bytes> {
    let token = DeviceToken::parse(token)?;
    encode_frame(&token, payload, identifier, expiration, priority)
}

/// Parse a complete notification frame.
///
/// Identifier, expiration and priority default to 0, 0 and 10 when their
/// items are absent. Token and payload are required.
pub fn decode_frame(buf: &[u8]) -> Result<NotificationFrame> {
    let header = FrameHeader::decode(buf).ok_or_else(|| {
        ApnsError::Protocol(format!("Truncated frame header ({} bytes)", buf.len()))
    })?;

    if header.command != COMMAND_NOTIFICATION {
        return Err(ApnsError::Protocol(format!(
            "Unexpected command {}",
            header.command
        )));
    }

    let mut items = &buf[FRAME_HEADER_SIZE..];
    if items.len() != header.length as usize {
        return Err(ApnsError::Protocol(format!(
            "Frame declares {} bytes but carries {}",
            header.length,
            items.len()
        )));
    }

    let mut token = None;
    let mut payload = None;
    let mut identifier = 0;
    let mut expiration = 0;
    let mut priority = PRIORITY_IMMEDIATE;

    while let Some((id, data)) = take_item(&mut items)? {
        match id {
            item_id::DEVICE_TOKEN => token = Some(DeviceToken::try_from(data)?),
            item_id::PAYLOAD => payload = Some(Bytes::copy_from_slice(data)),
            item_id::NOTIFICATION_ID => identifier = read_u32(data)?,
            item_id::EXPIRATION => expiration = read_u32(data)?,
            item_id::PRIORITY => priority = read_u8(data)?,
            other => {
                return Err(ApnsError::Protocol(format!("Unknown item id {}", other)));
            }
        }
    }

    let token = token.ok_or_else(|| ApnsError::Protocol("Missing device token item".into()))?;
    let payload = payload.ok_or_else(|| ApnsError::Protocol("Missing payload item".into()))?;

    Ok(NotificationFrame::new(
        token, payload, identifier, expiration, priority,
    ))
}
