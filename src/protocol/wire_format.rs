//! Wire format encoding and decoding.
//!
//! Enhanced notification frame (command 2):
//! ```text
//! ┌─────────┬──────────────┬──────────────────────────┐
//! │ Command │ Frame length │ Items                    │
//! │ 1 byte  │ 4 bytes      │ frame_length bytes       │
//! │ 0x02    │ uint32 BE    │                          │
//! └─────────┴──────────────┴──────────────────────────┘
//! ```
//!
//! Each item:
//! ```text
//! ┌─────────┬─────────────┬──────────────┐
//! │ Item ID │ Data length │ Data         │
//! │ 1 byte  │ uint16 BE   │ length bytes │
//! └─────────┴─────────────┴──────────────┘
//! ```
//!
//! All multi-byte integers are Big Endian.

use bytes::{Buf, BufMut};

use crate::error::{ApnsError, Result};

/// Command byte for an enhanced notification frame.
pub const COMMAND_NOTIFICATION: u8 = 2;

/// Command byte for a gateway error response.
pub const COMMAND_ERROR_RESPONSE: u8 = 8;

/// Frame header size: command byte + u32 length.
pub const FRAME_HEADER_SIZE: usize = 5;

/// Item header size: item id + u16 length.
pub const ITEM_HEADER_SIZE: usize = 3;

/// Largest value an item can carry (u16 length field).
pub const MAX_ITEM_DATA_SIZE: usize = u16::MAX as usize;

/// Raw device token length in bytes.
pub const TOKEN_SIZE: usize = 32;

/// Send immediately.
pub const PRIORITY_IMMEDIATE: u8 = 10;

/// Send at a time that conserves power on the device.
pub const PRIORITY_CONSERVE_POWER: u8 = 5;

/// Item identifiers inside a notification frame.
pub mod item_id {
    /// Device token (32 raw bytes).
    pub const DEVICE_TOKEN: u8 = 1;
    /// JSON payload.
    pub const PAYLOAD: u8 = 2;
    /// Notification identifier (u32).
    pub const NOTIFICATION_ID: u8 = 3;
    /// Expiration date, absolute epoch seconds (u32).
    pub const EXPIRATION: u8 = 4;
    /// Priority (u8).
    pub const PRIORITY: u8 = 5;
}

/// Header of a single frame item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemHeader {
    /// Item identifier (see `item_id`).
    pub id: u8,
    /// Length of the item data in bytes.
    pub length: u16,
}

impl ItemHeader {
    /// Create a new item header.
    pub fn new(id: u8, length: u16) -> Self {
        Self { id, length }
    }

    /// Encode the header to bytes (Big Endian).
    pub fn encode(&self) -> [u8; ITEM_HEADER_SIZE] {
        let mut buf = [0u8; ITEM_HEADER_SIZE];
        buf[0] = self.id;
        buf[1..3].copy_from_slice(&self.length.to_be_bytes());
        buf
    }

    /// Decode a header from bytes.
    ///
    /// Returns `None` if buffer is too short.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < ITEM_HEADER_SIZE {
            return None;
        }
        Some(Self {
            id: buf[0],
            length: u16::from_be_bytes([buf[1], buf[2]]),
        })
    }
}

/// Header of a complete frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Command byte (2 for notifications).
    pub command: u8,
    /// Length of the item section in bytes.
    pub length: u32,
}

impl FrameHeader {
    /// Create a new frame header.
    pub fn new(command: u8, length: u32) -> Self {
        Self { command, length }
    }

    /// Encode the header to bytes (Big Endian).
    ///
    /// # Example
    ///
    /// ```
    /// use apns_wire::protocol::{FrameHeader, COMMAND_NOTIFICATION};
    ///
    /// let bytes = FrameHeader::new(COMMAND_NOTIFICATION, 94).encode();
    /// assert_eq!(bytes, [0x02, 0, 0, 0, 94]);
    /// ```
    pub fn encode(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut buf = [0u8; FRAME_HEADER_SIZE];
        buf[0] = self.command;
        buf[1..5].copy_from_slice(&self.length.to_be_bytes());
        buf
    }

    /// Decode a header from bytes.
    ///
    /// Returns `None` if buffer is too short.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < FRAME_HEADER_SIZE {
            return None;
        }
        Some(Self {
            command: buf[0],
            length: u32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]]),
        })
    }
}

/// Append one item (`id`, u16 length, data) to `buf`.
///
/// Fails with `DataOverflow` when `data` does not fit the u16 length field.
pub fn put_item<B: BufMut>(buf: &mut B, id: u8, data: &[u8]) -> Result<()> {
    let length = u16::try_from(data.len()).map_err(|_| ApnsError::DataOverflow {
        size: data.len(),
        limit: MAX_ITEM_DATA_SIZE,
    })?;
    buf.put_slice(&ItemHeader::new(id, length).encode());
    buf.put_slice(data);
    Ok(())
}

/// Append a u32 item.
#[inline]
pub fn put_u32_item<B: BufMut>(buf: &mut B, id: u8, value: u32) {
    buf.put_slice(&ItemHeader::new(id, 4).encode());
    buf.put_u32(value);
}

/// Append a u8 item.
#[inline]
pub fn put_u8_item<B: BufMut>(buf: &mut B, id: u8, value: u8) {
    buf.put_slice(&ItemHeader::new(id, 1).encode());
    buf.put_u8(value);
}

/// Split one item off the front of `buf`.
///
/// Returns `Ok(None)` on an empty buffer and a protocol error when the
/// declared length runs past the end.
pub fn take_item<'a>(buf: &mut &'a [u8]) -> Result<Option<(u8, &'a [u8])>> {
    let current: &'a [u8] = *buf;
    if current.is_empty() {
        return Ok(None);
    }
    let header = ItemHeader::decode(current).ok_or_else(|| {
        ApnsError::Protocol(format!("Truncated item header ({} bytes)", current.len()))
    })?;
    let end = ITEM_HEADER_SIZE + header.length as usize;
    if current.len() < end {
        return Err(ApnsError::Protocol(format!(
            "Item {} declares {} bytes but only {} remain",
            header.id,
            header.length,
            current.len() - ITEM_HEADER_SIZE
        )));
    }
    let data = &current[ITEM_HEADER_SIZE..end];
    buf.advance(end);
    Ok(Some((header.id, data)))
}

/// Read a big-endian u32 from an item value.
pub fn read_u32(data: &[u8]) -> Result<u32> {
    let bytes: [u8; 4] = data
        .try_into()
        .map_err(|_| ApnsError::Protocol(format!("Expected 4-byte integer, got {}", data.len())))?;
    Ok(u32::from_be_bytes(bytes))
}

/// Read a u8 from an item value.
pub fn read_u8(data: &[u8]) -> Result<u8> {
    match data {
        [value] => Ok(*value),
        _ => Err(ApnsError::Protocol(format!(
            "Expected 1-byte integer, got {}",
            data.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_header_big_endian_byte_order() {
        let bytes = ItemHeader::new(0x02, 0x0102).encode();
        assert_eq!(bytes, [0x02, 0x01, 0x02]);
    }

    #[test]
    fn test_frame_header_big_endian_byte_order() {
        let bytes = FrameHeader::new(COMMAND_NOTIFICATION, 0x01020304).encode();
        assert_eq!(bytes, [0x02, 0x01, 0x02, 0x03, 0x04]);

        let decoded = FrameHeader::decode(&bytes).unwrap();
        assert_eq!(decoded.command, COMMAND_NOTIFICATION);
        assert_eq!(decoded.length, 0x01020304);
    }

    #[test]
    fn test_decode_too_short_buffer() {
        assert!(ItemHeader::decode(&[1, 0]).is_none());
        assert!(FrameHeader::decode(&[2, 0, 0, 0]).is_none());
    }

    #[test]
    fn test_put_integer_items() {
        let mut buf = Vec::new();
        put_u32_item(&mut buf, item_id::NOTIFICATION_ID, 10);
        put_u8_item(&mut buf, item_id::PRIORITY, PRIORITY_IMMEDIATE);

        assert_eq!(buf, [0x03, 0x00, 0x04, 0, 0, 0, 0x0a, 0x05, 0x00, 0x01, 0x0a]);
    }

    #[test]
    fn test_put_item_rejects_oversized_data() {
        let mut buf = Vec::new();
        let data = vec![0u8; MAX_ITEM_DATA_SIZE + 1];

        let err = put_item(&mut buf, item_id::PAYLOAD, &data).unwrap_err();
        assert!(matches!(
            err,
            ApnsError::DataOverflow { size, limit } if size == MAX_ITEM_DATA_SIZE + 1 && limit == MAX_ITEM_DATA_SIZE
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_take_item_walks_items() {
        let mut buf = Vec::new();
        put_item(&mut buf, item_id::PAYLOAD, b"{}").unwrap();
        put_u32_item(&mut buf, item_id::EXPIRATION, 30);

        let mut cursor = &buf[..];
        let (id, data) = take_item(&mut cursor).unwrap().unwrap();
        assert_eq!(id, item_id::PAYLOAD);
        assert_eq!(data, b"{}");

        let (id, data) = take_item(&mut cursor).unwrap().unwrap();
        assert_eq!(id, item_id::EXPIRATION);
        assert_eq!(read_u32(data).unwrap(), 30);

        assert!(take_item(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn test_take_item_truncated() {
        let mut cursor: &[u8] = &[0x02, 0x00, 0x05, b'a'];
        let err = take_item(&mut cursor).unwrap_err();
        assert!(err.to_string().contains("declares 5 bytes"));
    }

    #[test]
    fn test_read_integers_wrong_width() {
        assert!(read_u32(&[0, 1]).is_err());
        assert!(read_u8(&[]).is_err());
        assert_eq!(read_u8(&[7]).unwrap(), 7);
    }
}
