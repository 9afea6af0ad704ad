//! Feedback service records.
//!
//! The feedback channel streams concatenated records until it closes the
//! connection:
//! ```text
//! ┌───────────┬──────────────┬──────────────────┐
//! │ Timestamp │ Token length │ Token            │
//! │ uint32 BE │ uint16 BE    │ length bytes     │
//! └───────────┴──────────────┴──────────────────┘
//! ```
//!
//! A trailing partial record marks the end of the stream, not an error.
//!
//! Two decoders share the record layout:
//! - [`decode_feedback`] iterates lazily over a complete buffer
//! - [`FeedbackBuffer`] accumulates fragmented socket reads

use bytes::{BufMut, Bytes, BytesMut};

use super::wire_format::MAX_ITEM_DATA_SIZE;
use crate::error::{ApnsError, Result};
use crate::token::DeviceToken;

/// Record header size: u32 timestamp + u16 token length.
pub const FEEDBACK_HEADER_SIZE: usize = 6;

/// A device that stopped accepting notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    /// When the gateway determined the app was gone, epoch seconds.
    pub timestamp: u32,
    /// Raw token bytes (normally 32).
    pub token: Bytes,
}

impl FeedbackRecord {
    /// Create a new record.
    pub fn new(timestamp: u32, token: Bytes) -> Self {
        Self { timestamp, token }
    }

    /// Token as lowercase hex, the form callers store.
    pub fn token_hex(&self) -> String {
        hex::encode(&self.token)
    }

    /// Token as a [`DeviceToken`], if it is 32 bytes long.
    pub fn device_token(&self) -> Option<DeviceToken> {
        DeviceToken::try_from(&self.token[..]).ok()
    }

    /// Encode to wire bytes.
    ///
    /// # Errors
    ///
    /// `DataOverflow` if the token does not fit the u16 length field.
    pub fn encode(&self) -> Result<Bytes> {
        let length = u16::try_from(self.token.len()).map_err(|_| ApnsError::DataOverflow {
            size: self.token.len(),
            limit: MAX_ITEM_DATA_SIZE,
        })?;
        let mut buf = BytesMut::with_capacity(FEEDBACK_HEADER_SIZE + self.token.len());
        put_record_header(&mut buf, self.timestamp, length);
        buf.put_slice(&self.token);
        Ok(buf.freeze())
    }
}

/// Append a record header.
#[inline]
pub fn put_record_header<B: BufMut>(buf: &mut B, timestamp: u32, token_length: u16) {
    buf.put_u32(timestamp);
    buf.put_u16(token_length);
}

/// Decode a record header: `(timestamp, token_length)`.
///
/// Returns `None` if buffer is too short.
#[inline]
pub fn decode_record_header(buf: &[u8]) -> Option<(u32, u16)> {
    if buf.len() < FEEDBACK_HEADER_SIZE {
        return None;
    }
    Some((
        u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]),
        u16::from_be_bytes([buf[4], buf[5]]),
    ))
}

/// Lazily iterate over the records in `buf`.
///
/// # Example
///
/// ```
/// use apns_wire::protocol::decode_feedback;
///
/// let mut bytes = vec![0, 0, 0, 5, 0, 2, 0xab, 0xcd];
/// bytes.extend_from_slice(&[0, 0, 0]); // partial trailer
///
/// let records: Vec<_> = decode_feedback(&bytes).collect();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].timestamp, 5);
/// assert_eq!(records[0].token_hex(), "abcd");
/// ```
pub fn decode_feedback(buf: &[u8]) -> FeedbackRecords<'_> {
    FeedbackRecords { remaining: buf }
}

/// Iterator returned by [`decode_feedback`].
#[derive(Debug, Clone)]
pub struct FeedbackRecords<'a> {
    remaining: &'a [u8],
}

impl<'a> FeedbackRecords<'a> {
    /// Bytes not yet consumed (a partial record once iteration ends).
    pub fn remainder(&self) -> &'a [u8] {
        self.remaining
    }
}

impl Iterator for FeedbackRecords<'_> {
    type Item = FeedbackRecord;

    fn next(&mut self) -> Option<FeedbackRecord> {
        let (timestamp, token_length) = decode_record_header(self.remaining)?;
        let end = FEEDBACK_HEADER_SIZE + token_length as usize;
        if self.remaining.len() < end {
            return None;
        }

        let token = Bytes::copy_from_slice(&self.remaining[FEEDBACK_HEADER_SIZE..end]);
        self.remaining = &self.remaining[end..];
        Some(FeedbackRecord::new(timestamp, token))
    }
}

/// State machine for record parsing.
#[derive(Debug, Clone, Copy)]
enum State {
    /// Waiting for a complete record header (6 bytes).
    WaitingForHeader,
    /// Header parsed, waiting for token bytes.
    WaitingForToken { timestamp: u32, remaining: u16 },
}

/// Buffer for accumulating feedback bytes and extracting complete records.
pub struct FeedbackBuffer {
    /// Accumulated bytes from socket reads.
    buffer: BytesMut,
    /// Current parsing state.
    state: State,
}

impl FeedbackBuffer {
    /// Create a new feedback buffer.
    pub fn new() -> Self {
        Self::with_capacity(4 * 1024)
    }

    /// Create a new feedback buffer with custom capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            state: State::WaitingForHeader,
        }
    }

    /// Push data into the buffer and extract all complete records.
    ///
    /// Partial data is kept for the next push.
    pub fn push(&mut self, data: &[u8]) -> Vec<FeedbackRecord> {
        self.buffer.extend_from_slice(data);

        let mut records = Vec::new();
        while let Some(record) = self.try_extract_one() {
            records.push(record);
        }
        records
    }

    fn try_extract_one(&mut self) -> Option<FeedbackRecord> {
        match self.state {
            State::WaitingForHeader => {
                let (timestamp, token_length) = decode_record_header(&self.buffer)?;
                let _ = self.buffer.split_to(FEEDBACK_HEADER_SIZE);

                self.state = State::WaitingForToken {
                    timestamp,
                    remaining: token_length,
                };
                self.try_extract_one()
            }

            State::WaitingForToken {
                timestamp,
                remaining,
            } => {
                let remaining = remaining as usize;
                if self.buffer.len() < remaining {
                    return None;
                }

                let token = self.buffer.split_to(remaining).freeze();
                self.state = State::WaitingForHeader;
                Some(FeedbackRecord::new(timestamp, token))
            }
        }
    }

    /// Number of buffered bytes belonging to an incomplete record.
    pub fn len(&self) -> usize {
        let header = match self.state {
            State::WaitingForHeader => 0,
            State::WaitingForToken { .. } => FEEDBACK_HEADER_SIZE,
        };
        header + self.buffer.len()
    }

    /// Check if no partial record is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop buffered bytes and reset state.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.state = State::WaitingForHeader;
    }

    #[cfg(test)]
    fn state_name(&self) -> &'static str {
        match self.state {
            State::WaitingForHeader => "WaitingForHeader",
            State::WaitingForToken { .. } => "WaitingForToken",
        }
    }
}

impl Default for FeedbackBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record_bytes(timestamp: u32, token: &[u8]) -> Vec<u8> {
        FeedbackRecord::new(timestamp, Bytes::copy_from_slice(token))
            .encode()
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_record_layout() {
        let bytes = make_record_bytes(0x01020304, &[0xaa, 0xbb]);
        assert_eq!(bytes, [1, 2, 3, 4, 0, 2, 0xaa, 0xbb]);
    }

    #[test]
    fn test_iterate_multiple_records() {
        let mut bytes = make_record_bytes(1, &[0x11; 32]);
        bytes.extend(make_record_bytes(2, &[0x22; 32]));
        bytes.extend(make_record_bytes(3, &[0x33; 32]));

        let records: Vec<_> = decode_feedback(&bytes).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].timestamp, 1);
        assert_eq!(records[2].token_hex(), "33".repeat(32));
        assert_eq!(
            records[1].device_token(),
            Some(DeviceToken::from_bytes([0x22; 32]))
        );
    }

    #[test]
    fn test_trailing_partial_header_ends_iteration() {
        let mut bytes = make_record_bytes(1, &[0x11; 32]);
        bytes.extend_from_slice(&[0, 0, 0]);

        let mut iter = decode_feedback(&bytes);
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert_eq!(iter.remainder(), &[0, 0, 0]);
    }

    #[test]
    fn test_trailing_partial_token_ends_iteration() {
        let full = make_record_bytes(1, &[0x11; 32]);
        let records: Vec<_> = decode_feedback(&full[..full.len() - 1]).collect();
        assert!(records.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(decode_feedback(&[]).count(), 0);
    }

    #[test]
    fn test_encode_rejects_oversized_token() {
        let record = FeedbackRecord::new(1, Bytes::from(vec![0xab; 70_000]));
        let err = record.encode().unwrap_err();
        assert!(matches!(
            err,
            ApnsError::DataOverflow { size: 70_000, limit } if limit == MAX_ITEM_DATA_SIZE
        ));
    }

    #[test]
    fn test_encode_largest_token_roundtrips() {
        let record = FeedbackRecord::new(1, Bytes::from(vec![0xab; MAX_ITEM_DATA_SIZE]));
        let bytes = record.encode().unwrap();

        let decoded: Vec<_> = decode_feedback(&bytes).collect();
        assert_eq!(decoded, vec![record]);
    }

    #[test]
    fn test_short_token_has_no_device_token() {
        let record = FeedbackRecord::new(0, Bytes::from_static(&[1, 2, 3]));
        assert!(record.device_token().is_none());
        assert_eq!(record.token_hex(), "010203");
    }

    #[test]
    fn test_buffer_byte_at_a_time() {
        let mut buffer = FeedbackBuffer::new();
        let bytes = make_record_bytes(77, &[0x44; 32]);

        let mut all = Vec::new();
        for byte in &bytes {
            all.extend(buffer.push(&[*byte]));
        }

        assert_eq!(all.len(), 1);
        assert_eq!(all[0].timestamp, 77);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_buffer_fragmented_header_and_token() {
        let mut buffer = FeedbackBuffer::new();
        let bytes = make_record_bytes(5, &[0x55; 32]);

        assert!(buffer.push(&bytes[..4]).is_empty());
        assert_eq!(buffer.state_name(), "WaitingForHeader");

        assert!(buffer.push(&bytes[4..10]).is_empty());
        assert_eq!(buffer.state_name(), "WaitingForToken");
        assert_eq!(buffer.len(), 10);

        let records = buffer.push(&bytes[10..]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].token, Bytes::copy_from_slice(&[0x55; 32]));
    }

    #[test]
    fn test_buffer_mixed_complete_and_partial() {
        let mut buffer = FeedbackBuffer::new();
        let first = make_record_bytes(1, &[0x01; 32]);
        let second = make_record_bytes(2, &[0x02; 32]);

        let mut data = first.clone();
        data.extend_from_slice(&second[..8]);

        let records = buffer.push(&data);
        assert_eq!(records.len(), 1);
        assert_eq!(buffer.len(), 8);

        let records = buffer.push(&second[8..]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp, 2);
    }

    #[test]
    fn test_buffer_zero_length_token() {
        let mut buffer = FeedbackBuffer::new();
        let records = buffer.push(&make_record_bytes(9, &[]));
        assert_eq!(records.len(), 1);
        assert!(records[0].token.is_empty());
    }

    #[test]
    fn test_clear_resets_state() {
        let mut buffer = FeedbackBuffer::new();
        let bytes = make_record_bytes(1, &[0x11; 32]);
        buffer.push(&bytes[..8]);
        assert!(!buffer.is_empty());

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.state_name(), "WaitingForHeader");
    }
}
