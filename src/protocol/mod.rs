//! Protocol module - binary wire format for gateway and feedback.
//!
//! This module implements the legacy binary interface:
//! - Frame and item headers, big-endian helpers
//! - Enhanced notification frames (command 2)
//! - Error responses (command 8)
//! - Feedback record decoding

mod error_response;
mod feedback;
mod frame;
mod wire_format;

pub use error_response::{ErrorResponse, Status, ERROR_RESPONSE_SIZE};
pub use feedback::{
    decode_feedback, decode_record_header, put_record_header, FeedbackBuffer, FeedbackRecord,
    FeedbackRecords, FEEDBACK_HEADER_SIZE,
};
pub use frame::{decode_frame, encode_frame, pack_frame, NotificationFrame};
pub use wire_format::{
    item_id, put_item, put_u32_item, put_u8_item, read_u32, read_u8, take_item, FrameHeader,
    ItemHeader, COMMAND_ERROR_RESPONSE, COMMAND_NOTIFICATION, FRAME_HEADER_SIZE,
    ITEM_HEADER_SIZE, MAX_ITEM_DATA_SIZE, PRIORITY_CONSERVE_POWER, PRIORITY_IMMEDIATE, TOKEN_SIZE,
};
