//! Gateway connection over an established stream.
//!
//! The stream is whatever the TLS layer hands over; this module only writes
//! frames and listens for the gateway's error response.
//!
//! After each send the gateway either stays silent (accepted) or writes a
//! 6-byte error response and closes the connection. [`GatewayConnection::send`]
//! waits `APNS_ERROR_TIMEOUT` for that response.
//!
//! # Example
//!
//! ```ignore
//! use apns_wire::{ApnsConfig, Notification, PayloadBuilder};
//! use apns_wire::transport::GatewayConnection;
//!
//! let config = ApnsConfig::production();
//! let mut conn = GatewayConnection::new(tls_stream);
//! conn.send(
//!     &Notification::new(token).payload(PayloadBuilder::new().alert("hi")),
//!     &config,
//! )
//! .await?;
//! ```

use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::ApnsConfig;
use crate::error::{ApnsError, Result};
use crate::notification::Notification;
use crate::protocol::{ErrorResponse, Status, ERROR_RESPONSE_SIZE};

/// A connection to the notification gateway.
pub struct GatewayConnection<S> {
    stream: S,
    /// Partial error response bytes carried across timed-out reads.
    pending: BytesMut,
}

impl<S> GatewayConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an established stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            pending: BytesMut::with_capacity(ERROR_RESPONSE_SIZE),
        }
    }

    /// Get a reference to the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Write one encoded frame and flush.
    pub async fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.stream.write_all(frame).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Wait up to `timeout` for an error response.
    ///
    /// Returns `Ok(None)` if nothing arrives in time. Bytes of a partially
    /// received response are kept for the next call.
    ///
    /// # Errors
    ///
    /// `ConnectionClosed` if the gateway closes the stream first.
    pub async fn read_error(&mut self, timeout: Duration) -> Result<Option<ErrorResponse>> {
        let stream = &mut self.stream;
        let pending = &mut self.pending;

        let read = async {
            while pending.len() < ERROR_RESPONSE_SIZE {
                if stream.read_buf(&mut *pending).await? == 0 {
                    return Err(ApnsError::ConnectionClosed);
                }
            }
            Ok::<(), ApnsError>(())
        };

        let outcome = tokio::time::timeout(timeout, read).await;
        match outcome {
            Err(_elapsed) => Ok(None),
            Ok(Err(e)) => Err(e),
            Ok(Ok(())) => {
                let bytes = self.pending.split_to(ERROR_RESPONSE_SIZE);
                let response = ErrorResponse::decode(&bytes)?;
                tracing::warn!(
                    status = response.status.code(),
                    identifier = response.identifier,
                    "Gateway returned error response: {}",
                    response.status.description()
                );
                Ok(Some(response))
            }
        }
    }

    /// Encode and send a notification, then wait `config.error_timeout`
    /// for a rejection.
    ///
    /// Nothing is written when encoding fails.
    ///
    /// # Errors
    ///
    /// - encoding errors (`DataOverflow`, `InvalidTokenFormat`, ...)
    /// - `Service` carrying the gateway's error response
    /// - `ConnectionClosed` or `Io` from the stream
    pub async fn send(&mut self, notification: &Notification, config: &ApnsConfig) -> Result<()> {
        let frame = notification.encode(config)?;
        self.send_frame(&frame).await?;
        tracing::debug!(
            identifier = notification.id(),
            bytes = frame.len(),
            "Sent notification"
        );

        match self.read_error(config.error_timeout).await? {
            None => Ok(()),
            Some(response) if response.status == Status::NoErrors => Ok(()),
            Some(response) => Err(ApnsError::Service(response)),
        }
    }
}
