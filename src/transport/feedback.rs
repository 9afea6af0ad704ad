//! Async reader for the feedback service.
//!
//! The feedback service writes every pending record and then closes the
//! connection, so the reader runs until EOF. A partial record left at EOF
//! is dropped.

use std::collections::VecDeque;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::Result;
use crate::protocol::{FeedbackBuffer, FeedbackRecord};

/// Read chunk size.
const READ_CHUNK_SIZE: usize = 4096;

/// Lazily yields feedback records from a stream.
pub struct FeedbackReader<R> {
    reader: R,
    buffer: FeedbackBuffer,
    ready: VecDeque<FeedbackRecord>,
    eof: bool,
}

impl<R> FeedbackReader<R>
where
    R: AsyncRead + Unpin,
{
    /// Wrap an established stream.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: FeedbackBuffer::new(),
            ready: VecDeque::new(),
            eof: false,
        }
    }

    /// Next record, or `Ok(None)` once the service has closed the stream.
    pub async fn next_record(&mut self) -> Result<Option<FeedbackRecord>> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        loop {
            if let Some(record) = self.ready.pop_front() {
                tracing::trace!(
                    timestamp = record.timestamp,
                    token = %record.token_hex(),
                    "Feedback record"
                );
                return Ok(Some(record));
            }

            if self.eof {
                return Ok(None);
            }

            let n = self.reader.read(&mut chunk).await?;
            if n == 0 {
                self.eof = true;
                if !self.buffer.is_empty() {
                    tracing::debug!(
                        discarded = self.buffer.len(),
                        "Feedback stream ended inside a record"
                    );
                    self.buffer.clear();
                }
                continue;
            }

            self.ready.extend(self.buffer.push(&chunk[..n]));
        }
    }

    /// Read every remaining record.
    pub async fn collect(mut self) -> Result<Vec<FeedbackRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record().await? {
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use tokio::io::{duplex, AsyncWriteExt};

    fn record(timestamp: u32, fill: u8) -> FeedbackRecord {
        FeedbackRecord::new(timestamp, Bytes::copy_from_slice(&[fill; 32]))
    }

    #[tokio::test]
    async fn test_reads_until_eof() {
        let (client, mut server) = duplex(4096);
        let mut reader = FeedbackReader::new(client);

        server.write_all(&record(1, 0xaa).encode().unwrap()).await.unwrap();
        server.write_all(&record(2, 0xbb).encode().unwrap()).await.unwrap();
        drop(server);

        assert_eq!(reader.next_record().await.unwrap(), Some(record(1, 0xaa)));
        assert_eq!(reader.next_record().await.unwrap(), Some(record(2, 0xbb)));
        assert_eq!(reader.next_record().await.unwrap(), None);
        assert_eq!(reader.next_record().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_partial_trailer_dropped() {
        let (client, mut server) = duplex(4096);

        let full = record(9, 0x01).encode().unwrap();
        server.write_all(&full).await.unwrap();
        server.write_all(&full[..10]).await.unwrap();
        drop(server);

        let records = FeedbackReader::new(client).collect().await.unwrap();
        assert_eq!(records, vec![record(9, 0x01)]);
    }

    #[tokio::test]
    async fn test_records_split_across_writes() {
        let (client, mut server) = duplex(16);

        let writer = tokio::spawn(async move {
            for i in 0..5u32 {
                server.write_all(&record(i, i as u8).encode().unwrap()).await.unwrap();
            }
        });

        let records = FeedbackReader::new(client).collect().await.unwrap();
        writer.await.unwrap();

        assert_eq!(records.len(), 5);
        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.timestamp, i as u32);
        }
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let (client, server) = duplex(64);
        drop(server);
        assert!(FeedbackReader::new(client).collect().await.unwrap().is_empty());
    }
}
