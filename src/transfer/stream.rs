//! Write cursor for streaming into a caller-supplied buffer.

use crate::error::{ErrorKind, TransferError};

/// Tracks how many bytes have been written into a fixed-size buffer.
///
/// The offset never exceeds the buffer's capacity: a chunk that would cross
/// it is rejected before any byte is copied, and the transfer fails for that
/// unit rather than silently truncating.
pub struct StreamData<'a> {
    buffer: &'a mut [u8],
    offset: usize,
    total: u64,
}

impl<'a> StreamData<'a> {
    /// Creates a cursor over `buffer` expecting `total` bytes (0 if unknown).
    pub fn new(buffer: &'a mut [u8], total: u64) -> Self {
        Self {
            buffer,
            offset: 0,
            total,
        }
    }

    /// Bytes written so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Expected total size of the stream, 0 when unknown upfront.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The buffer's capacity.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Copies `chunk` at the current offset and advances it.
    ///
    /// Fails before copying anything when the chunk does not fit.
    pub fn write(
        &mut self,
        chunk: &[u8],
        url: &str,
        custom_id: &str,
    ) -> Result<(), TransferError> {
        let end = self.offset.checked_add(chunk.len()).filter(|&e| e <= self.buffer.len());
        let Some(end) = end else {
            return Err(TransferError::new(
                ErrorKind::Network,
                format!(
                    "response exceeds buffer capacity ({} bytes) at offset {}",
                    self.buffer.len(),
                    self.offset
                ),
                url,
                custom_id,
            ));
        };
        self.buffer[self.offset..end].copy_from_slice(chunk);
        self.offset = end;
        Ok(())
    }
}
