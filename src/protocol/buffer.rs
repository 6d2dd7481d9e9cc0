//! Receive buffer
//!
//! Responses have no length prefix, so the receiver cannot size its buffer up
//! front. `ResponseBuffer` starts at the configured capacity and doubles it
//! whenever the write cursor reaches the end.

use std::io::{self, Read};

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Growable byte-at-a-time receive buffer
#[derive(Debug)]
pub struct ResponseBuffer {
    buf: BytesMut,

    /// Logical capacity; doubles when `buf.len()` reaches it
    capacity: usize,
}

impl ResponseBuffer {
    /// Create a buffer with the given initial capacity (at least 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Append one byte, growing first if the cursor is at the end
    pub fn push(&mut self, byte: u8) {
        if self.buf.len() == self.capacity {
            self.grow();
        }
        self.buf.put_u8(byte);
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity.saturating_mul(2);
        self.buf.reserve(new_capacity - self.buf.len());
        tracing::trace!("Response buffer grown from {} to {} bytes", self.capacity, new_capacity);
        self.capacity = new_capacity;
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Current logical capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Convert into an immutable buffer holding exactly the bytes written
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a stream byte by byte until end-of-stream
///
/// Pass a buffered reader; each byte is pulled individually.
pub fn read_until_eof<R: Read>(reader: &mut R, initial_capacity: usize) -> io::Result<Bytes> {
    let mut buffer = ResponseBuffer::with_capacity(initial_capacity);
    for byte in reader.bytes() {
        buffer.push(byte?);
    }
    Ok(buffer.freeze())
}

/// Async counterpart of [`read_until_eof`]
pub async fn read_until_eof_async<R: AsyncRead + Unpin>(
    reader: &mut R,
    initial_capacity: usize,
) -> io::Result<Bytes> {
    let mut buffer = ResponseBuffer::with_capacity(initial_capacity);
    loop {
        match reader.read_u8().await {
            Ok(byte) => buffer.push(byte),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        }
    }
    Ok(buffer.freeze())
}
