//! Record buffer pool
//!
//! Recycles encode buffers between log calls. Ownership of a `BytesMut`
//! moves out on `acquire` and back in on `release`, so a buffer has at
//! most one holder at a time.

use bytes::BytesMut;
use crossbeam::queue::ArrayQueue;

use crate::codec::{append_binary_meta, reset_buf, DEFAULT_BUF_CAPACITY};

/// Buffers that grew beyond this are dropped instead of pooled
pub const MAX_RETAINED_CAPACITY: usize = 64 * 1024;

/// Lock-free pool of header-prefilled record buffers
pub struct BufferPool {
    buffers: ArrayQueue<BytesMut>,
}

impl BufferPool {
    /// Pool retaining at most `max_pooled` idle buffers
    pub fn new(max_pooled: usize) -> Self {
        Self {
            buffers: ArrayQueue::new(max_pooled.max(1)),
        }
    }

    /// Take an idle buffer, or allocate one. Starts with magic + version.
    pub fn acquire(&self) -> BytesMut {
        match self.buffers.pop() {
            Some(buf) => buf,
            None => {
                let mut buf = BytesMut::with_capacity(DEFAULT_BUF_CAPACITY);
                append_binary_meta(&mut buf);
                buf
            }
        }
    }

    /// Return a buffer once its record has been consumed
    pub fn release(&self, mut buf: BytesMut) {
        if buf.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        reset_buf(&mut buf);
        // Full pool: the buffer is simply dropped.
        let _ = self.buffers.push(buf);
    }

    /// Idle buffers currently held
    pub fn idle(&self) -> usize {
        self.buffers.len()
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(64)
    }
}
