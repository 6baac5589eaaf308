//! Record assembler
//!
//! Appends the fields of one record into an owned `BytesMut`. Every append
//! is infallible; the encoder performs no I/O and takes no lock.
//!
//! ```
//! use glog::codec::RecordEncoder;
//! use glog::Level;
//!
//! let mut enc = RecordEncoder::new();
//! enc.level(Level::Info).pkg("svc").line(42).msg("hello").context("n", 7i32);
//! let bytes = enc.finish_now();
//! assert_eq!(bytes.last(), Some(&8));
//! ```

use bytes::BytesMut;
use chrono::{DateTime, Utc};

use crate::level::Level;

use super::context::{append_context, Value};
use super::fields::{self, HEADER_SIZE, MAGIC, VERSION};

/// Initial capacity of a fresh record buffer
pub const DEFAULT_BUF_CAPACITY: usize = 512;

/// Append magic + version to `dst`
pub fn append_binary_meta(dst: &mut BytesMut) {
    fields::append_header(dst);
}

/// Truncate a record buffer back to its header, keeping the allocation.
///
/// A buffer that does not start with a valid header is cleared and given one.
pub fn reset_buf(dst: &mut BytesMut) {
    if has_header(dst) {
        dst.truncate(HEADER_SIZE);
    } else {
        dst.clear();
        append_binary_meta(dst);
    }
}

fn has_header(buf: &[u8]) -> bool {
    buf.len() >= HEADER_SIZE && buf[..MAGIC.len()] == MAGIC && buf[MAGIC.len()] == VERSION
}

/// Builder for one binary record
#[derive(Debug)]
pub struct RecordEncoder {
    buf: BytesMut,
}

impl RecordEncoder {
    /// Fresh buffer with the header already appended
    pub fn new() -> Self {
        Self::from_buf(BytesMut::with_capacity(DEFAULT_BUF_CAPACITY))
    }

    /// Reuse an existing buffer (typically from a `BufferPool`)
    pub fn from_buf(mut buf: BytesMut) -> Self {
        reset_buf(&mut buf);
        Self { buf }
    }

    /// Drop everything appended after the header
    pub fn reset(&mut self) -> &mut Self {
        reset_buf(&mut self.buf);
        self
    }

    pub fn level(&mut self, level: Level) -> &mut Self {
        fields::append_level(&mut self.buf, level);
        self
    }

    /// Truncated to 255 bytes
    pub fn pkg(&mut self, pkg: &str) -> &mut Self {
        fields::append_pkg(&mut self.buf, pkg);
        self
    }

    /// Truncated to 255 bytes
    pub fn file(&mut self, file: &str) -> &mut Self {
        fields::append_file(&mut self.buf, file);
        self
    }

    pub fn line(&mut self, line: u32) -> &mut Self {
        fields::append_line(&mut self.buf, line);
        self
    }

    pub fn mark(&mut self) -> &mut Self {
        fields::append_mark(&mut self.buf);
        self
    }

    /// Truncated to 65535 bytes
    pub fn msg(&mut self, msg: &str) -> &mut Self {
        fields::append_msg(&mut self.buf, msg);
        self
    }

    pub fn context(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        append_context(&mut self.buf, key, &value.into());
        self
    }

    /// Append a context without taking ownership of the value
    pub fn context_ref(&mut self, key: &str, value: &Value) -> &mut Self {
        append_context(&mut self.buf, key, value);
        self
    }

    pub fn timestamp(&mut self, tm: &DateTime<Utc>) -> &mut Self {
        fields::append_timestamp(&mut self.buf, tm);
        self
    }

    /// Bytes appended so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append the End tag and hand back the completed record
    pub fn finish(mut self) -> BytesMut {
        fields::append_end(&mut self.buf);
        self.buf
    }

    /// Stamp the record with the current time, then finish it
    pub fn finish_now(mut self) -> BytesMut {
        self.timestamp(&Utc::now());
        self.finish()
    }
}

impl Default for RecordEncoder {
    fn default() -> Self {
        Self::new()
    }
}
