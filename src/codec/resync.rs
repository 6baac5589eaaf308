//! Resynchronizer
//!
//! Streaming search for the record magic, used to recover after a
//! corrupted or torn record.

use std::io::{self, Read};

use crate::error::DecodeError;

use super::fields::MAGIC;

/// Outcome of a completed scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanResult {
    /// Bytes consumed, including the 7 magic bytes
    pub consumed: u64,
}

impl ScanResult {
    /// Bytes thrown away before the magic started
    pub fn skipped(&self) -> u64 {
        self.consumed - MAGIC.len() as u64
    }
}

/// Consume bytes until a full magic sequence has been read.
///
/// On mismatch the match restarts, counting the mismatching byte when it is
/// `MAGIC[0]`. No longer fallback is needed since `MAGIC` has no proper
/// prefix that is also a suffix. The source is left positioned right after
/// the magic.
///
/// End of input with nothing consumed is `Eof`; end of input after at least
/// one byte is an `Io` error, since the caller expected a record.
pub fn scan_magic<R: Read + ?Sized>(src: &mut R) -> Result<ScanResult, DecodeError> {
    let mut matched = 0usize;
    let mut consumed = 0u64;
    let mut byte = [0u8; 1];

    loop {
        match src.read(&mut byte) {
            Ok(0) => {
                return Err(if consumed == 0 {
                    DecodeError::Eof
                } else {
                    DecodeError::unexpected_eof()
                });
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(DecodeError::Io(e)),
        }
        consumed += 1;

        if byte[0] == MAGIC[matched] {
            matched += 1;
            if matched == MAGIC.len() {
                return Ok(ScanResult { consumed });
            }
        } else {
            // The mismatching byte may itself start a new occurrence.
            matched = usize::from(byte[0] == MAGIC[0]);
        }
    }
}
