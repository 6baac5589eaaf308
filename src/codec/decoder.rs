//! Record reader
//!
//! Strict (`read_record`) and resynchronizing (`try_read_record`) decoding
//! of one record from a byte source, plus `RecordReader`, which applies the
//! "strict while healthy, resync after a failure" policy to a whole stream.
//!
//! Sources are read a few bytes at a time; wrap files and sockets in a
//! `BufReader`.

use std::io::{self, Read};

use crate::error::DecodeError;

use super::fields::{read_fields, MAGIC, VERSION};
use super::primitives::read_u8;
use super::record::Record;
use super::resync::scan_magic;

/// Decode the record that starts exactly at the current position.
///
/// Fields present on the wire overwrite the corresponding fields of `record`
/// and contexts are appended; pass a fresh or `clear()`ed record.
///
/// End of input before the magic, or inside a genuine magic prefix, is
/// `Eof`; any mismatching byte is `Magic`. Nothing is rewound on failure.
pub fn read_record<R: Read>(record: &mut Record, src: &mut R) -> Result<(), DecodeError> {
    read_magic(src)?;
    read_body(record, src)
}

/// Skip to the next magic occurrence, discarding everything before it, then
/// decode the record that follows.
///
/// Only useful on a stream that can still produce bytes; after a clean `Eof`
/// it returns `Eof` again.
pub fn try_read_record<R: Read>(record: &mut Record, src: &mut R) -> Result<(), DecodeError> {
    let scan = scan_magic(src)?;
    if scan.skipped() > 0 {
        tracing::trace!(skipped = scan.skipped(), "resynchronized on record magic");
    }
    read_body(record, src)
}

fn read_magic<R: Read>(src: &mut R) -> Result<(), DecodeError> {
    let mut magic = [0u8; MAGIC.len()];
    let mut filled = 0;
    while filled < magic.len() {
        match src.read(&mut magic[filled..]) {
            // A torn header at the tail of a live file means "nothing more yet".
            Ok(0) if magic[..filled] == MAGIC[..filled] => return Err(DecodeError::Eof),
            Ok(0) => {
                return Err(DecodeError::Magic {
                    got: magic[..filled].to_vec(),
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(DecodeError::Io(e)),
        }
    }

    if magic != MAGIC {
        return Err(DecodeError::Magic {
            got: magic.to_vec(),
        });
    }
    Ok(())
}

fn read_body<R: Read>(record: &mut Record, src: &mut R) -> Result<(), DecodeError> {
    let version = read_u8(src)?;
    if version != VERSION {
        return Err(DecodeError::Version { got: version });
    }
    read_fields(record, src)
}

// =============================================================================
// Stream Reader
// =============================================================================

/// Outcome of one `RecordReader::read_next` call that produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Decoded in strict mode: the stream was aligned
    Aligned,
    /// Decoded after skipping damaged bytes
    Resynchronized,
}

/// Sequential reader over a possibly damaged record stream.
///
/// Reads strictly while the stream is healthy and switches to
/// `try_read_record` after a magic/version/format failure, switching back
/// once a record decodes cleanly.
pub struct RecordReader<R> {
    src: R,
    /// Set after a recoverable failure
    resync: bool,
    /// Set after `Eof` or an I/O error; no further reads are attempted
    done: bool,
    records: u64,
    corruptions: u64,
}

impl<R: Read> RecordReader<R> {
    pub fn new(src: R) -> Self {
        Self {
            src,
            resync: false,
            done: false,
            records: 0,
            corruptions: 0,
        }
    }

    /// Read the next record into `record` (which is cleared first).
    ///
    /// Recoverable errors are returned to the caller once per failure so it
    /// can report the damage; the next call resynchronizes.
    pub fn read_next(&mut self, record: &mut Record) -> Result<ReadOutcome, DecodeError> {
        if self.done {
            return Err(DecodeError::Eof);
        }

        record.clear();
        let result = if self.resync {
            try_read_record(record, &mut self.src)
        } else {
            read_record(record, &mut self.src)
        };

        match result {
            Ok(()) => {
                self.records += 1;
                let outcome = if self.resync {
                    ReadOutcome::Resynchronized
                } else {
                    ReadOutcome::Aligned
                };
                self.resync = false;
                Ok(outcome)
            }
            Err(e) if e.is_recoverable() => {
                self.corruptions += 1;
                self.resync = true;
                Err(e)
            }
            Err(e) => {
                self.done = true;
                Err(e)
            }
        }
    }

    /// Records decoded so far
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Recoverable failures seen so far
    pub fn corruptions(&self) -> u64 {
        self.corruptions
    }

    pub fn into_inner(self) -> R {
        self.src
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    /// Every decoded record, every recoverable failure, then at most one
    /// terminal I/O error. A clean `Eof` ends iteration.
    type Item = Result<Record, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = Record::new();
        match self.read_next(&mut record) {
            Ok(_) => Some(Ok(record)),
            Err(DecodeError::Eof) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
