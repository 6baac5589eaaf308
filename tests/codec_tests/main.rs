//! Integration tests for the binary record codec
//!
//! These tests verify:
//! - Round-trip of records and every context kind
//! - Sequential decoding of back-to-back records
//! - String truncation boundaries
//! - Rejection of illegal bytes and recovery after corruption

mod corruption_tests;

use std::io::Cursor;

use glog::codec::{read_record, Record, RecordEncoder};
use glog::DecodeError;

// =============================================================================
// Helper Functions
// =============================================================================

/// Encode every populated field of `record`, in reference order
pub fn encode(record: &Record) -> Vec<u8> {
    let mut enc = RecordEncoder::new();
    enc.level(record.level).pkg(&record.pkg);
    if !record.file.is_empty() {
        enc.file(&record.file);
    }
    if record.line != 0 {
        enc.line(record.line);
    }
    if record.mark {
        enc.mark();
    }
    enc.msg(&record.msg);
    for context in &record.contexts {
        enc.context_ref(&context.key, &context.value);
    }
    enc.timestamp(&record.time);
    enc.finish().to_vec()
}

/// Strictly decode the single record in `bytes`
pub fn decode(bytes: &[u8]) -> Result<Record, DecodeError> {
    let mut record = Record::new();
    read_record(&mut record, &mut Cursor::new(bytes))?;
    Ok(record)
}
