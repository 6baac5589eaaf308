//! Illegal input and corruption recovery tests

use std::io::Cursor;

use chrono::DateTime;
use glog::codec::{
    read_record, scan_magic, try_read_record, Context, ReadOutcome, Record, RecordEncoder,
    RecordReader, HEADER_SIZE, MAGIC,
};
use glog::{DecodeError, Level};

use super::{decode, encode};

// =============================================================================
// Helper Functions
// =============================================================================

fn record(msg: &str) -> Record {
    let mut record = Record::new();
    record.level = Level::Warn;
    record.pkg = "corrupt".into();
    record.msg = msg.into();
    record.time = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    record.contexts.push(Context::new("ok", true));
    record
}

/// 20 bytes that contain no magic byte sequence
fn garbage() -> Vec<u8> {
    (0x20u8..0x34).collect()
}

fn header_then(body: &[u8]) -> Vec<u8> {
    let mut bytes = MAGIC.to_vec();
    bytes.push(0);
    bytes.extend_from_slice(body);
    bytes
}

// =============================================================================
// Illegal Byte Tests
// =============================================================================

#[test]
fn test_illegal_field_tags() {
    for tag in [9u8, 10, 100, 255] {
        let err = decode(&header_then(&[tag])).unwrap_err();
        assert!(matches!(err, DecodeError::Format { .. }), "tag {}", tag);
    }
}

#[test]
fn test_illegal_value_kind() {
    let err = decode(&header_then(&[7, 1, b'k', 19])).unwrap_err();
    assert!(matches!(err, DecodeError::Format { .. }));
}

#[test]
fn test_illegal_bool_payload() {
    let err = decode(&header_then(&[7, 1, b'b', 0, 2, 8])).unwrap_err();
    assert!(matches!(err, DecodeError::Format { .. }));
}

#[test]
fn test_illegal_level() {
    let err = decode(&header_then(&[1, 6, 8])).unwrap_err();
    assert!(matches!(err, DecodeError::Format { .. }));
}

#[test]
fn test_unsupported_version() {
    let mut bytes = MAGIC.to_vec();
    bytes.extend_from_slice(&[1, 8]);
    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, DecodeError::Version { got: 1 }));
}

#[test]
fn test_missing_end_is_io() {
    let mut enc = RecordEncoder::new();
    enc.msg("no end");
    let err = decode(enc.as_bytes()).unwrap_err();
    assert!(err.is_io());
}

// =============================================================================
// Partial Header Tests
// =============================================================================

#[test]
fn test_partial_magic_at_eof() {
    let bytes = MAGIC[..3].to_vec();

    let err = decode(&bytes).unwrap_err();
    assert!(err.is_eof());

    let mut record = Record::new();
    let err = try_read_record(&mut record, &mut Cursor::new(&bytes)).unwrap_err();
    assert!(err.is_eof() || err.is_io());
}

#[test]
fn test_short_garbage_at_eof_is_magic_error() {
    let r1 = record("last");
    let bytes = [encode(&r1), vec![0xde, 0xad, 0xbe]].concat();
    let mut src = Cursor::new(bytes);
    let mut record = Record::new();

    read_record(&mut record, &mut src).unwrap();
    assert_eq!(record, r1);

    let err = read_record(&mut Record::new(), &mut src).unwrap_err();
    match err {
        DecodeError::Magic { got } => assert_eq!(got, vec![0xde, 0xad, 0xbe]),
        other => panic!("expected magic error, got {:?}", other),
    }
}

#[test]
fn test_torn_magic_with_wrong_tail_is_magic_error() {
    let mut bytes = MAGIC[..4].to_vec();
    bytes.push(0x00);

    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, DecodeError::Magic { ref got } if got.len() == 5));
}

#[test]
fn test_magic_without_version_is_io() {
    let err = decode(&MAGIC).unwrap_err();
    assert!(err.is_io());
}

// =============================================================================
// Recovery Tests
// =============================================================================

#[test]
fn test_garbage_between_records_recovers() {
    let (r1, r2) = (record("first"), record("second"));
    let bytes = [encode(&r1), garbage(), encode(&r2)].concat();
    let mut src = Cursor::new(bytes);

    let mut decoded = Record::new();
    read_record(&mut decoded, &mut src).unwrap();
    assert_eq!(decoded, r1);

    let err = read_record(&mut Record::new(), &mut src).unwrap_err();
    assert!(matches!(err, DecodeError::Magic { .. }));

    let mut decoded = Record::new();
    try_read_record(&mut decoded, &mut src).unwrap();
    assert_eq!(decoded, r2);
}

#[test]
fn test_corrupted_tag_recovers_next_record() {
    let (r1, r2) = (record("first"), record("second"));
    let mut first = encode(&r1);
    first[HEADER_SIZE] = 0x42;
    let mut src = Cursor::new([first, encode(&r2)].concat());

    let err = read_record(&mut Record::new(), &mut src).unwrap_err();
    assert!(matches!(err, DecodeError::Format { .. }));

    let mut decoded = Record::new();
    try_read_record(&mut decoded, &mut src).unwrap();
    assert_eq!(decoded, r2);
}

#[test]
fn test_stray_magic_byte_before_record() {
    let r = record("after stray");
    let bytes = [vec![0x14], encode(&r)].concat();

    let scan = scan_magic(&mut Cursor::new(&bytes)).unwrap();
    assert_eq!(scan.skipped(), 1);

    let mut decoded = Record::new();
    try_read_record(&mut decoded, &mut Cursor::new(&bytes)).unwrap();
    assert_eq!(decoded, r);
}

#[test]
fn test_reader_resynchronizes() {
    let records: Vec<Record> = ["a", "b", "c"].iter().map(|m| record(m)).collect();
    let bytes = [
        encode(&records[0]),
        garbage(),
        encode(&records[1]),
        encode(&records[2]),
    ]
    .concat();

    let mut reader = RecordReader::new(Cursor::new(bytes));
    let mut decoded = Record::new();

    assert_eq!(reader.read_next(&mut decoded).unwrap(), ReadOutcome::Aligned);
    assert_eq!(decoded, records[0]);

    assert!(reader.read_next(&mut decoded).unwrap_err().is_recoverable());

    assert_eq!(
        reader.read_next(&mut decoded).unwrap(),
        ReadOutcome::Resynchronized
    );
    assert_eq!(decoded, records[1]);

    assert_eq!(reader.read_next(&mut decoded).unwrap(), ReadOutcome::Aligned);
    assert_eq!(decoded, records[2]);

    assert!(reader.read_next(&mut decoded).unwrap_err().is_eof());
    assert_eq!(reader.records(), 3);
    assert_eq!(reader.corruptions(), 1);
}
