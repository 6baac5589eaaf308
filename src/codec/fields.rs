//! Field protocol
//!
//! Structural tag space of a record and the per-field append/read pair.
//! Each field is one tag byte followed by a tag-dependent payload.

use std::io::Read;

use bytes::BufMut;
use chrono::{DateTime, Utc};

use crate::error::DecodeError;
use crate::level::Level;

use super::context::{nanos_to_time, read_context, time_to_nanos};
use super::primitives::*;
use super::record::Record;

// =============================================================================
// Header
// =============================================================================

/// Marks the start of every record; also the resynchronization target.
/// Has no proper prefix that is also a suffix, so a scan only needs to
/// restart on mismatch.
pub const MAGIC: [u8; 7] = [0x14, 0xf2, 0x79, 0xd3, 0x6b, 0xe7, 0x3d];

/// Current wire format version
pub const VERSION: u8 = 0;

/// Magic (7) + Version (1)
pub const HEADER_SIZE: usize = MAGIC.len() + 1;

// =============================================================================
// Field Kinds
// =============================================================================

/// Structural tag of a record field. The discriminant is the wire byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FieldKind {
    Timestamp = 0,
    Level = 1,
    Pkg = 2,
    File = 3,
    Line = 4,
    Mark = 5,
    Msg = 6,
    Context = 7,
    End = 8,
}

impl FieldKind {
    /// Number of legal tags; bytes `>= COUNT` are illegal
    pub const COUNT: usize = 9;

    pub const ALL: [FieldKind; FieldKind::COUNT] = [
        FieldKind::Timestamp,
        FieldKind::Level,
        FieldKind::Pkg,
        FieldKind::File,
        FieldKind::Line,
        FieldKind::Mark,
        FieldKind::Msg,
        FieldKind::Context,
        FieldKind::End,
    ];
}

impl TryFrom<u8> for FieldKind {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        FieldKind::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| DecodeError::format(format!("illegal field kind {}", value)))
    }
}

// =============================================================================
// Append
// =============================================================================

pub fn append_header<B: BufMut>(dst: &mut B) {
    dst.put_slice(&MAGIC);
    append_u8(dst, VERSION);
}

pub fn append_field_kind<B: BufMut>(dst: &mut B, kind: FieldKind) {
    append_u8(dst, kind as u8);
}

pub fn append_timestamp<B: BufMut>(dst: &mut B, tm: &DateTime<Utc>) {
    append_field_kind(dst, FieldKind::Timestamp);
    append_u64(dst, time_to_nanos(tm) as u64);
}

pub fn append_level<B: BufMut>(dst: &mut B, level: Level) {
    append_field_kind(dst, FieldKind::Level);
    append_u8(dst, level as u8);
}

pub fn append_pkg<B: BufMut>(dst: &mut B, pkg: &str) {
    append_field_kind(dst, FieldKind::Pkg);
    append_short_string(dst, pkg);
}

pub fn append_file<B: BufMut>(dst: &mut B, file: &str) {
    append_field_kind(dst, FieldKind::File);
    append_short_string(dst, file);
}

pub fn append_line<B: BufMut>(dst: &mut B, line: u32) {
    append_field_kind(dst, FieldKind::Line);
    append_u32(dst, line);
}

pub fn append_mark<B: BufMut>(dst: &mut B) {
    append_field_kind(dst, FieldKind::Mark);
}

pub fn append_msg<B: BufMut>(dst: &mut B, msg: &str) {
    append_field_kind(dst, FieldKind::Msg);
    append_string(dst, msg);
}

pub fn append_end<B: BufMut>(dst: &mut B) {
    append_field_kind(dst, FieldKind::End);
}

// =============================================================================
// Read
// =============================================================================

type FieldReader = fn(&mut Record, &mut dyn Read) -> Result<(), DecodeError>;

/// Field readers indexed by tag. `End` carries no payload and is handled by
/// the loop in `read_fields` before dispatch.
const FIELD_READERS: [FieldReader; FieldKind::COUNT] = [
    |rec, r| {
        rec.time = nanos_to_time(read_u64(r)? as i64);
        Ok(())
    },
    |rec, r| {
        rec.level = Level::try_from(read_u8(r)?)?;
        Ok(())
    },
    |rec, r| {
        rec.pkg = read_short_string(r)?;
        Ok(())
    },
    |rec, r| {
        rec.file = read_short_string(r)?;
        Ok(())
    },
    |rec, r| {
        rec.line = read_u32(r)?;
        Ok(())
    },
    |rec, _| {
        rec.mark = true;
        Ok(())
    },
    |rec, r| {
        rec.msg = read_string(r)?;
        Ok(())
    },
    |rec, r| {
        rec.contexts.push(read_context(r)?);
        Ok(())
    },
    |_, _| Ok(()),
];

/// Read tagged fields into `record` until the End tag.
///
/// Any failure aborts immediately; the source is left just past the
/// failing read and is not rewound.
pub fn read_fields(record: &mut Record, src: &mut dyn Read) -> Result<(), DecodeError> {
    loop {
        let kind = FieldKind::try_from(read_u8(src)?)?;
        if kind == FieldKind::End {
            return Ok(());
        }
        FIELD_READERS[kind as usize](record, src)?;
    }
}
