//! Binary Codec Module
//!
//! Self-describing, append-only binary encoding of one log record.
//!
//! ## Responsibilities
//! - Little-endian scalars and length-prefixed strings
//! - Typed key/value contexts over 19 value kinds
//! - Magic + version header per record
//! - Strict decoding and resynchronizing decoding after corruption
//!
//! ## Record Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (8 bytes)                                        │
//! │   Magic: 14 F2 79 D3 6B E7 3D (7) | Version: 0x00 (1)   │
//! ├─────────────────────────────────────────────────────────┤
//! │ Fields (any order)                                      │
//! │   [Tag: u8][Payload]                                    │
//! │   0 Timestamp  i64 LE UnixNano                          │
//! │   1 Level      u8 (0..5)                                │
//! │   2 Pkg        short string                             │
//! │   3 File       short string                             │
//! │   4 Line       u32 LE                                   │
//! │   5 Mark       (none)                                   │
//! │   6 Msg        string                                   │
//! │   7 Context    short string key, u8 kind, kind payload  │
//! ├─────────────────────────────────────────────────────────┤
//! │ Terminator: Tag 8 (End), no payload                     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Short string = `u8` length + bytes (max 255).
//! String = `u16 LE` length + bytes (max 65535).
//! Over-long strings are truncated on encode.

mod context;
mod decoder;
mod encoder;
mod fields;
mod primitives;
mod record;
mod resync;

pub use context::{append_context, read_context, Complex, Context, Value, ValueKind};
pub use decoder::{read_record, try_read_record, ReadOutcome, RecordReader};
pub use encoder::{append_binary_meta, reset_buf, RecordEncoder, DEFAULT_BUF_CAPACITY};
pub use fields::{FieldKind, HEADER_SIZE, MAGIC, VERSION};
pub use primitives::{MAX_SHORT_STRING, MAX_STRING};
pub use record::Record;
pub use resync::{scan_magic, ScanResult};
