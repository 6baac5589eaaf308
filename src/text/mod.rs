//! Text Rendering Module
//!
//! Human-readable, optionally ANSI-colored rendering of decoded records.
//!
//! ## Line Format
//! ```text
//! 2024-01-31 23:59:59.123456 INFO  @@@@@@@@ svc main.rs 42 <hello> (n: 7)
//! └── local time ──────────┘ level  mark    pkg file    line msg   contexts
//! ```
//! Mark, file and line are omitted when absent.

use std::fmt::Write as _;
use std::io::Cursor;

use chrono::{DateTime, Local, Utc};

use crate::codec::{read_record, Context, Record, Value};
use crate::error::DecodeError;
use crate::level::Level;

// =============================================================================
// Palette
// =============================================================================

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const MAGENTA: &str = "\x1b[35m";
pub const CYAN: &str = "\x1b[36m";
pub const RESET: &str = "\x1b[0m";

/// Default layout for record times and Time values
pub const TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const SEPARATOR: &str = " ";
const MARK: &str = "@@@@@@@@";

/// Line written in place of records that could not be decoded
pub const CORRUPTION_BANNER: &str = "!!!!!!!! one or more corrupted logs !!!!!!!!";

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Trace | Level::Debug | Level::Info => GREEN,
        Level::Warn => YELLOW,
        Level::Error | Level::Fatal => RED,
    }
}

/// Corruption banner line, newline-terminated
pub fn corruption_banner(coloring: bool) -> String {
    if coloring {
        format!("{}{}{}\n", MAGENTA, CORRUPTION_BANNER, RESET)
    } else {
        format!("{}\n", CORRUPTION_BANNER)
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Writes segments, wrapping them in color codes when enabled
struct Dyer<'a> {
    out: &'a mut String,
    content_color: &'static str,
    coloring: bool,
}

impl Dyer<'_> {
    fn content(&mut self, s: &str) {
        self.dye(s, self.content_color);
    }

    fn symbol(&mut self, s: &str) {
        self.dye(s, CYAN);
    }

    fn key(&mut self, s: &str) {
        self.dye(s, BLUE);
    }

    fn plain(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn dye(&mut self, s: &str, color: &str) {
        if self.coloring {
            self.out.push_str(color);
            self.out.push_str(s);
            self.out.push_str(RESET);
        } else {
            self.out.push_str(s);
        }
    }
}

/// Render one record as a newline-terminated line
pub fn format_record(record: &Record, coloring: bool) -> String {
    let mut out = String::with_capacity(128 + record.msg.len());
    let mut dyer = Dyer {
        out: &mut out,
        content_color: level_color(record.level),
        coloring,
    };

    dyer.content(&format_time(&record.time, None));

    dyer.plain(SEPARATOR);
    dyer.content(record.level.as_str());

    if record.mark {
        dyer.plain(SEPARATOR);
        dyer.symbol(MARK);
    }

    dyer.plain(SEPARATOR);
    dyer.content(&record.pkg);

    if !record.file.is_empty() {
        dyer.plain(SEPARATOR);
        dyer.content(&record.file);
    }

    if record.line != 0 {
        dyer.plain(SEPARATOR);
        dyer.content(&record.line.to_string());
    }

    dyer.plain(SEPARATOR);
    dyer.symbol("<");
    dyer.content(&record.msg);
    dyer.symbol(">");

    for context in &record.contexts {
        dyer.plain(SEPARATOR);
        dyer.symbol("(");
        dyer.key(&context.key);
        dyer.symbol(":");
        dyer.plain(SEPARATOR);
        dyer.content(&format_value(context));
        dyer.symbol(")");
    }

    out.push('\n');
    out
}

/// Decode one record strictly from `bytes` and render it
pub fn binary_to_text(bytes: &[u8], coloring: bool) -> Result<String, DecodeError> {
    let mut record = Record::new();
    read_record(&mut record, &mut Cursor::new(bytes))?;
    Ok(format_record(&record, coloring))
}

/// Render a context value, honoring its display hint where one applies.
///
/// Hints: a strftime layout for Time; `x`, `X`, `#x`, `o`, `b` for integers.
pub fn format_value(context: &Context) -> String {
    let hint = context.format.as_deref();
    match &context.value {
        Value::Bool(v) => v.to_string(),
        Value::Byte(v) => format!("{:#04x}", v),
        Value::Rune(v) => v.to_string(),
        Value::Int8(v) => format_int(*v, hint),
        Value::Int16(v) => format_int(*v, hint),
        Value::Int32(v) => format_int(*v, hint),
        Value::Int64(v) => format_int(*v, hint),
        Value::Uint8(v) => format_int(*v, hint),
        Value::Uint16(v) => format_int(*v, hint),
        Value::Uint32(v) => format_int(*v, hint),
        Value::Uint64(v) => format_int(*v, hint),
        Value::Uintptr(v) => format!("{:#x}", v),
        Value::Float32(v) => v.to_string(),
        Value::Float64(v) => v.to_string(),
        Value::Complex64(c) => format!("({}{:+}i)", c.re, c.im),
        Value::Complex128(c) => format!("({}{:+}i)", c.re, c.im),
        Value::String(v) => v.clone(),
        Value::Time(v) => format_time(v, hint),
        Value::Duration(v) => format!("{:?}", v),
    }
}

fn format_int<T>(v: T, hint: Option<&str>) -> String
where
    T: std::fmt::Display + std::fmt::LowerHex + std::fmt::UpperHex + std::fmt::Octal + std::fmt::Binary,
{
    match hint {
        Some("x") => format!("{:x}", v),
        Some("X") => format!("{:X}", v),
        Some("#x") => format!("{:#x}", v),
        Some("o") => format!("{:o}", v),
        Some("b") => format!("{:b}", v),
        _ => v.to_string(),
    }
}

fn format_time(tm: &DateTime<Utc>, layout: Option<&str>) -> String {
    let local = tm.with_timezone(&Local);
    if let Some(layout) = layout {
        let mut out = String::new();
        // An invalid layout surfaces as fmt::Error; fall back to the default.
        if write!(out, "{}", local.format(layout)).is_ok() {
            return out;
        }
    }
    local.format(TIME_LAYOUT).to_string()
}
