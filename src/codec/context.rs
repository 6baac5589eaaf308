//! Context value protocol
//!
//! A context is one typed key/value attribute of a record. On the wire:
//!
//! ```text
//! ┌─────────────┬───────────────────────┬──────────┬──────────────────┐
//! │ Tag 7 (1)   │ Key (short string)    │ Kind (1) │ Kind payload     │
//! └─────────────┴───────────────────────┴──────────┴──────────────────┘
//! ```
//!
//! The value is a sum type over the 19 kinds, so a value never exists
//! without its kind.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use bytes::BufMut;
use chrono::{DateTime, Utc};

use crate::error::DecodeError;

use super::fields::{append_field_kind, FieldKind};
use super::primitives::*;

// =============================================================================
// Value Kinds
// =============================================================================

/// Type tag of a context value. The discriminant is the wire byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueKind {
    Bool = 0,
    Byte = 1,
    Rune = 2,
    Int8 = 3,
    Int16 = 4,
    Int32 = 5,
    Int64 = 6,
    Uint8 = 7,
    Uint16 = 8,
    Uint32 = 9,
    Uint64 = 10,
    Uintptr = 11,
    Float32 = 12,
    Float64 = 13,
    Complex64 = 14,
    Complex128 = 15,
    String = 16,
    Time = 17,
    Duration = 18,
}

impl ValueKind {
    /// Number of legal kinds; bytes `>= COUNT` are illegal
    pub const COUNT: usize = 19;

    /// All kinds in wire order
    pub const ALL: [ValueKind; ValueKind::COUNT] = [
        ValueKind::Bool,
        ValueKind::Byte,
        ValueKind::Rune,
        ValueKind::Int8,
        ValueKind::Int16,
        ValueKind::Int32,
        ValueKind::Int64,
        ValueKind::Uint8,
        ValueKind::Uint16,
        ValueKind::Uint32,
        ValueKind::Uint64,
        ValueKind::Uintptr,
        ValueKind::Float32,
        ValueKind::Float64,
        ValueKind::Complex64,
        ValueKind::Complex128,
        ValueKind::String,
        ValueKind::Time,
        ValueKind::Duration,
    ];
}

impl TryFrom<u8> for ValueKind {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ValueKind::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| DecodeError::format(format!("illegal value kind {}", value)))
    }
}

// =============================================================================
// Values
// =============================================================================

/// A complex number as a (real, imaginary) pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

/// A typed context value
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Byte(u8),
    Rune(char),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Uintptr(u64),
    Float32(f32),
    Float64(f64),
    Complex64(Complex<f32>),
    Complex128(Complex<f64>),
    String(String),
    Time(DateTime<Utc>),
    Duration(Duration),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Byte(_) => ValueKind::Byte,
            Value::Rune(_) => ValueKind::Rune,
            Value::Int8(_) => ValueKind::Int8,
            Value::Int16(_) => ValueKind::Int16,
            Value::Int32(_) => ValueKind::Int32,
            Value::Int64(_) => ValueKind::Int64,
            Value::Uint8(_) => ValueKind::Uint8,
            Value::Uint16(_) => ValueKind::Uint16,
            Value::Uint32(_) => ValueKind::Uint32,
            Value::Uint64(_) => ValueKind::Uint64,
            Value::Uintptr(_) => ValueKind::Uintptr,
            Value::Float32(_) => ValueKind::Float32,
            Value::Float64(_) => ValueKind::Float64,
            Value::Complex64(_) => ValueKind::Complex64,
            Value::Complex128(_) => ValueKind::Complex128,
            Value::String(_) => ValueKind::String,
            Value::Time(_) => ValueKind::Time,
            Value::Duration(_) => ValueKind::Duration,
        }
    }
}

// Floats compare by bit pattern so that a decoded NaN equals the encoded one.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a == b,
            (Byte(a), Byte(b)) => a == b,
            (Rune(a), Rune(b)) => a == b,
            (Int8(a), Int8(b)) => a == b,
            (Int16(a), Int16(b)) => a == b,
            (Int32(a), Int32(b)) => a == b,
            (Int64(a), Int64(b)) => a == b,
            (Uint8(a), Uint8(b)) => a == b,
            (Uint16(a), Uint16(b)) => a == b,
            (Uint32(a), Uint32(b)) => a == b,
            (Uint64(a), Uint64(b)) => a == b,
            (Uintptr(a), Uintptr(b)) => a == b,
            (Float32(a), Float32(b)) => a.to_bits() == b.to_bits(),
            (Float64(a), Float64(b)) => a.to_bits() == b.to_bits(),
            (Complex64(a), Complex64(b)) => {
                a.re.to_bits() == b.re.to_bits() && a.im.to_bits() == b.im.to_bits()
            }
            (Complex128(a), Complex128(b)) => {
                a.re.to_bits() == b.re.to_bits() && a.im.to_bits() == b.im.to_bits()
            }
            (String(a), String(b)) => a == b,
            (Time(a), Time(b)) => a == b,
            (Duration(a), Duration(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

// `u8` maps to Uint8; Byte and Uintptr are only reachable through their variants.
impl_from_for_value! {
    bool => Bool,
    char => Rune,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    f32 => Float32,
    f64 => Float64,
    Complex<f32> => Complex64,
    Complex<f64> => Complex128,
    String => String,
    DateTime<Utc> => Time,
    Duration => Duration,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

// =============================================================================
// Context
// =============================================================================

/// One typed key/value attribute attached to a record
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub key: String,
    pub value: Value,
    /// Display hint for the text renderer. Never encoded: decoded contexts
    /// always carry `None`.
    pub format: Option<String>,
}

impl Context {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            format: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.key, self.value)
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Time on the wire: signed nanoseconds since the Unix epoch, saturating
/// outside the representable range (about 1677..2262).
pub(crate) fn time_to_nanos(tm: &DateTime<Utc>) -> i64 {
    tm.timestamp_nanos_opt()
        .unwrap_or(if tm.timestamp() < 0 { i64::MIN } else { i64::MAX })
}

pub(crate) fn nanos_to_time(nanos: i64) -> DateTime<Utc> {
    let secs = nanos.div_euclid(1_000_000_000);
    let subsec = nanos.rem_euclid(1_000_000_000) as u32;
    DateTime::from_timestamp(secs, subsec).unwrap_or_default()
}

fn duration_to_nanos(d: &Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// Append `<Context tag><key><kind><payload>`
pub fn append_context<B: BufMut>(dst: &mut B, key: &str, value: &Value) {
    append_field_kind(dst, FieldKind::Context);
    append_short_string(dst, key);
    append_u8(dst, value.kind() as u8);
    append_value(dst, value);
}

fn append_value<B: BufMut>(dst: &mut B, value: &Value) {
    match value {
        Value::Bool(v) => append_bool(dst, *v),
        Value::Byte(v) | Value::Uint8(v) => append_u8(dst, *v),
        Value::Rune(v) => append_u32(dst, *v as u32),
        Value::Int8(v) => append_u8(dst, *v as u8),
        Value::Int16(v) => append_u16(dst, *v as u16),
        Value::Int32(v) => append_u32(dst, *v as u32),
        Value::Int64(v) => append_u64(dst, *v as u64),
        Value::Uint16(v) => append_u16(dst, *v),
        Value::Uint32(v) => append_u32(dst, *v),
        Value::Uint64(v) | Value::Uintptr(v) => append_u64(dst, *v),
        Value::Float32(v) => append_f32(dst, *v),
        Value::Float64(v) => append_f64(dst, *v),
        Value::Complex64(c) => append_complex64(dst, c.re, c.im),
        Value::Complex128(c) => append_complex128(dst, c.re, c.im),
        Value::String(v) => append_string(dst, v),
        Value::Time(v) => append_u64(dst, time_to_nanos(v) as u64),
        Value::Duration(v) => append_u64(dst, duration_to_nanos(v)),
    }
}

// =============================================================================
// Decoding
// =============================================================================

type ValueReader = fn(&mut dyn Read) -> Result<Value, DecodeError>;

/// Per-kind payload readers, indexed by the kind byte
const VALUE_READERS: [ValueReader; ValueKind::COUNT] = [
    |r| read_bool(r).map(Value::Bool),
    |r| read_u8(r).map(Value::Byte),
    |r| read_u32(r).map(|u| Value::Rune(char::from_u32(u).unwrap_or(char::REPLACEMENT_CHARACTER))),
    |r| read_u8(r).map(|u| Value::Int8(u as i8)),
    |r| read_u16(r).map(|u| Value::Int16(u as i16)),
    |r| read_u32(r).map(|u| Value::Int32(u as i32)),
    |r| read_u64(r).map(|u| Value::Int64(u as i64)),
    |r| read_u8(r).map(Value::Uint8),
    |r| read_u16(r).map(Value::Uint16),
    |r| read_u32(r).map(Value::Uint32),
    |r| read_u64(r).map(Value::Uint64),
    |r| read_u64(r).map(Value::Uintptr),
    |r| read_f32(r).map(Value::Float32),
    |r| read_f64(r).map(Value::Float64),
    |r| read_complex64(r).map(|(re, im)| Value::Complex64(Complex::new(re, im))),
    |r| read_complex128(r).map(|(re, im)| Value::Complex128(Complex::new(re, im))),
    |r| read_string(r).map(Value::String),
    |r| read_u64(r).map(|u| Value::Time(nanos_to_time(u as i64))),
    |r| read_u64(r).map(|u| Value::Duration(Duration::from_nanos(u))),
];

/// Read `<key><kind><payload>`; the Context tag has already been consumed.
pub fn read_context(src: &mut dyn Read) -> Result<Context, DecodeError> {
    let key = read_short_string(src)?;
    let kind = ValueKind::try_from(read_u8(src)?)?;
    let value = VALUE_READERS[kind as usize](src)?;
    Ok(Context {
        key,
        value,
        format: None,
    })
}
