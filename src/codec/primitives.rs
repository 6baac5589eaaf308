//! Primitive codec
//!
//! Little-endian fixed-width scalars and length-prefixed strings. Appends
//! go through `bytes::BufMut` and never fail; reads pull from any
//! `std::io::Read` and surface short input as `DecodeError::Io`.

use std::io::Read;

use bytes::BufMut;

use crate::error::DecodeError;

/// Longest short-string body (1-byte length prefix)
pub const MAX_SHORT_STRING: usize = u8::MAX as usize;

/// Longest string body (2-byte length prefix)
pub const MAX_STRING: usize = u16::MAX as usize;

// =============================================================================
// Append
// =============================================================================

pub fn append_bool<B: BufMut>(dst: &mut B, value: bool) {
    dst.put_u8(value as u8);
}

pub fn append_u8<B: BufMut>(dst: &mut B, value: u8) {
    dst.put_u8(value);
}

pub fn append_u16<B: BufMut>(dst: &mut B, value: u16) {
    dst.put_u16_le(value);
}

pub fn append_u32<B: BufMut>(dst: &mut B, value: u32) {
    dst.put_u32_le(value);
}

pub fn append_u64<B: BufMut>(dst: &mut B, value: u64) {
    dst.put_u64_le(value);
}

pub fn append_f32<B: BufMut>(dst: &mut B, value: f32) {
    dst.put_f32_le(value);
}

pub fn append_f64<B: BufMut>(dst: &mut B, value: f64) {
    dst.put_f64_le(value);
}

/// Real part, then imaginary part
pub fn append_complex64<B: BufMut>(dst: &mut B, re: f32, im: f32) {
    append_f32(dst, re);
    append_f32(dst, im);
}

pub fn append_complex128<B: BufMut>(dst: &mut B, re: f64, im: f64) {
    append_f64(dst, re);
    append_f64(dst, im);
}

/// `u16` length + body. Bodies longer than 65535 bytes are truncated.
pub fn append_string<B: BufMut>(dst: &mut B, value: &str) {
    let body = truncated(value.as_bytes(), MAX_STRING);
    dst.put_u16_le(body.len() as u16);
    dst.put_slice(body);
}

/// `u8` length + body. Bodies longer than 255 bytes are truncated.
pub fn append_short_string<B: BufMut>(dst: &mut B, value: &str) {
    let body = truncated(value.as_bytes(), MAX_SHORT_STRING);
    dst.put_u8(body.len() as u8);
    dst.put_slice(body);
}

fn truncated(bytes: &[u8], max: usize) -> &[u8] {
    &bytes[..bytes.len().min(max)]
}

// =============================================================================
// Read
// =============================================================================

/// Fill `buf` completely; running short is an `Io(UnexpectedEof)`.
pub fn read_exact<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> Result<(), DecodeError> {
    src.read_exact(buf)?;
    Ok(())
}

fn read_array<const N: usize, R: Read + ?Sized>(src: &mut R) -> Result<[u8; N], DecodeError> {
    let mut buf = [0u8; N];
    read_exact(src, &mut buf)?;
    Ok(buf)
}

pub fn read_bool<R: Read + ?Sized>(src: &mut R) -> Result<bool, DecodeError> {
    match read_u8(src)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(DecodeError::format(format!("illegal bool value: {}", other))),
    }
}

pub fn read_u8<R: Read + ?Sized>(src: &mut R) -> Result<u8, DecodeError> {
    Ok(read_array::<1, _>(src)?[0])
}

pub fn read_u16<R: Read + ?Sized>(src: &mut R) -> Result<u16, DecodeError> {
    Ok(u16::from_le_bytes(read_array(src)?))
}

pub fn read_u32<R: Read + ?Sized>(src: &mut R) -> Result<u32, DecodeError> {
    Ok(u32::from_le_bytes(read_array(src)?))
}

pub fn read_u64<R: Read + ?Sized>(src: &mut R) -> Result<u64, DecodeError> {
    Ok(u64::from_le_bytes(read_array(src)?))
}

pub fn read_f32<R: Read + ?Sized>(src: &mut R) -> Result<f32, DecodeError> {
    Ok(f32::from_bits(read_u32(src)?))
}

pub fn read_f64<R: Read + ?Sized>(src: &mut R) -> Result<f64, DecodeError> {
    Ok(f64::from_bits(read_u64(src)?))
}

pub fn read_complex64<R: Read + ?Sized>(src: &mut R) -> Result<(f32, f32), DecodeError> {
    let re = read_f32(src)?;
    let im = read_f32(src)?;
    Ok((re, im))
}

pub fn read_complex128<R: Read + ?Sized>(src: &mut R) -> Result<(f64, f64), DecodeError> {
    let re = read_f64(src)?;
    let im = read_f64(src)?;
    Ok((re, im))
}

pub fn read_string<R: Read + ?Sized>(src: &mut R) -> Result<String, DecodeError> {
    let len = read_u16(src)? as usize;
    read_str(src, len)
}

pub fn read_short_string<R: Read + ?Sized>(src: &mut R) -> Result<String, DecodeError> {
    let len = read_u8(src)? as usize;
    read_str(src, len)
}

// Truncation on encode may split a UTF-8 sequence, so the body is decoded lossily.
fn read_str<R: Read + ?Sized>(src: &mut R, len: usize) -> Result<String, DecodeError> {
    let mut body = vec![0u8; len];
    read_exact(src, &mut body)?;
    match String::from_utf8(body) {
        Ok(s) => Ok(s),
        Err(e) => Ok(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}
