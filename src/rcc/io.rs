#![forbid(unsafe_code)]

use std::io::{Cursor, Read};

use crate::rcc::error::{RccError, RccResult};

// All table fields are big-endian.

pub fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_be_bytes());
}

pub fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

pub fn put_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

pub fn read_exact<const N: usize>(r: &mut Cursor<&[u8]>) -> RccResult<[u8; N]> {
    let mut buf = [0u8; N];
    let at = r.position();
    r.read_exact(&mut buf)
        .map_err(|_| RccError::Invalid(format!("table truncated at byte {at}")))?;
    Ok(buf)
}

pub fn read_u16(r: &mut Cursor<&[u8]>) -> RccResult<u16> {
    Ok(u16::from_be_bytes(read_exact::<2>(r)?))
}

pub fn read_u32(r: &mut Cursor<&[u8]>) -> RccResult<u32> {
    Ok(u32::from_be_bytes(read_exact::<4>(r)?))
}

pub fn read_i32(r: &mut Cursor<&[u8]>) -> RccResult<i32> {
    Ok(i32::from_be_bytes(read_exact::<4>(r)?))
}

/// Append `b` as two lowercase hex digits.
pub fn push_hex(out: &mut String, b: u8) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    out.push(HEX[(b >> 4) as usize] as char);
    out.push(HEX[(b & 0xF) as usize] as char);
}

pub fn hex32(v: &[u8; 32]) -> String {
    let mut out = String::with_capacity(64);
    for b in v.iter().copied() {
        push_hex(&mut out, b);
    }
    out
}
