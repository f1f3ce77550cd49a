//! Primitive reads and writes over byte sources and sinks
//!
//! Integers travel as unsigned LEB128 quantities: seven bits per byte, low
//! group first, high bit set while more bytes follow. Byte strings are a
//! varUint length followed by exactly that many raw bytes.
//!
//! Every reader goes through [`Read::take`] rather than allocating the
//! declared length up front, so a corrupt length costs at most the bytes
//! that are actually present.

use std::io::{self, Read, Write};

use crate::error::{DescriptorError, Result};

/// Longest encoding of a `u64`
pub const VAR_UINT_MAX_BYTES: usize = 10;

/// Longest name we accept (the sfnt `name` table cannot hold more)
pub const MAX_NAME_LEN: u64 = u16::MAX as u64;

/// Write `value` as an unsigned LEB128 quantity
pub fn write_var_uint<W: Write + ?Sized>(sink: &mut W, mut value: u64) -> Result<()> {
    let mut buf = [0u8; VAR_UINT_MAX_BYTES];
    let mut len = 0;
    while value >= 0x80 {
        buf[len] = (value as u8 & 0x7F) | 0x80;
        value >>= 7;
        len += 1;
    }
    buf[len] = value as u8;
    sink.write_all(&buf[..=len])?;
    Ok(())
}

/// How many bytes [`write_var_uint`] emits for `value`
pub fn var_uint_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Read an unsigned LEB128 quantity
pub fn read_var_uint<R: Read + ?Sized>(source: &mut R) -> Result<u64> {
    read_var_uint_for(source, "varUint")
}

/// [`read_var_uint`] that names the field in a truncation error
pub(crate) fn read_var_uint_for<R: Read + ?Sized>(
    source: &mut R,
    field: &'static str,
) -> Result<u64> {
    let mut value = 0u64;
    for index in 0..VAR_UINT_MAX_BYTES {
        let byte = read_u8_for(source, field)?;
        let shift = 7 * index as u32;
        let bits = u64::from(byte & 0x7F);

        // The tenth byte may only carry bit 63
        if index == VAR_UINT_MAX_BYTES - 1 && bits > 1 {
            return Err(DescriptorError::VarUintOverflow);
        }
        value |= bits << shift;

        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(DescriptorError::VarUintOverflow)
}

/// Read a varUint that must fit in 32 bits
pub(crate) fn read_var_u32_for<R: Read + ?Sized>(
    source: &mut R,
    field: &'static str,
) -> Result<u32> {
    let value = read_var_uint_for(source, field)?;
    u32::try_from(value).map_err(|_| DescriptorError::ValueOutOfRange { field, value })
}

/// Write a single raw byte
pub fn write_u8<W: Write + ?Sized>(sink: &mut W, value: u8) -> Result<()> {
    sink.write_all(&[value])?;
    Ok(())
}

/// Read a single raw byte
pub fn read_u8<R: Read + ?Sized>(source: &mut R) -> Result<u8> {
    read_u8_for(source, "byte")
}

pub(crate) fn read_u8_for<R: Read + ?Sized>(source: &mut R, field: &'static str) -> Result<u8> {
    let mut byte = [0u8; 1];
    source
        .read_exact(&mut byte)
        .map_err(|err| DescriptorError::from_read(err, field))?;
    Ok(byte[0])
}

/// Read a single byte, or `None` when the source is cleanly exhausted
///
/// This is the end-of-stream probe used between descriptors.
pub fn read_u8_or_eof<R: Read + ?Sized>(source: &mut R) -> Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match source.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
}

/// Write `varUint(len)` followed by the bytes themselves
pub fn write_length_prefixed_bytes<W: Write + ?Sized>(sink: &mut W, bytes: &[u8]) -> Result<()> {
    write_var_uint(sink, bytes.len() as u64)?;
    sink.write_all(bytes)?;
    Ok(())
}

/// Read a length-prefixed byte string no longer than `max_len`
pub fn read_length_prefixed_bytes<R: Read + ?Sized>(source: &mut R, max_len: u64) -> Result<Vec<u8>> {
    read_length_prefixed_bytes_for(source, max_len, "bytes")
}

pub(crate) fn read_length_prefixed_bytes_for<R: Read + ?Sized>(
    source: &mut R,
    max_len: u64,
    field: &'static str,
) -> Result<Vec<u8>> {
    let len = read_var_uint_for(source, field)?;
    if len > max_len {
        return Err(DescriptorError::ValueOutOfRange { field, value: len });
    }

    let mut bytes = Vec::new();
    Read::take(&mut *source, len)
        .read_to_end(&mut bytes)
        .map_err(|err| DescriptorError::from_read(err, field))?;
    if (bytes.len() as u64) < len {
        return Err(DescriptorError::TruncatedInput { field });
    }
    Ok(bytes)
}

/// Read a length-prefixed byte string and throw it away
///
/// Old streams still carry fields that are no longer stored.
pub fn skip_length_prefixed_bytes<R: Read + ?Sized>(source: &mut R) -> Result<u64> {
    let field = "skipped bytes";
    let len = read_var_uint_for(source, field)?;
    let skipped = io::copy(&mut Read::take(&mut *source, len), &mut io::sink())
        .map_err(|err| DescriptorError::from_read(err, field))?;
    if skipped < len {
        return Err(DescriptorError::TruncatedInput { field });
    }
    Ok(len)
}

/// Write a string as length-prefixed UTF-8
pub fn write_string<W: Write + ?Sized>(sink: &mut W, value: &str) -> Result<()> {
    write_length_prefixed_bytes(sink, value.as_bytes())
}

/// Read a length-prefixed UTF-8 string
pub fn read_string<R: Read + ?Sized>(source: &mut R) -> Result<String> {
    read_string_for(source, "string")
}

pub(crate) fn read_string_for<R: Read + ?Sized>(
    source: &mut R,
    field: &'static str,
) -> Result<String> {
    let bytes = read_length_prefixed_bytes_for(source, MAX_NAME_LEN, field)?;
    Ok(String::from_utf8(bytes)?)
}

/// Stream exactly `len` bytes from `source` into `sink`
///
/// Copies through a bounded buffer so large font blobs never sit in memory
/// twice. A source that runs dry early is reported with both counts.
pub fn copy_exact<R, W>(source: &mut R, sink: &mut W, len: u64) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let copied = io::copy(&mut Read::take(&mut *source, len), sink)?;
    if copied != len {
        return Err(DescriptorError::TrailingBlobReadMismatch {
            expected: len,
            actual: copied,
        });
    }
    Ok(copied)
}
