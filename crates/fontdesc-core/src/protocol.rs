//! The tagged record wire format
//!
//! ```text
//! styleBits          varUint
//! record*            (tag: u8, payload) until tag == 0xFF
//! trailingBlobLength varUint
//! trailingBlobBytes  trailingBlobLength bytes
//! ```
//!
//! Name tags reuse the sfnt `name` table IDs; the rest count down from
//! 0xFF so the two ranges never meet. The tag set is closed: an unknown tag
//! is an error, not something to skip.
//!
//! A descriptor already present in the encode cache is written as its style
//! bits plus one reference record (`0xFB`, key) and nothing else: no
//! sentinel and no blob follow a reference.

use std::io::{Read, Write};

use read_fonts::types::Fixed;

use crate::cache::{DecodeCache, EncodeCache};
use crate::codec::{
    copy_exact, read_string_for, read_u8_for, read_var_u32_for, read_var_uint_for,
    skip_length_prefixed_bytes, write_string, write_u8, write_var_uint, MAX_NAME_LEN,
};
use crate::config::CodecOptions;
use crate::descriptor::FontDescriptor;
use crate::error::{DescriptorError, Result};
use crate::fingerprint::FingerprintKey;
use crate::payload::{FontPayload, FontStream};
use crate::style::FontStyle;

/// Record tags; values are fixed by the stream format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RecordTag {
    FamilyName = 0x01,
    FullName = 0x04,
    PostscriptName = 0x06,
    CacheReference = 0xFB,
    VariationAxes = 0xFC,
    FaceIndex = 0xFD,
    /// Written by old producers; skipped, never stored
    LegacyFileName = 0xFE,
    Sentinel = 0xFF,
}

impl RecordTag {
    pub const ALL: [RecordTag; 8] = [
        RecordTag::FamilyName,
        RecordTag::FullName,
        RecordTag::PostscriptName,
        RecordTag::CacheReference,
        RecordTag::VariationAxes,
        RecordTag::FaceIndex,
        RecordTag::LegacyFileName,
        RecordTag::Sentinel,
    ];

    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(RecordTag::FamilyName),
            0x04 => Some(RecordTag::FullName),
            0x06 => Some(RecordTag::PostscriptName),
            0xFB => Some(RecordTag::CacheReference),
            0xFC => Some(RecordTag::VariationAxes),
            0xFD => Some(RecordTag::FaceIndex),
            0xFE => Some(RecordTag::LegacyFileName),
            0xFF => Some(RecordTag::Sentinel),
            _ => None,
        }
    }

    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    pub const fn description(self) -> &'static str {
        match self {
            RecordTag::FamilyName => "family name",
            RecordTag::FullName => "full name",
            RecordTag::PostscriptName => "postscript name",
            RecordTag::CacheReference => "cache reference",
            RecordTag::VariationAxes => "variation axes",
            RecordTag::FaceIndex => "face index",
            RecordTag::LegacyFileName => "legacy file name (skipped)",
            RecordTag::Sentinel => "end of records",
        }
    }
}

/// What [`serialize`] wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeOutcome {
    /// Every record, the sentinel and the font data
    Full { key: FingerprintKey, font_data_len: u64 },
    /// Style bits plus one reference record
    Reference { key: FingerprintKey },
}

impl EncodeOutcome {
    pub fn key(&self) -> &FingerprintKey {
        match self {
            EncodeOutcome::Full { key, .. } | EncodeOutcome::Reference { key } => key,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, EncodeOutcome::Reference { .. })
    }
}

/// Write `descriptor` to `sink`, or a reference to it if already cached
///
/// A full write detaches the payload's stream and streams it into `sink`;
/// afterwards the payload reports `has_stream() == false`. Clone the
/// descriptor first if the caller still needs the font data.
pub fn serialize<W: Write + ?Sized>(
    descriptor: &mut FontDescriptor,
    sink: &mut W,
    cache: &mut EncodeCache,
    options: &CodecOptions,
) -> Result<EncodeOutcome> {
    // The decoder fingerprints what it rebuilds, so key and cache entry come
    // from the same form
    let wire = descriptor.to_wire_form();
    check_encodable(&wire, options)?;

    write_var_uint(sink, u64::from(wire.style().to_bits()))?;

    let key = options.policy.fingerprint(&wire);
    let verify = options.verify_cache_hits;
    if cache
        .get_matching(&key, |cached| !verify || *cached == wire)
        .is_some()
    {
        write_u8(sink, RecordTag::CacheReference.to_byte())?;
        key.write(sink)?;
        log::debug!("Wrote reference {key} for '{}'", wire.family_name());
        return Ok(EncodeOutcome::Reference { key });
    }
    if let Some(cached) = cache.peek(&key) {
        log::warn!(
            "Fingerprint {key} collides: cached '{}' ({}) differs from '{}' ({}), writing in full",
            cached.family_name(),
            cached.style(),
            wire.family_name(),
            wire.style()
        );
    }

    write_name(sink, RecordTag::FamilyName, wire.family_name())?;
    write_name(sink, RecordTag::FullName, wire.full_name())?;
    write_name(sink, RecordTag::PostscriptName, wire.postscript_name())?;

    if let Some(payload) = wire.payload() {
        if payload.face_index() != 0 {
            write_u8(sink, RecordTag::FaceIndex.to_byte())?;
            write_var_uint(sink, u64::from(payload.face_index() as u32))?;
        }
        if payload.axis_count() != 0 {
            write_u8(sink, RecordTag::VariationAxes.to_byte())?;
            write_var_uint(sink, payload.axis_count() as u64)?;
            for axis in payload.axis_values() {
                write_var_uint(sink, u64::from(axis.to_bits() as u32))?;
            }
        }
    }

    write_u8(sink, RecordTag::Sentinel.to_byte())?;

    let stream = descriptor
        .payload_mut()
        .and_then(FontPayload::detach_stream);
    let font_data_len = match stream {
        Some(mut stream) => {
            let len = stream.len();
            stream.rewind();
            write_var_uint(sink, len)?;
            copy_exact(&mut stream, sink, len)?
        }
        None => {
            write_var_uint(sink, 0)?;
            0
        }
    };

    log::debug!(
        "Wrote '{}' in full ({} bytes of font data) under {key}",
        wire.family_name(),
        font_data_len
    );
    cache.insert(key.clone(), wire);
    Ok(EncodeOutcome::Full { key, font_data_len })
}

/// Reject anything the decoder would refuse, before a byte is written
fn check_encodable(descriptor: &FontDescriptor, options: &CodecOptions) -> Result<()> {
    for (field, name) in [
        ("family name", descriptor.family_name()),
        ("full name", descriptor.full_name()),
        ("postscript name", descriptor.postscript_name()),
    ] {
        if name.len() as u64 > MAX_NAME_LEN {
            return Err(DescriptorError::ValueOutOfRange {
                field,
                value: name.len() as u64,
            });
        }
    }

    let Some(payload) = descriptor.payload() else {
        return Ok(());
    };
    if payload.axis_count() > options.max_axis_count {
        return Err(DescriptorError::ValueOutOfRange {
            field: "axis count",
            value: payload.axis_count() as u64,
        });
    }
    if let Some(len) = payload.stream_len() {
        if len > options.max_font_data_len {
            return Err(DescriptorError::FontDataTooLarge {
                len,
                max: options.max_font_data_len,
            });
        }
    }
    Ok(())
}

/// Read one descriptor from `source`
///
/// The source is borrowed, not consumed; it is left just past the
/// descriptor. A reference record resolves through `cache`; a full record
/// is registered in it so later references can resolve.
pub fn deserialize<R: Read + ?Sized>(
    source: &mut R,
    cache: &mut DecodeCache,
    options: &CodecOptions,
) -> Result<FontDescriptor> {
    let style_bits = read_var_uint_for(source, "style bits")?;
    let style = FontStyle::from_wire(style_bits);

    let mut descriptor = FontDescriptor::new(String::new(), style);
    let mut face_index = 0i32;
    let mut axis_values: Vec<Fixed> = Vec::new();

    loop {
        let byte = read_u8_for(source, "record tag")?;
        let Some(tag) = RecordTag::from_byte(byte) else {
            log::debug!("Unknown record tag 0x{byte:02X} in font descriptor");
            return Err(DescriptorError::UnknownRecordTag(byte));
        };
        log::trace!("Record 0x{byte:02X}: {}", tag.description());

        match tag {
            RecordTag::CacheReference => {
                let key = options.policy.read_key(source)?;
                return match cache.get(&key) {
                    Some(cached) => {
                        log::debug!("Resolved reference {key} to '{}'", cached.family_name());
                        Ok(cached)
                    }
                    None => Err(DescriptorError::DanglingCacheReference(key)),
                };
            }
            RecordTag::FamilyName => {
                descriptor.set_family_name(read_string_for(source, "family name")?);
            }
            RecordTag::FullName => {
                descriptor.set_full_name(read_string_for(source, "full name")?);
            }
            RecordTag::PostscriptName => {
                descriptor.set_postscript_name(read_string_for(source, "postscript name")?);
            }
            RecordTag::VariationAxes => {
                axis_values = read_axes(source, options.max_axis_count)?;
            }
            RecordTag::FaceIndex => {
                face_index = read_var_u32_for(source, "face index")? as i32;
            }
            RecordTag::LegacyFileName => {
                let skipped = skip_length_prefixed_bytes(source)?;
                log::warn!("Skipped {skipped}-byte legacy file name record");
            }
            RecordTag::Sentinel => break,
        }
    }

    let len = read_var_uint_for(source, "font data length")?;
    if len > options.max_font_data_len {
        return Err(DescriptorError::FontDataTooLarge {
            len,
            max: options.max_font_data_len,
        });
    }

    // Face index 0 and no axes are what the encoder omits; on their own
    // they describe no payload
    if len > 0 {
        let data = read_font_data(source, len)?;
        descriptor.set_payload(FontPayload::new(
            FontStream::from(data),
            face_index,
            &axis_values,
        ));
    } else if face_index != 0 || !axis_values.is_empty() {
        descriptor.set_payload(FontPayload::without_stream(face_index, &axis_values));
    }

    let key = options.policy.fingerprint(&descriptor);
    log::debug!(
        "Read '{}' in full ({len} bytes of font data), registered as {key}",
        descriptor.family_name()
    );
    cache.insert(key, descriptor.clone());
    Ok(descriptor)
}

fn write_name<W: Write + ?Sized>(sink: &mut W, tag: RecordTag, name: &str) -> Result<()> {
    if name.is_empty() {
        return Ok(());
    }
    write_u8(sink, tag.to_byte())?;
    write_string(sink, name)
}

fn read_axes<R: Read + ?Sized>(source: &mut R, max_axis_count: usize) -> Result<Vec<Fixed>> {
    let count = read_var_uint_for(source, "axis count")?;
    if count > max_axis_count as u64 {
        return Err(DescriptorError::ValueOutOfRange {
            field: "axis count",
            value: count,
        });
    }
    (0..count)
        .map(|_| read_var_u32_for(source, "axis value").map(|bits| Fixed::from_bits(bits as i32)))
        .collect()
}

fn read_font_data<R: Read + ?Sized>(source: &mut R, len: u64) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    Read::take(&mut *source, len)
        .read_to_end(&mut data)
        .map_err(|err| DescriptorError::from_read(err, "font data"))?;
    if (data.len() as u64) < len {
        return Err(DescriptorError::TrailingBlobReadMismatch {
            expected: len,
            actual: data.len() as u64,
        });
    }
    Ok(data)
}
