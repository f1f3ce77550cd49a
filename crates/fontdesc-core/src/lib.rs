//! Fontdesc Core: font descriptors on the wire
//!
//! A font descriptor names a typeface (family, full and PostScript names),
//! packs its style into 32 bits, and can carry the font file itself along
//! with a face index and variation coordinates. This crate turns
//! descriptors into bytes and back.
//!
//! ## The Format
//!
//! Every descriptor starts with its style bits, then a run of tagged
//! records, a sentinel, and the font data:
//!
//! 1. **Style** - weight, width and slant packed into one varUint
//! 2. **Records** - names, face index, axis values; empty ones are omitted
//! 3. **Sentinel** - `0xFF`
//! 4. **Font data** - a length and the raw bytes, or a length of zero
//!
//! A descriptor the encoder has already written is sent again as a single
//! reference record naming its fingerprint; the decoder resolves it from
//! its own cache. See [`protocol`] for the layout and [`fingerprint`] for
//! how "already written" is decided.
//!
//! ## Round Trip
//!
//! ```
//! use fontdesc_core::{
//!     deserialize, serialize, CodecOptions, DecodeCache, EncodeCache, FontDescriptor,
//!     FontPayload, FontStream, FontStyle,
//! };
//!
//! let options = CodecOptions::default();
//! let mut encode_cache = EncodeCache::new();
//! let mut decode_cache = DecodeCache::new();
//!
//! let font = FontDescriptor::new("Inter", FontStyle::ITALIC)
//!     .with_postscript_name("Inter-Italic")
//!     .with_payload(FontPayload::new(FontStream::from(b"OTTO....".to_vec()), 0, &[]));
//!
//! let mut bytes = Vec::new();
//! // Encoding moves the font data into the output, so keep a copy
//! serialize(&mut font.clone(), &mut bytes, &mut encode_cache, &options)?;
//!
//! let decoded = deserialize(&mut bytes.as_slice(), &mut decode_cache, &options)?;
//! assert_eq!(decoded, font);
//! # Ok::<(), fontdesc_core::DescriptorError>(())
//! ```
//!
//! For a whole document of descriptors, [`DescriptorWriter`] and
//! [`DescriptorReader`] own the caches for you.

pub mod cache;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod fingerprint;
pub mod payload;
pub mod protocol;
pub mod stream;
pub mod style;

#[cfg(test)]
mod proptests;

pub use cache::{CacheStats, DecodeCache, DescriptorCache, EncodeCache};
pub use config::CodecOptions;
pub use descriptor::FontDescriptor;
pub use error::{DescriptorError, Result};
pub use fingerprint::{FingerprintKey, FingerprintPolicy};
pub use payload::{FontPayload, FontStream, SharedBytes};
pub use protocol::{deserialize, serialize, EncodeOutcome, RecordTag};
pub use stream::{DescriptorReader, DescriptorWriter, StreamStats};
pub use style::{FontStyle, Slant};

/// 16.16 fixed-point variation coordinate
pub use read_fonts::types::Fixed;
