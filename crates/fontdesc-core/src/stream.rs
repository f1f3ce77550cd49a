//! Whole streams of descriptors, each end owning its cache
//!
//! A document that references fonts many times writes them through one
//! [`DescriptorWriter`] and reads them back through one
//! [`DescriptorReader`]. The cache lives exactly as long as the writer or
//! reader, which is the lifetime the reference records are valid for.
//!
//! ```
//! use fontdesc_core::{CodecOptions, DescriptorReader, DescriptorWriter, FontDescriptor, FontStyle};
//!
//! let inter = FontDescriptor::new("Inter", FontStyle::BOLD);
//!
//! let mut writer = DescriptorWriter::new(Vec::new(), CodecOptions::default());
//! writer.write(&mut inter.clone())?;
//! writer.write(&mut inter.clone())?;
//! let bytes = writer.into_inner();
//!
//! let reader = DescriptorReader::new(bytes.as_slice(), CodecOptions::default());
//! let fonts = reader.collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(fonts, vec![inter.clone(), inter]);
//! # Ok::<(), fontdesc_core::DescriptorError>(())
//! ```

use std::io::{Read, Write};

use crate::cache::{DecodeCache, DescriptorCache, EncodeCache};
use crate::codec::read_u8_or_eof;
use crate::config::CodecOptions;
use crate::descriptor::FontDescriptor;
use crate::error::Result;
use crate::protocol::{deserialize, serialize, EncodeOutcome};

fn cache_for(options: &CodecOptions) -> DescriptorCache {
    match options.cache_capacity {
        Some(capacity) => DescriptorCache::with_capacity(capacity),
        None => DescriptorCache::new(),
    }
}

/// Counts of what went over the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub full_records: u64,
    pub references: u64,
    pub font_data_bytes: u64,
}

/// Writes descriptors to a sink, deduplicating repeats
pub struct DescriptorWriter<W: Write> {
    sink: W,
    cache: EncodeCache,
    options: CodecOptions,
    stats: StreamStats,
}

impl<W: Write> DescriptorWriter<W> {
    pub fn new(sink: W, options: CodecOptions) -> Self {
        Self {
            sink,
            cache: cache_for(&options),
            options,
            stats: StreamStats::default(),
        }
    }

    /// Write one descriptor; a full write consumes its payload's stream
    pub fn write(&mut self, descriptor: &mut FontDescriptor) -> Result<EncodeOutcome> {
        let outcome = serialize(descriptor, &mut self.sink, &mut self.cache, &self.options)?;
        match &outcome {
            EncodeOutcome::Full { font_data_len, .. } => {
                self.stats.full_records += 1;
                self.stats.font_data_bytes += font_data_len;
            }
            EncodeOutcome::Reference { .. } => self.stats.references += 1,
        }
        Ok(outcome)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    pub fn cache(&self) -> &EncodeCache {
        &self.cache
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Hand back the sink; the cache ends with the stream
    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Reads descriptors from a source until it is cleanly exhausted
pub struct DescriptorReader<R: Read> {
    source: R,
    cache: DecodeCache,
    options: CodecOptions,
    stats: StreamStats,
    failed: bool,
}

impl<R: Read> DescriptorReader<R> {
    pub fn new(source: R, options: CodecOptions) -> Self {
        Self {
            source,
            cache: cache_for(&options),
            options,
            stats: StreamStats::default(),
            failed: false,
        }
    }

    /// The next descriptor, or `None` at a clean end of input
    ///
    /// Input that ends inside a descriptor is an error, not `None`.
    pub fn next_descriptor(&mut self) -> Result<Option<FontDescriptor>> {
        let Some(first) = read_u8_or_eof(&mut self.source)? else {
            return Ok(None);
        };

        let hits_before = self.cache.stats().hits;
        let prefix = [first];
        let mut source = prefix.as_slice().chain(&mut self.source);
        let descriptor = deserialize(&mut source, &mut self.cache, &self.options)?;

        if self.cache.stats().hits > hits_before {
            self.stats.references += 1;
        } else {
            self.stats.full_records += 1;
            self.stats.font_data_bytes += descriptor
                .payload()
                .and_then(|payload| payload.stream_len())
                .unwrap_or(0);
        }
        Ok(Some(descriptor))
    }

    pub fn cache(&self) -> &DecodeCache {
        &self.cache
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// Hand back the source; the cache ends with the stream
    pub fn into_inner(self) -> R {
        self.source
    }
}

/// Yields descriptors until the end of input or the first error
impl<R: Read> Iterator for DescriptorReader<R> {
    type Item = Result<FontDescriptor>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_descriptor() {
            Ok(descriptor) => descriptor.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
