//! Embedded font data and the handle that owns it
//!
//! A [`FontPayload`] carries the bytes of a font file (through a
//! [`FontStream`]), which face of a collection to use, and where each
//! variation axis is set.
//!
//! ## Ownership
//!
//! The stream has exactly one owner. [`FontPayload::detach_stream`] moves it
//! out and leaves the slot empty; the face index and axis values stay
//! behind. Cloning a payload duplicates the stream: a fresh cursor over the
//! same shared bytes, never a lazy alias of the original cursor.

use std::fmt;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::sync::Arc;

use read_fonts::types::Fixed;

/// Immutable bytes shared between duplicated streams
///
/// Anything that can lend out a byte slice works: a `Vec<u8>`, a boxed
/// slice, or a memory-mapped file.
#[derive(Clone)]
pub struct SharedBytes(Arc<dyn AsRef<[u8]> + Send + Sync>);

impl SharedBytes {
    pub fn new(bytes: impl AsRef<[u8]> + Send + Sync + 'static) -> Self {
        Self(Arc::new(bytes))
    }
}

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        AsRef::<[u8]>::as_ref(&*self.0)
    }
}

impl From<Vec<u8>> for SharedBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

/// An exclusively owned, readable, sized stream of font bytes
pub struct FontStream {
    cursor: Cursor<SharedBytes>,
}

impl FontStream {
    pub fn new(bytes: SharedBytes) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    /// Total length in bytes, regardless of the read position
    pub fn len(&self) -> u64 {
        self.as_bytes().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current read position
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Every byte of the stream, independent of the read position
    pub fn as_bytes(&self) -> &[u8] {
        self.cursor.get_ref().as_ref()
    }

    /// Bytes not yet consumed by reads
    pub fn remaining(&self) -> &[u8] {
        let bytes = self.as_bytes();
        let start = (self.position() as usize).min(bytes.len());
        &bytes[start..]
    }

    /// A new stream over the same bytes, positioned at the start
    pub fn duplicate(&self) -> FontStream {
        FontStream::new(self.cursor.get_ref().clone())
    }

    /// Move the read position back to the first byte
    pub fn rewind(&mut self) {
        self.cursor.set_position(0);
    }

    /// Give up the stream and keep the underlying bytes
    pub fn into_shared(self) -> SharedBytes {
        self.cursor.into_inner()
    }
}

impl From<Vec<u8>> for FontStream {
    fn from(bytes: Vec<u8>) -> Self {
        FontStream::new(SharedBytes::from(bytes))
    }
}

impl Read for FontStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for FontStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl PartialEq for FontStream {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for FontStream {}

impl fmt::Debug for FontStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontStream")
            .field("len", &self.len())
            .field("position", &self.position())
            .finish()
    }
}

/// Font bytes plus the face and variation coordinates to use them with
#[derive(Debug, PartialEq, Eq)]
pub struct FontPayload {
    stream: Option<FontStream>,
    face_index: i32,
    axis_values: Vec<Fixed>,
}

impl FontPayload {
    /// Take ownership of `stream`; the axis values are copied in
    pub fn new(stream: FontStream, face_index: i32, axis_values: &[Fixed]) -> Self {
        Self {
            stream: Some(stream),
            face_index,
            axis_values: axis_values.to_vec(),
        }
    }

    /// A payload that only records face and coordinates
    pub fn without_stream(face_index: i32, axis_values: &[Fixed]) -> Self {
        Self {
            stream: None,
            face_index,
            axis_values: axis_values.to_vec(),
        }
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    pub fn stream(&self) -> Option<&FontStream> {
        self.stream.as_ref()
    }

    pub fn stream_mut(&mut self) -> Option<&mut FontStream> {
        self.stream.as_mut()
    }

    /// Length of the attached stream, if any
    pub fn stream_len(&self) -> Option<u64> {
        self.stream.as_ref().map(FontStream::len)
    }

    /// Fresh stream over the attached bytes; the payload keeps its own
    pub fn duplicate_stream(&self) -> Option<FontStream> {
        self.stream.as_ref().map(FontStream::duplicate)
    }

    /// Move the stream out, leaving the slot empty
    pub fn detach_stream(&mut self) -> Option<FontStream> {
        self.stream.take()
    }

    /// Replace the stream, returning whatever was attached before
    pub fn attach_stream(&mut self, stream: FontStream) -> Option<FontStream> {
        self.stream.replace(stream)
    }

    pub fn face_index(&self) -> i32 {
        self.face_index
    }

    pub fn axis_count(&self) -> usize {
        self.axis_values.len()
    }

    pub fn axis_values(&self) -> &[Fixed] {
        &self.axis_values
    }
}

impl Clone for FontPayload {
    fn clone(&self) -> Self {
        Self {
            stream: self.duplicate_stream(),
            face_index: self.face_index,
            axis_values: self.axis_values.clone(),
        }
    }
}
