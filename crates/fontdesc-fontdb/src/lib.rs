//! Where descriptors meet real fonts
//!
//! The codec treats font data as opaque bytes. This crate is the other
//! side: it opens font files, reads the identifying `name` and `OS/2`
//! fields into a [`FontDescriptor`], and turns a decoded [`FontPayload`]
//! back into a typeface that can be parsed again.
//!
//! ## Memory Management
//!
//! Files are memory mapped and bytes are shared, never copied: the mapping
//! (or the owned buffer) sits behind a [`SharedBytes`] handle that the
//! typeface, every descriptor it produces, and every payload stream can hold
//! at once. `FontRef` is created on demand from those bytes, which keeps
//! TTC collections with several faces working.

pub mod error;

use std::fmt;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use fontdesc_core::{
    Fixed, FontDescriptor, FontPayload, FontStream, FontStyle, SharedBytes, Slant,
};
use memmap2::Mmap;
use read_fonts::tables::os2::SelectionFlags;
use read_fonts::types::NameId;
use read_fonts::{FontRef, TableProvider};

pub use error::{FontLoadError, Result};

/// Maximum font file size (50MB) to prevent resource exhaustion.
pub const MAX_FONT_SIZE: u64 = 50 * 1024 * 1024;

/// Anything that can hand out raw font bytes and a face within them
pub trait FontSource {
    fn data(&self) -> &[u8];

    /// Face within a collection; 0 for single fonts
    fn face_index(&self) -> u32;

    /// Parse on demand
    fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(self.data(), self.face_index()).ok()
    }
}

/// A loaded face: shared font bytes, which face, and where in design space
#[derive(Clone)]
pub struct Typeface {
    data: SharedBytes,
    face_index: u32,
    variations: Vec<Fixed>,
}

impl Typeface {
    /// Opens a font file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_index(path, 0)
    }

    /// Opens a specific face from a font file (for TTC collections)
    pub fn from_file_index(path: impl AsRef<Path>, face_index: u32) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => FontLoadError::FileNotFound(path.to_path_buf()),
            _ => FontLoadError::Io(err),
        })?;

        let size = file.metadata()?.len();
        check_size(size)?;
        if size == 0 {
            return Err(FontLoadError::InvalidData(format!(
                "{} is empty",
                path.display()
            )));
        }

        // SAFETY: the map is read-only and owned by the shared handle below;
        // the file must not be truncated while a typeface is alive.
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file)? };
        log::debug!("Mapped {} ({size} bytes)", path.display());

        Self::from_shared(SharedBytes::new(mmap), face_index)
    }

    /// Turns raw font bytes into a typeface
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_index(data, 0)
    }

    /// Turns raw font bytes into a specific face (for TTC collections)
    pub fn from_data_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        check_size(data.len() as u64)?;
        Self::from_shared(SharedBytes::from(data), face_index)
    }

    /// Rebuild a typeface from a decoded payload, taking its stream
    ///
    /// The payload keeps its face index and axis values but no longer has a
    /// stream afterwards. On error the stream stays attached.
    pub fn from_payload(payload: &mut FontPayload) -> Result<Self> {
        let face_index = u32::try_from(payload.face_index()).map_err(|_| {
            FontLoadError::InvalidData(format!("negative face index {}", payload.face_index()))
        })?;
        let stream = payload.stream().ok_or(FontLoadError::MissingFontData)?;
        check_size(stream.len())?;

        let typeface = Self::from_shared(stream.duplicate().into_shared(), face_index)?
            .with_variations(payload.axis_values())?;
        payload.detach_stream();
        Ok(typeface)
    }

    fn from_shared(data: SharedBytes, face_index: u32) -> Result<Self> {
        // Validate up front so later on-demand parses cannot fail
        FontRef::from_index(data.as_ref(), face_index)
            .map_err(|err| FontLoadError::InvalidData(err.to_string()))?;

        Ok(Self {
            data,
            face_index,
            variations: Vec::new(),
        })
    }

    /// Pin this face to a point in its design space, one value per `fvar` axis
    pub fn with_variations(mut self, values: &[Fixed]) -> Result<Self> {
        let axis_count = self.axis_count();
        if values.len() > axis_count {
            return Err(FontLoadError::InvalidData(format!(
                "{} variation values for a face with {axis_count} axes",
                values.len()
            )));
        }
        self.variations = values.to_vec();
        Ok(self)
    }

    /// Variation coordinates in `fvar` axis order
    pub fn variations(&self) -> &[Fixed] {
        &self.variations
    }

    /// Number of variation axes; 0 for static fonts
    pub fn axis_count(&self) -> usize {
        self.font_ref()
            .and_then(|font| font.fvar().ok())
            .map(|fvar| usize::from(fvar.axis_count()))
            .unwrap_or(0)
    }

    /// Size of the underlying font file in bytes
    pub fn data_len(&self) -> u64 {
        self.data.as_ref().len() as u64
    }

    /// Describe this face, embedding the font data when `embed` is set
    ///
    /// Without `embed`, a face that is not the first in its file or that has
    /// variations still records its face index and axis values, so the
    /// descriptor identifies the right instance without carrying the bytes.
    pub fn descriptor(&self, embed: bool) -> Result<FontDescriptor> {
        let mut descriptor = describe(self)?;

        let face_index = i32::try_from(self.face_index).map_err(|_| {
            FontLoadError::InvalidData(format!("face index {} out of range", self.face_index))
        })?;
        if embed {
            descriptor.set_payload(FontPayload::new(
                FontStream::new(self.data.clone()),
                face_index,
                &self.variations,
            ));
        } else if face_index != 0 || !self.variations.is_empty() {
            descriptor.set_payload(FontPayload::without_stream(face_index, &self.variations));
        }
        Ok(descriptor)
    }
}

impl FontSource for Typeface {
    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn face_index(&self) -> u32 {
        self.face_index
    }
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typeface")
            .field("data_len", &self.data_len())
            .field("face_index", &self.face_index)
            .field("variations", &self.variations)
            .finish()
    }
}

/// Read names and style from any font source
///
/// Missing `name` or `OS/2` tables are not errors: the names stay empty and
/// the style stays regular.
pub fn describe<S: FontSource + ?Sized>(source: &S) -> Result<FontDescriptor> {
    let font = source
        .font_ref()
        .ok_or_else(|| FontLoadError::InvalidData("font data does not parse".into()))?;

    let style = match font.os2() {
        Ok(os2) => {
            let selection = os2.fs_selection();
            style_from_os2(
                os2.us_weight_class(),
                os2.us_width_class(),
                selection.contains(SelectionFlags::ITALIC),
                selection.contains(SelectionFlags::OBLIQUE),
            )
        }
        Err(err) => {
            log::debug!("No usable OS/2 table ({err}), assuming a regular style");
            FontStyle::NORMAL
        }
    };

    let family = read_name(&font, NameId::FAMILY_NAME).unwrap_or_default();
    let descriptor = FontDescriptor::new(family, style)
        .with_full_name(read_name(&font, NameId::FULL_NAME).unwrap_or_default())
        .with_postscript_name(read_name(&font, NameId::POSTSCRIPT_NAME).unwrap_or_default());

    log::debug!(
        "Described '{}' face {} as {}",
        descriptor.family_name(),
        source.face_index(),
        style
    );
    Ok(descriptor)
}

/// Map `OS/2` weight class, width class and selection bits to a style
pub fn style_from_os2(weight_class: u16, width_class: u16, italic: bool, oblique: bool) -> FontStyle {
    // usWidthClass 0 is invalid; treat it as normal rather than ultra-condensed
    let width = match width_class {
        0 => FontStyle::NORMAL_WIDTH,
        n => n.min(u16::from(FontStyle::ULTRA_EXPANDED_WIDTH)) as u8,
    };
    let slant = if oblique {
        Slant::Oblique
    } else if italic {
        Slant::Italic
    } else {
        Slant::Upright
    };
    FontStyle::new(weight_class, width, slant)
}

/// Best string for `id`: Windows English first, then Unicode, then anything
fn read_name(font: &FontRef<'_>, id: NameId) -> Option<String> {
    let name = font.name().ok()?;
    let data = name.string_data();
    name.name_record()
        .iter()
        .filter(|record| record.name_id() == id)
        .filter_map(|record| {
            let rank = name_rank(record.platform_id(), record.language_id());
            record.string(data).ok().map(|string| (rank, string))
        })
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, string)| string.chars().collect())
}

fn name_rank(platform_id: u16, language_id: u16) -> u8 {
    match (platform_id, language_id) {
        (3, 0x409) => 0,
        (3, _) => 1,
        (0, _) => 2,
        _ => 3,
    }
}

fn check_size(size: u64) -> Result<()> {
    if size > MAX_FONT_SIZE {
        return Err(FontLoadError::FontTooLarge {
            size,
            max: MAX_FONT_SIZE,
        });
    }
    Ok(())
}
