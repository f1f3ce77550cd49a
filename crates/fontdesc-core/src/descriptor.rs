//! The serializable identity of a font

use crate::payload::FontPayload;
use crate::style::FontStyle;

/// Names, style and (optionally) the font data itself
///
/// Missing names are empty strings and are never written to a stream.
/// Cloning deep-copies the payload, so a clone can be encoded (which
/// consumes the payload's stream) while the original stays usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontDescriptor {
    family_name: String,
    full_name: String,
    postscript_name: String,
    style: FontStyle,
    payload: Option<FontPayload>,
}

impl FontDescriptor {
    pub fn new(family_name: impl Into<String>, style: FontStyle) -> Self {
        Self {
            family_name: family_name.into(),
            style,
            ..Self::default()
        }
    }

    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = name.into();
        self
    }

    pub fn with_postscript_name(mut self, name: impl Into<String>) -> Self {
        self.postscript_name = name.into();
        self
    }

    pub fn with_payload(mut self, payload: FontPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn set_family_name(&mut self, name: impl Into<String>) {
        self.family_name = name.into();
    }

    pub fn set_full_name(&mut self, name: impl Into<String>) {
        self.full_name = name.into();
    }

    pub fn set_postscript_name(&mut self, name: impl Into<String>) {
        self.postscript_name = name.into();
    }

    pub fn set_style(&mut self, style: FontStyle) {
        self.style = style;
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    pub fn payload(&self) -> Option<&FontPayload> {
        self.payload.as_ref()
    }

    pub fn payload_mut(&mut self) -> Option<&mut FontPayload> {
        self.payload.as_mut()
    }

    /// Attach font data, returning whatever was attached before
    pub fn set_payload(&mut self, payload: FontPayload) -> Option<FontPayload> {
        self.payload.replace(payload)
    }

    /// Move the payload out; the descriptor keeps its names and style
    pub fn detach_payload(&mut self) -> Option<FontPayload> {
        self.payload.take()
    }

    /// The descriptor a decoder rebuilds from this one's full record
    ///
    /// An empty stream travels as no stream, and a payload left with face
    /// index 0 and no axes travels as no payload. Fingerprints and cache
    /// entries on the encoding side are taken from this form so they agree
    /// with what the decoding side computes.
    pub fn to_wire_form(&self) -> FontDescriptor {
        let payload = self.payload.as_ref().and_then(|payload| {
            match payload.stream().filter(|stream| !stream.is_empty()) {
                Some(stream) => Some(FontPayload::new(
                    stream.duplicate(),
                    payload.face_index(),
                    payload.axis_values(),
                )),
                None if payload.face_index() != 0 || payload.axis_count() != 0 => Some(
                    FontPayload::without_stream(payload.face_index(), payload.axis_values()),
                ),
                None => None,
            }
        });
        FontDescriptor {
            family_name: self.family_name.clone(),
            full_name: self.full_name.clone(),
            postscript_name: self.postscript_name.clone(),
            style: self.style,
            payload,
        }
    }
}
