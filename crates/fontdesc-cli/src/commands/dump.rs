//! Dump command implementation
//!
//! Decodes a stream and prints one line per descriptor, as text or JSON.

use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use fontdesc_core::{DescriptorReader, FontDescriptor, Slant};
use serde::Serialize;

use super::codec_options;
use crate::cli::DumpArgs;

/// One decoded descriptor as printed by `dump --json`
#[derive(Debug, Serialize)]
pub struct DumpRecord {
    pub index: usize,
    pub family_name: String,
    pub full_name: String,
    pub postscript_name: String,
    pub weight: u16,
    pub width: u8,
    pub slant: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_index: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub axis_values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_data_len: Option<u64>,
}

impl DumpRecord {
    pub fn new(index: usize, descriptor: &FontDescriptor) -> Self {
        let style = descriptor.style();
        let payload = descriptor.payload();
        Self {
            index,
            family_name: descriptor.family_name().to_string(),
            full_name: descriptor.full_name().to_string(),
            postscript_name: descriptor.postscript_name().to_string(),
            weight: style.weight(),
            width: style.width(),
            slant: slant_name(style.slant()),
            face_index: payload.map(|p| p.face_index()),
            axis_values: payload
                .map(|p| p.axis_values().iter().map(|v| v.to_f64()).collect())
                .unwrap_or_default(),
            font_data_len: payload.and_then(|p| p.stream_len()),
        }
    }

    fn to_text(&self) -> String {
        let mut line = format!(
            "#{} {:?} full={:?} ps={:?} weight={} width={} {}",
            self.index,
            self.family_name,
            self.full_name,
            self.postscript_name,
            self.weight,
            self.width,
            self.slant
        );
        if let Some(face_index) = self.face_index {
            line.push_str(&format!(" face={face_index}"));
        }
        if !self.axis_values.is_empty() {
            line.push_str(&format!(" axes={:?}", self.axis_values));
        }
        if let Some(len) = self.font_data_len {
            line.push_str(&format!(" data={len}B"));
        }
        line
    }
}

fn slant_name(slant: Slant) -> &'static str {
    match slant {
        Slant::Upright => "upright",
        Slant::Italic => "italic",
        Slant::Oblique => "oblique",
    }
}

pub fn run(args: &DumpArgs) -> Result<()> {
    let options = codec_options(&args.codec)?;
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let mut reader = DescriptorReader::new(BufReader::new(file), options);

    let mut index = 0;
    while let Some(descriptor) = reader
        .next_descriptor()
        .with_context(|| format!("Descriptor #{index} in {} is malformed", args.input.display()))?
    {
        let record = DumpRecord::new(index, &descriptor);
        if args.json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{}", record.to_text());
        }
        index += 1;
    }

    let stats = reader.stats();
    let cache = reader.cache().stats();
    log::debug!(
        "Decode cache: {} entries, {} hits, {} misses",
        cache.entries,
        cache.hits,
        cache.misses
    );
    eprintln!(
        "{} descriptors ({} full, {} references, {} bytes of font data)",
        index, stats.full_records, stats.references, stats.font_data_bytes
    );
    Ok(())
}
