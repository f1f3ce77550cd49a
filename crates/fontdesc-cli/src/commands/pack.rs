//! Pack command implementation
//!
//! Describes each font file and writes the descriptors as one stream.

use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use fontdesc_core::DescriptorWriter;
use fontdesc_fontdb::Typeface;

use super::codec_options;
use crate::cli::PackArgs;

pub fn run(args: &PackArgs) -> Result<()> {
    let options = codec_options(&args.codec)?;
    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut writer = DescriptorWriter::new(BufWriter::new(file), options);

    for path in &args.fonts {
        let typeface = Typeface::from_file_index(path, args.face_index)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        let mut descriptor = typeface
            .descriptor(args.embed)
            .with_context(|| format!("Failed to describe {}", path.display()))?;

        let outcome = writer
            .write(&mut descriptor)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!(
            "{} -> {} ({})",
            path.display(),
            outcome.key(),
            if outcome.is_reference() { "reference" } else { "full" }
        );
    }
    writer.flush().context("Failed to flush output")?;

    let stats = writer.stats();
    println!(
        "Packed {} descriptors ({} full, {} references, {} bytes of font data) to {}",
        args.fonts.len(),
        stats.full_records,
        stats.references,
        stats.font_data_bytes,
        args.output.display()
    );
    Ok(())
}
