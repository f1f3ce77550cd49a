//! CLI argument definitions using Clap v4

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fontdesc_core::FingerprintPolicy;

/// fontdesc - Pack font descriptors into compact streams and read them back
#[derive(Parser, Debug)]
#[command(name = "fontdesc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Describe font files and write them as one descriptor stream
    #[command(alias = "p")]
    Pack(PackArgs),

    /// Decode a descriptor stream and print each descriptor
    #[command(alias = "d")]
    Dump(DumpArgs),

    /// Show record tags, fingerprint policies and settings
    #[command(alias = "i")]
    Info,
}

/// Options shared by every command that touches a stream
#[derive(Args, Debug)]
pub struct CodecArgs {
    /// Fingerprint policy: content-hash, family-name or full
    /// (overrides FONTDESC_FINGERPRINT)
    #[arg(long)]
    pub policy: Option<FingerprintPolicy>,

    /// Trust fingerprint matches without comparing descriptors
    #[arg(long = "no-verify")]
    pub no_verify: bool,
}

#[derive(Args, Debug)]
pub struct PackArgs {
    /// Font files (.ttf, .otf, .ttc); repeat a path to reference it again
    #[arg(required = true)]
    pub fonts: Vec<PathBuf>,

    /// Output stream file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Carry the font data inside the stream
    #[arg(short = 'e', long)]
    pub embed: bool,

    /// Face index for TTC/OTC collections
    #[arg(short = 'y', long = "face-index", default_value = "0")]
    pub face_index: u32,

    #[command(flatten)]
    pub codec: CodecArgs,
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Descriptor stream to read
    pub input: PathBuf,

    /// Print one JSON object per line
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub codec: CodecArgs,
}
