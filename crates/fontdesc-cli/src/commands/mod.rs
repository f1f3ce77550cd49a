//! Command implementations

pub mod dump;
pub mod info;
pub mod pack;

use anyhow::{Context, Result};
use fontdesc_core::CodecOptions;

use crate::cli::CodecArgs;

/// Environment settings first, then whatever the command line overrides
fn codec_options(args: &CodecArgs) -> Result<CodecOptions> {
    let mut options = CodecOptions::from_env().context("Invalid FONTDESC_* setting")?;
    if let Some(policy) = args.policy {
        options = options.with_policy(policy);
    }
    if args.no_verify {
        options = options.with_verify_cache_hits(false);
    }
    Ok(options)
}
