//! Info command implementation
//!
//! Displays the record tags, fingerprint policies and effective settings.

use anyhow::Result;
use fontdesc_core::config::{
    ENV_CACHE_CAPACITY, ENV_FINGERPRINT, ENV_MAX_FONT_DATA, ENV_VERIFY_HITS,
};
use fontdesc_core::{CodecOptions, FingerprintPolicy, RecordTag};

pub fn run() -> Result<()> {
    println!("fontdesc v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Record tags:");
    for tag in RecordTag::ALL {
        println!("  0x{:02X}              - {}", tag.to_byte(), tag.description());
    }
    println!();

    println!("Fingerprint policies:");
    for policy in FingerprintPolicy::ALL {
        let marker = if policy == FingerprintPolicy::default() {
            " (default)"
        } else {
            ""
        };
        println!("  {:<17} - {}{marker}", policy.name(), policy_summary(policy));
    }
    println!();

    println!("Settings:");
    let options = CodecOptions::from_env()?;
    println!("  {ENV_FINGERPRINT:<24} {}", options.policy);
    println!("  {ENV_VERIFY_HITS:<24} {}", options.verify_cache_hits);
    println!("  {ENV_MAX_FONT_DATA:<24} {}", options.max_font_data_len);
    match options.cache_capacity {
        Some(capacity) => println!("  {ENV_CACHE_CAPACITY:<24} {capacity}"),
        None => println!("  {ENV_CACHE_CAPACITY:<24} unbounded"),
    }

    Ok(())
}

fn policy_summary(policy: FingerprintPolicy) -> &'static str {
    match policy {
        FingerprintPolicy::ContentHash => "family, style and font data length",
        FingerprintPolicy::FamilyName => "family name only (faces of one family collide)",
        FingerprintPolicy::Full => "every field and the font data bytes",
    }
}
