//! Codec options
//!
//! Options are plain values handed to every encode and decode call; there is
//! no process-wide switch. [`CodecOptions::from_env`] is a convenience for
//! binaries that want environment overrides:
//!
//! | variable | effect |
//! |---|---|
//! | `FONTDESC_FINGERPRINT` | `content-hash`, `family-name` or `full` |
//! | `FONTDESC_VERIFY_HITS` | `1`/`true`/`yes`/`on` or `0`/`false`/`no`/`off` |
//! | `FONTDESC_MAX_FONT_DATA` | largest embedded font accepted, in bytes |
//! | `FONTDESC_CACHE_CAPACITY` | entries per cache, `0` for unbounded |
//!
//! ```
//! use fontdesc_core::{CodecOptions, FingerprintPolicy};
//!
//! let options = CodecOptions::default()
//!     .with_policy(FingerprintPolicy::ContentHash)
//!     .with_cache_capacity(Some(256));
//! assert!(options.verify_cache_hits);
//! ```

use crate::error::{DescriptorError, Result};
use crate::fingerprint::FingerprintPolicy;

/// Largest embedded font accepted by default (50MB)
pub const MAX_FONT_DATA_LEN: u64 = 50 * 1024 * 1024;

/// Most variation axes accepted by default
pub const MAX_AXIS_COUNT: usize = 64;

pub const ENV_FINGERPRINT: &str = "FONTDESC_FINGERPRINT";
pub const ENV_VERIFY_HITS: &str = "FONTDESC_VERIFY_HITS";
pub const ENV_MAX_FONT_DATA: &str = "FONTDESC_MAX_FONT_DATA";
pub const ENV_CACHE_CAPACITY: &str = "FONTDESC_CACHE_CAPACITY";

/// How descriptors are fingerprinted, checked and bounded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Key policy; both ends of a stream must agree
    pub policy: FingerprintPolicy,
    /// Compare the cached descriptor on a key hit before writing a reference
    pub verify_cache_hits: bool,
    /// Reject embedded font data longer than this
    pub max_font_data_len: u64,
    /// Reject axis records with more values than this
    pub max_axis_count: usize,
    /// Entries per cache for stream readers and writers; `None` is unbounded
    pub cache_capacity: Option<usize>,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            policy: FingerprintPolicy::default(),
            verify_cache_hits: true,
            max_font_data_len: MAX_FONT_DATA_LEN,
            max_axis_count: MAX_AXIS_COUNT,
            cache_capacity: None,
        }
    }
}

impl CodecOptions {
    pub fn with_policy(mut self, policy: FingerprintPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_verify_cache_hits(mut self, verify: bool) -> Self {
        self.verify_cache_hits = verify;
        self
    }

    pub fn with_max_font_data_len(mut self, max: u64) -> Self {
        self.max_font_data_len = max;
        self
    }

    pub fn with_max_axis_count(mut self, max: usize) -> Self {
        self.max_axis_count = max;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: Option<usize>) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Defaults overridden by `FONTDESC_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(value) = lookup(ENV_FINGERPRINT) {
            options.policy = value.parse()?;
        }
        if let Some(value) = lookup(ENV_VERIFY_HITS) {
            options.verify_cache_hits = parse_flag(ENV_VERIFY_HITS, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_FONT_DATA) {
            options.max_font_data_len = parse_number(ENV_MAX_FONT_DATA, &value)?;
        }
        if let Some(value) = lookup(ENV_CACHE_CAPACITY) {
            let capacity: usize = parse_number(ENV_CACHE_CAPACITY, &value)?;
            options.cache_capacity = (capacity > 0).then_some(capacity);
        }

        log::debug!(
            "Codec options: policy={}, verify_hits={}, max_font_data={}, cache_capacity={:?}",
            options.policy,
            options.verify_cache_hits,
            options.max_font_data_len,
            options.cache_capacity
        );
        Ok(options)
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(DescriptorError::Config(format!(
            "{name}: expected a boolean, got '{other}'"
        ))),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DescriptorError::Config(format!("{name}: expected a number, got '{value}'")))
}
