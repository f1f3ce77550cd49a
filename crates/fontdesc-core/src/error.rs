//! Error types for fontdesc

use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

use crate::fingerprint::FingerprintKey;

pub type Result<T> = std::result::Result<T, DescriptorError>;

/// Everything that can stop a descriptor on its way in or out
///
/// Decode errors abort the descriptor being read. There is never a partial
/// descriptor alongside an error.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("Input ended while reading {field}")]
    TruncatedInput { field: &'static str },

    #[error("Unknown record tag 0x{0:02X}")]
    UnknownRecordTag(u8),

    #[error("Cache reference {0} has no earlier full record in this stream")]
    DanglingCacheReference(FingerprintKey),

    #[error("Font data declared {expected} bytes but only {actual} were available")]
    TrailingBlobReadMismatch { expected: u64, actual: u64 },

    #[error("Variable-length integer does not fit in 64 bits")]
    VarUintOverflow,

    #[error("Value {value} out of range for {field}")]
    ValueOutOfRange { field: &'static str, value: u64 },

    #[error("Name is not valid UTF-8: {0}")]
    InvalidName(#[from] FromUtf8Error),

    #[error("Font data of {len} bytes exceeds the {max} byte limit")]
    FontDataTooLarge { len: u64, max: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl DescriptorError {
    /// Map an IO failure during a read, turning early EOF into `TruncatedInput`
    pub(crate) fn from_read(err: io::Error, field: &'static str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            DescriptorError::TruncatedInput { field }
        } else {
            DescriptorError::Io(err)
        }
    }

    /// True for the failures caused by malformed or short input
    pub fn is_malformed_input(&self) -> bool {
        !matches!(self, DescriptorError::Io(_) | DescriptorError::Config(_))
    }
}
