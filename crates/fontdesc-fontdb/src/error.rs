//! Font loading errors

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FontLoadError>;

#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid font data: {0}")]
    InvalidData(String),

    #[error("Font data too large: {size} bytes (max: {max} bytes)")]
    FontTooLarge { size: u64, max: u64 },

    #[error("Payload carries no font data")]
    MissingFontData,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
