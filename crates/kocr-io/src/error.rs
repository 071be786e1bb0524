//! Error types for kocr-io

use thiserror::Error;

/// Errors that can occur during image I/O
#[derive(Debug, Error)]
pub enum IoError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported image format
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Invalid image data
    #[error("invalid image data: {0}")]
    InvalidData(String),

    /// Decoding error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] kocr_core::Error),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;
