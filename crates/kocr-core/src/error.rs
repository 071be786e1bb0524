//! Error types for kocr-core

use thiserror::Error;

/// kocr-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Invalid pixel depth
    #[error("invalid pixel depth: {0} bpp")]
    InvalidDepth(u32),

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Pixel value does not fit the image depth
    #[error("pixel value {value} exceeds maximum {max} for this depth")]
    InvalidPixelValue { value: u32, max: u32 },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Raw buffer does not match the declared dimensions
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

/// Result type for kocr-core operations
pub type Result<T> = std::result::Result<T, Error>;
