//! Error types for kocr-region

use thiserror::Error;

/// Errors that can occur during region processing operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] kocr_core::Error),

    /// Unsupported pixel depth for this operation
    #[error("unsupported depth: expected {expected}, got {actual}")]
    UnsupportedDepth { expected: &'static str, actual: u32 },

    /// Label outside the range of a label map
    #[error("invalid label {label}: map has {count} components")]
    InvalidLabel { label: u32, count: u32 },
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
