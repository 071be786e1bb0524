//! Error types for kocr-recog

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during training, recognition and auditing
#[derive(Debug, Error)]
pub enum RecogError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] kocr_core::Error),

    /// Image I/O error
    #[error("image I/O error: {0}")]
    ImageIo(#[from] kocr_io::IoError),

    /// Morphology error
    #[error("morphology error: {0}")]
    Morph(#[from] kocr_morph::MorphError),

    /// Transform library error
    #[error("transform error: {0}")]
    Transform(#[from] kocr_transform::TransformError),

    /// Region labeling error
    #[error("region error: {0}")]
    Region(#[from] kocr_region::RegionError),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The training list file could not be opened
    #[error("image list file is not found: {path}")]
    ListFileNotFound { path: PathBuf },

    /// The training list file has a malformed line or no entries
    #[error("invalid image list format at line {line}: {reason}")]
    ListFileMalformed { line: usize, reason: String },

    /// An image could not be loaded
    #[error("failed to load image '{path}': {message}")]
    ImageLoadFailed { path: PathBuf, message: String },

    /// The image has no foreground pixel
    #[error("no ink found in image")]
    NoInkFound,

    /// Labeling left no usable component
    #[error("no connected component usable as a glyph")]
    NoConnectedComponents,

    /// The glyph has more boundaries than the tracer accepts
    #[error("too many contours: {count} exceeds the limit of {limit}")]
    TooManyContours { count: usize, limit: usize },

    /// The database magic number is wrong
    #[error("invalid database magic: {found:#010x}")]
    InvalidDatabaseMagic { found: u32 },

    /// The database is shorter than its header claims
    #[error("truncated database: need {needed} bytes, have {actual}")]
    TruncatedDatabase { needed: usize, actual: usize },

    /// The database header offsets disagree with each other
    #[error("inconsistent database header: {0}")]
    InconsistentDatabase(String),

    /// The database holds no samples
    #[error("database is empty")]
    EmptyDatabase,

    /// Unsupported pixel depth for this operation
    #[error("unsupported depth: expected {expected}, got {actual}")]
    UnsupportedDepth { expected: &'static str, actual: u32 },

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl RecogError {
    /// True for failures that only affect one glyph
    ///
    /// Training skips such samples; recognition of that glyph yields no
    /// result. Everything else aborts the operation.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            RecogError::NoInkFound
                | RecogError::NoConnectedComponents
                | RecogError::TooManyContours { .. }
                | RecogError::ImageLoadFailed { .. }
        )
    }
}

/// Result type for recognition operations
pub type RecogResult<T> = Result<T, RecogError>;
