//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur during regression testing
#[derive(Debug, Error)]
pub enum TestError {
    /// Failed to write an image
    #[error("failed to write image '{path}': {message}")]
    ImageWrite { path: String, message: String },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {message}")]
    DirectoryCreate { path: String, message: String },

    /// Fixture drawing failed
    #[error("fixture error: {0}")]
    Fixture(#[from] kocr_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
