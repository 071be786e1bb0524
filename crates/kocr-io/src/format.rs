//! Image format detection
//!
//! Detects image formats by examining magic numbers in the file header.

use crate::{IoError, IoResult};
use kocr_core::ImageFormat;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Magic numbers for image format detection
mod magic {
    /// PNG: 89 50 4E 47 0D 0A 1A 0A
    pub const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    /// JPEG: FF D8 FF
    pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];

    /// PNM formats, P1 through P6
    pub const PNM: [&[u8]; 6] = [b"P1", b"P2", b"P3", b"P4", b"P5", b"P6"];
}

/// Detect image format from a file path
pub fn detect_format<P: AsRef<Path>>(path: P) -> IoResult<ImageFormat> {
    let mut file = File::open(path)?;
    let mut header = [0u8; 8];
    let bytes_read = file.read(&mut header)?;
    detect_format_from_bytes(&header[..bytes_read])
}

/// Detect image format from bytes
pub fn detect_format_from_bytes(data: &[u8]) -> IoResult<ImageFormat> {
    if data.len() < 2 {
        return Err(IoError::InvalidData(
            "not enough data to detect format".to_string(),
        ));
    }

    if data.starts_with(magic::PNG) {
        return Ok(ImageFormat::Png);
    }

    if data.starts_with(magic::JPEG) {
        return Ok(ImageFormat::Jpeg);
    }

    if magic::PNM.iter().any(|m| data.starts_with(m)) {
        return Ok(ImageFormat::Pnm);
    }

    Err(IoError::UnsupportedFormat(
        "unknown image format".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        let data = [
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(detect_format_from_bytes(&data).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_detect_jpeg() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert_eq!(detect_format_from_bytes(&data).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_detect_pnm() {
        assert_eq!(
            detect_format_from_bytes(b"P5\n100 100\n255\n").unwrap(),
            ImageFormat::Pnm
        );
        assert_eq!(
            detect_format_from_bytes(b"P1\n2 2\n0 1 1 0\n").unwrap(),
            ImageFormat::Pnm
        );
    }

    #[test]
    fn test_detect_unknown() {
        assert!(detect_format_from_bytes(b"BM\x00\x00").is_err());
        assert!(detect_format_from_bytes(b"P").is_err());
    }
}
