//! kocr-io - Image I/O for the character recognizer
//!
//! Every reader returns an 8-bpp grayscale [`Pix`]: color inputs are
//! converted with the ITU-R BT.601 luma weights, low bit-depth and
//! 16-bit inputs are rescaled to 0..=255.
//!
//! Supported formats:
//!
//! - PNG (read/write, `png-format` feature)
//! - JPEG (read only, `jpeg` feature)
//! - PNM: PBM/PGM/PPM in ASCII and binary variants (read), PBM/PGM binary
//!   (write) (`pnm` feature)
//!
//! When writing, a 1-bpp image is stored with foreground (1) as black.

mod error;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;

pub use error::{IoError, IoResult};
pub use format::{detect_format, detect_format_from_bytes};
pub use kocr_core::ImageFormat;

use kocr_core::Pix;
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

/// Read an image from a file, detecting the format from its header.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the file cannot be opened and a format
/// specific error if decoding fails.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let data = std::fs::read(path)?;
    read_image_mem(&data)
}

/// Read an image from an in-memory buffer.
pub fn read_image_mem(data: &[u8]) -> IoResult<Pix> {
    let format = detect_format_from_bytes(data)?;
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(Cursor::new(data)),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(Cursor::new(data)),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::read_pnm(Cursor::new(data)),
        _ => Err(IoError::UnsupportedFormat(format!(
            "{:?} support is not enabled",
            format
        ))),
    }
}

/// Write an image to a file.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] for formats that cannot be
/// written (JPEG, unknown).
pub fn write_image<P: AsRef<Path>>(pix: &Pix, path: P, format: ImageFormat) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_image_to(pix, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}

/// Write an image to an in-memory buffer.
pub fn write_image_mem(pix: &Pix, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_image_to(pix, &mut buffer, format)?;
    Ok(buffer)
}

fn write_image_to<W: Write>(pix: &Pix, writer: W, format: ImageFormat) -> IoResult<()> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(pix, writer),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::write_pnm(pix, writer),
        _ => Err(IoError::UnsupportedFormat(format!(
            "cannot write {:?} images",
            format
        ))),
    }
}

/// Luma of an RGB triple using the BT.601 weights.
#[inline]
pub(crate) fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
    y.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use kocr_core::PixelDepth;

    #[test]
    fn test_luma_extremes() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(255, 0, 0), 76);
    }

    #[test]
    fn test_write_jpeg_rejected() {
        let pix = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        assert!(write_image_mem(&pix, ImageFormat::Jpeg).is_err());
    }

    #[test]
    fn test_mem_roundtrip_dispatch() {
        let pix = Pix::new_filled(3, 2, PixelDepth::Bit8, 90).unwrap();
        for format in [ImageFormat::Png, ImageFormat::Pnm] {
            let bytes = write_image_mem(&pix, format).unwrap();
            let back = read_image_mem(&bytes).unwrap();
            assert_eq!(back, pix);
        }
    }
}
