//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate. Writing is not
//! supported.

use crate::{IoError, IoResult, luma};
use jpeg_decoder::{Decoder, PixelFormat};
use kocr_core::{Pix, PixelDepth};
use std::io::Read;

/// Read a JPEG image as 8-bpp grayscale.
///
/// # Arguments
/// * `reader` - A reader positioned at the JPEG SOI marker (`FF D8`)
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;

    let width = u32::from(info.width);
    let height = u32::from(info.height);

    let gray: Vec<u8> = match info.pixel_format {
        PixelFormat::L8 => pixels,
        // big-endian samples, keep the high byte
        PixelFormat::L16 => pixels.chunks_exact(2).map(|c| c[0]).collect(),
        PixelFormat::RGB24 => pixels
            .chunks_exact(3)
            .map(|c| luma(c[0], c[1], c[2]))
            .collect(),
        PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .map(|c| {
                let k = 255 - u16::from(c[3]);
                let channel = |v: u8| ((255 - u16::from(v)) * k / 255) as u8;
                luma(channel(c[0]), channel(c[1]), channel(c[2]))
            })
            .collect(),
    };

    Ok(Pix::from_raw(width, height, PixelDepth::Bit8, gray)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_jpeg_truncated() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00];
        assert!(read_jpeg(Cursor::new(&data[..])).is_err());
    }
}
