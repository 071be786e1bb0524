//! PNG image format support

use crate::{IoError, IoResult, luma};
use kocr_core::{Pix, PixelDepth};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image as 8-bpp grayscale
///
/// Palettes and sub-byte depths are expanded and 16-bit samples are
/// stripped to their high byte before conversion.
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let width = output_info.width;
    let height = output_info.height;
    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];

    let samples = match output_info.color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG output color type: {:?}",
                other
            )));
        }
    };
    if output_info.bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNG output bit depth: {:?}",
            output_info.bit_depth
        )));
    }

    let mut gray = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height as usize {
        let row = &data[y * bytes_per_row..];
        for x in 0..width as usize {
            let px = &row[x * samples..x * samples + samples];
            let value = if samples >= 3 {
                luma(px[0], px[1], px[2])
            } else {
                px[0]
            };
            gray.push(value);
        }
    }

    Ok(Pix::from_raw(width, height, PixelDepth::Bit8, gray)?)
}

/// Write a PNG image
///
/// 8-bpp images are written as 8-bit grayscale. 1-bpp images are written
/// as 1-bit grayscale with foreground pixels black.
pub fn write_png<W: Write>(pix: &Pix, writer: W) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(ColorType::Grayscale);
    let bit_depth = match pix.depth() {
        PixelDepth::Bit1 => BitDepth::One,
        PixelDepth::Bit8 => BitDepth::Eight,
    };
    encoder.set_depth(bit_depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let data = match pix.depth() {
        PixelDepth::Bit8 => pix.data().to_vec(),
        PixelDepth::Bit1 => {
            let bytes_per_row = width.div_ceil(8) as usize;
            let mut packed = vec![0u8; bytes_per_row * height as usize];
            for y in 0..height {
                let row_start = y as usize * bytes_per_row;
                for (x, &val) in pix.row_data(y).iter().enumerate() {
                    // PNG gray: 1 = white, so background bits are set
                    if val == 0 {
                        packed[row_start + x / 8] |= 1 << (7 - (x % 8));
                    }
                }
            }
            packed
        }
    };

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_png_roundtrip_grayscale() {
        let pix = Pix::new(10, 10, PixelDepth::Bit8).unwrap();
        let mut pix_mut = pix.try_into_mut().unwrap();

        for y in 0..10 {
            for x in 0..10 {
                pix_mut.set_pixel(x, y, (x + y) * 10).unwrap();
            }
        }

        let pix: Pix = pix_mut.into();

        let mut buffer = Vec::new();
        write_png(&pix, &mut buffer).unwrap();

        let pix2 = read_png(Cursor::new(buffer)).unwrap();
        assert_eq!(pix2, pix);
    }

    #[test]
    fn test_png_binary_reads_back_as_gray() {
        let mut pm = Pix::new(9, 2, PixelDepth::Bit1).unwrap().to_mut();
        pm.set_pixel(0, 0, 1).unwrap();
        pm.set_pixel(8, 1, 1).unwrap();
        let pix: Pix = pm.into();

        let mut buffer = Vec::new();
        write_png(&pix, &mut buffer).unwrap();
        let gray = read_png(Cursor::new(buffer)).unwrap();

        assert_eq!(gray.depth(), PixelDepth::Bit8);
        assert_eq!(gray.get_pixel(0, 0), Some(0));
        assert_eq!(gray.get_pixel(1, 0), Some(255));
        assert_eq!(gray.get_pixel(8, 1), Some(0));
    }
}
