//! PNM (PBM/PGM/PPM) image format support
//!
//! Reads all six variants (P1-P6). Writes 1-bpp images as binary PBM (P4)
//! and 8-bpp images as binary PGM (P5).

use crate::{IoError, IoResult, luma};
use kocr_core::{Pix, PixelDepth};
use std::io::{Read, Write};

/// Read a PNM image as 8-bpp grayscale
pub fn read_pnm<R: Read>(mut reader: R) -> IoResult<Pix> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let mut header = HeaderParser::new(&data);
    let kind = header.magic()?;
    let width = header.number()?;
    let height = header.number()?;
    let maxval = if matches!(kind, b'1' | b'4') {
        1
    } else {
        header.number()?
    };
    if width == 0 || height == 0 {
        return Err(IoError::InvalidData(format!(
            "invalid PNM dimensions: {}x{}",
            width, height
        )));
    }
    if maxval == 0 || maxval > 65535 {
        return Err(IoError::InvalidData(format!("invalid PNM maxval: {}", maxval)));
    }

    let npix = width as usize * height as usize;
    let scale = |v: u32| -> u8 { ((v.min(maxval) * 255 + maxval / 2) / maxval) as u8 };

    let gray: Vec<u8> = match kind {
        b'1' => {
            let mut out = Vec::with_capacity(npix);
            while out.len() < npix {
                let bit = header.bit()?;
                out.push(if bit == 1 { 0 } else { 255 });
            }
            out
        }
        b'2' => {
            let mut out = Vec::with_capacity(npix);
            for _ in 0..npix {
                out.push(scale(header.number()?));
            }
            out
        }
        b'3' => {
            let mut out = Vec::with_capacity(npix);
            for _ in 0..npix {
                let r = scale(header.number()?);
                let g = scale(header.number()?);
                let b = scale(header.number()?);
                out.push(luma(r, g, b));
            }
            out
        }
        b'4' => {
            let raster = header.raster()?;
            let bytes_per_row = (width as usize).div_ceil(8);
            require_len(raster, bytes_per_row * height as usize)?;
            let mut out = Vec::with_capacity(npix);
            for y in 0..height as usize {
                let row = &raster[y * bytes_per_row..];
                for x in 0..width as usize {
                    let bit = (row[x / 8] >> (7 - (x % 8))) & 1;
                    out.push(if bit == 1 { 0 } else { 255 });
                }
            }
            out
        }
        b'5' | b'6' => {
            let raster = header.raster()?;
            let channels = if kind == b'5' { 1 } else { 3 };
            let sample_bytes = if maxval > 255 { 2 } else { 1 };
            require_len(raster, npix * channels * sample_bytes)?;
            let sample = |i: usize| -> u8 {
                let v = if sample_bytes == 2 {
                    (u32::from(raster[2 * i]) << 8) | u32::from(raster[2 * i + 1])
                } else {
                    u32::from(raster[i])
                };
                scale(v)
            };
            (0..npix)
                .map(|p| {
                    if channels == 1 {
                        sample(p)
                    } else {
                        luma(sample(3 * p), sample(3 * p + 1), sample(3 * p + 2))
                    }
                })
                .collect()
        }
        _ => unreachable!("magic() only accepts P1-P6"),
    };

    Ok(Pix::from_raw(width, height, PixelDepth::Bit8, gray)?)
}

/// Write a PNM image
pub fn write_pnm<W: Write>(pix: &Pix, mut writer: W) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();
    match pix.depth() {
        PixelDepth::Bit8 => {
            write!(writer, "P5\n{} {}\n255\n", width, height)?;
            writer.write_all(pix.data())?;
        }
        PixelDepth::Bit1 => {
            write!(writer, "P4\n{} {}\n", width, height)?;
            let bytes_per_row = (width as usize).div_ceil(8);
            for y in 0..height {
                let mut packed = vec![0u8; bytes_per_row];
                for (x, &val) in pix.row_data(y).iter().enumerate() {
                    if val != 0 {
                        packed[x / 8] |= 1 << (7 - (x % 8));
                    }
                }
                writer.write_all(&packed)?;
            }
        }
    }
    Ok(())
}

fn require_len(raster: &[u8], needed: usize) -> IoResult<()> {
    if raster.len() < needed {
        return Err(IoError::InvalidData(format!(
            "PNM raster truncated: need {} bytes, have {}",
            needed,
            raster.len()
        )));
    }
    Ok(())
}

/// Tokenizer over the ASCII part of a PNM file
struct HeaderParser<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> HeaderParser<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn magic(&mut self) -> IoResult<u8> {
        match self.data {
            [b'P', kind @ b'1'..=b'6', ..] => {
                self.pos = 2;
                Ok(*kind)
            }
            _ => Err(IoError::InvalidData("missing PNM magic".to_string())),
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while self.pos < self.data.len() {
            match self.data[self.pos] {
                b'#' => {
                    while self.pos < self.data.len() && self.data[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                c if c.is_ascii_whitespace() => self.pos += 1,
                _ => break,
            }
        }
    }

    fn number(&mut self) -> IoResult<u32> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        while self.pos < self.data.len() && self.data[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(IoError::InvalidData(format!(
                "expected a number at byte {}",
                start
            )));
        }
        std::str::from_utf8(&self.data[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| IoError::InvalidData(format!("number too large at byte {}", start)))
    }

    /// Single 0/1 digit; plain PBM allows digits without separators
    fn bit(&mut self) -> IoResult<u8> {
        self.skip_whitespace_and_comments();
        match self.data.get(self.pos) {
            Some(&c @ (b'0' | b'1')) => {
                self.pos += 1;
                Ok(c - b'0')
            }
            _ => Err(IoError::InvalidData(format!(
                "expected a PBM bit at byte {}",
                self.pos
            ))),
        }
    }

    /// Binary raster following the single whitespace after the header
    fn raster(&mut self) -> IoResult<&'a [u8]> {
        let data = self.data;
        match data.get(self.pos) {
            Some(c) if c.is_ascii_whitespace() => Ok(&data[self.pos + 1..]),
            _ => Err(IoError::InvalidData(
                "missing whitespace before PNM raster".to_string(),
            )),
        }
    }
}
