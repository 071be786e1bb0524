//! PIX - The image container
//!
//! # Pixel layout
//!
//! - One byte per pixel, rows stored top to bottom without padding
//! - 8-bpp images hold gray values 0..=255
//! - 1-bpp images hold 0 or 1 (1 = foreground)
//!
//! # Ownership model
//!
//! `Pix` uses `Arc` for cheap cloning (shared ownership).
//! To modify pixel data, convert to `PixMut` via [`Pix::try_into_mut`]
//! or [`Pix::to_mut`], then convert back with `Into<Pix>`.

mod access;
mod clip;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Pixel depth (bits per pixel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelDepth {
    /// 1-bit binary
    Bit1 = 1,
    /// 8-bit grayscale
    Bit8 = 8,
}

impl PixelDepth {
    /// Create from bit count
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`] for anything other than 1 or 8.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            1 => Ok(PixelDepth::Bit1),
            8 => Ok(PixelDepth::Bit8),
            _ => Err(Error::InvalidDepth(bits)),
        }
    }

    /// Get the number of bits
    #[inline]
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Largest value a pixel of this depth can hold
    #[inline]
    pub fn max_value(self) -> u32 {
        match self {
            PixelDepth::Bit1 => 1,
            PixelDepth::Bit8 => 255,
        }
    }
}

/// Image file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    /// Unknown format
    #[default]
    Unknown,
    /// PNG
    Png,
    /// JPEG (read only)
    Jpeg,
    /// PNM family (PBM/PGM/PPM)
    Pnm,
}

impl ImageFormat {
    /// Get the conventional file extension
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Unknown => "",
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Pnm => "pnm",
        }
    }

    /// Guess the format from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "png" => ImageFormat::Png,
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "pnm" | "pbm" | "pgm" | "ppm" => ImageFormat::Pnm,
            _ => ImageFormat::Unknown,
        }
    }
}

#[derive(Debug, Clone)]
struct PixData {
    width: u32,
    height: u32,
    depth: PixelDepth,
    data: Vec<u8>,
}

/// Immutable image
///
/// # Example
///
/// ```
/// use kocr_core::{Pix, PixelDepth};
///
/// let pix = Pix::new(64, 64, PixelDepth::Bit8).unwrap();
/// assert_eq!(pix.width(), 64);
/// assert_eq!(pix.get_pixel(0, 0), Some(0));
/// ```
#[derive(Debug, Clone)]
pub struct Pix {
    inner: Arc<PixData>,
}

impl Pix {
    /// Create a new image with the specified dimensions and depth.
    ///
    /// The image data is initialized to zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        Self::new_filled(width, height, depth, 0)
    }

    /// Create a new image with every pixel set to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0 and
    /// [`Error::InvalidPixelValue`] if `value` does not fit `depth`.
    pub fn new_filled(width: u32, height: u32, depth: PixelDepth, value: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        if value > depth.max_value() {
            return Err(Error::InvalidPixelValue {
                value,
                max: depth.max_value(),
            });
        }

        let data = vec![value as u8; width as usize * height as usize];
        Ok(Pix {
            inner: Arc::new(PixData {
                width,
                height,
                depth,
                data,
            }),
        })
    }

    /// Wrap an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] if `data.len() != width * height`
    /// and [`Error::InvalidPixelValue`] if a byte does not fit `depth`.
    pub fn from_raw(width: u32, height: u32, depth: PixelDepth, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        if let Some(&bad) = data.iter().find(|&&v| u32::from(v) > depth.max_value()) {
            return Err(Error::InvalidPixelValue {
                value: u32::from(bad),
                max: depth.max_value(),
            });
        }
        Ok(Pix {
            inner: Arc::new(PixData {
                width,
                height,
                depth,
                data,
            }),
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Raw pixel bytes, row-major.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Pixel bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row_data(&self, y: u32) -> &[u8] {
        let w = self.inner.width as usize;
        let start = y as usize * w;
        &self.inner.data[start..start + w]
    }

    /// Check whether two images have the same width and height.
    pub fn sizes_equal(&self, other: &Pix) -> bool {
        self.width() == other.width() && self.height() == other.height()
    }

    /// Try to get mutable access to the image data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<PixMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(PixMut { inner: data }),
            Err(arc) => Err(Pix { inner: arc }),
        }
    }

    /// Create a mutable copy of this image.
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: PixData::clone(&self.inner),
        }
    }
}

impl PartialEq for Pix {
    fn eq(&self, other: &Self) -> bool {
        self.inner.width == other.inner.width
            && self.inner.height == other.inner.height
            && self.inner.depth == other.inner.depth
            && self.inner.data == other.inner.data
    }
}

impl Eq for Pix {}

/// Mutable image
///
/// Convert back to an immutable [`Pix`] using `Into<Pix>`.
#[derive(Debug)]
pub struct PixMut {
    inner: PixData,
}

impl PixMut {
    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Raw pixel bytes, row-major.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Mutable raw pixel bytes, row-major.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }
}

impl From<PixMut> for Pix {
    fn from(pix_mut: PixMut) -> Self {
        Pix {
            inner: Arc::new(pix_mut.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pix_creation() {
        let pix = Pix::new(100, 200, PixelDepth::Bit8).unwrap();
        assert_eq!(pix.width(), 100);
        assert_eq!(pix.height(), 200);
        assert_eq!(pix.depth(), PixelDepth::Bit8);
        assert_eq!(pix.data().len(), 20000);
    }

    #[test]
    fn test_pix_invalid_dimensions() {
        assert!(Pix::new(0, 100, PixelDepth::Bit8).is_err());
        assert!(Pix::new(100, 0, PixelDepth::Bit1).is_err());
    }

    #[test]
    fn test_new_filled_rejects_oversized_value() {
        assert!(Pix::new_filled(4, 4, PixelDepth::Bit1, 2).is_err());
        let pix = Pix::new_filled(4, 4, PixelDepth::Bit8, 255).unwrap();
        assert!(pix.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_from_raw_size_check() {
        assert!(Pix::from_raw(3, 3, PixelDepth::Bit8, vec![0; 8]).is_err());
        assert!(Pix::from_raw(2, 2, PixelDepth::Bit1, vec![0, 1, 2, 0]).is_err());
        let pix = Pix::from_raw(2, 2, PixelDepth::Bit1, vec![0, 1, 1, 0]).unwrap();
        assert_eq!(pix.row_data(1), &[1, 0]);
    }

    #[test]
    fn test_try_into_mut_shared() {
        let pix = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        let shared = pix.clone();
        let pix = pix.try_into_mut().unwrap_err();
        drop(shared);
        assert!(pix.try_into_mut().is_ok());
    }

    #[test]
    fn test_to_mut_is_independent() {
        let pix = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        let mut pm = pix.to_mut();
        pm.data_mut().fill(200);
        let modified: Pix = pm.into();
        assert_eq!(pix.get_pixel(0, 0), Some(0));
        assert_eq!(modified.get_pixel(3, 3), Some(200));
        assert_ne!(pix, modified);
    }

    #[test]
    fn test_depth_from_bits() {
        assert_eq!(PixelDepth::from_bits(1).unwrap(), PixelDepth::Bit1);
        assert_eq!(PixelDepth::from_bits(8).unwrap(), PixelDepth::Bit8);
        assert!(PixelDepth::from_bits(16).is_err());
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(ImageFormat::from_extension("PGM"), ImageFormat::Pnm);
        assert_eq!(ImageFormat::from_extension("jpeg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::Png.extension(), "png");
    }
}
