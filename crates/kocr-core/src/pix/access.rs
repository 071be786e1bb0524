//! Pixel access

use super::{Pix, PixMut};
use crate::error::{Error, Result};

impl Pix {
    /// Get a pixel value at (x, y).
    ///
    /// Returns `None` if the coordinates are out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking against the row width.
    ///
    /// # Panics
    ///
    /// Panics if the computed offset is outside the buffer.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        let idx = y as usize * self.width() as usize + x as usize;
        u32::from(self.data()[idx])
    }
}

impl PixMut {
    /// Get a pixel value at (x, y).
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking against the row width.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        let idx = y as usize * self.width() as usize + x as usize;
        u32::from(self.data()[idx])
    }

    /// Set a pixel value at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds
    /// and [`Error::InvalidPixelValue`] if `val` does not fit the depth.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::IndexOutOfBounds {
                index: (y as usize) * self.width() as usize + x as usize,
                len: self.data().len(),
            });
        }
        let max = self.depth().max_value();
        if val > max {
            return Err(Error::InvalidPixelValue { value: val, max });
        }
        self.set_pixel_unchecked(x, y, val);
        Ok(())
    }

    /// Set a pixel value without bounds checking against the row width.
    ///
    /// The value is masked to the pixel depth.
    ///
    /// # Panics
    ///
    /// Panics if the computed offset is outside the buffer.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        let idx = y as usize * self.width() as usize + x as usize;
        let max = self.depth().max_value();
        self.data_mut()[idx] = val.min(max) as u8;
    }
}

#[cfg(test)]
mod tests {
    use crate::{Pix, PixelDepth};

    #[test]
    fn test_get_set_pixel() {
        let pix = Pix::new(5, 3, PixelDepth::Bit8).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_pixel(4, 2, 77).unwrap();
        assert!(pm.set_pixel(5, 0, 1).is_err());
        assert!(pm.set_pixel(0, 0, 256).is_err());
        let pix: Pix = pm.into();
        assert_eq!(pix.get_pixel(4, 2), Some(77));
        assert_eq!(pix.get_pixel(5, 2), None);
    }

    #[test]
    fn test_binary_pixel_range() {
        let mut pm = Pix::new(2, 2, PixelDepth::Bit1).unwrap().to_mut();
        assert!(pm.set_pixel(0, 0, 1).is_ok());
        assert!(pm.set_pixel(0, 0, 2).is_err());
        pm.set_pixel_unchecked(1, 1, 9);
        assert_eq!(pm.get_pixel(1, 1), Some(1));
    }
}
