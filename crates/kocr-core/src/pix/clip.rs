//! Rectangle clipping and padding
//!
//! Functions for extracting rectangular sub-regions from images and for
//! centering an image on a larger square canvas.

use super::Pix;
use crate::Box;
use crate::error::{Error, Result};

impl Pix {
    /// Extract a rectangular sub-region from the image.
    ///
    /// If the rectangle extends beyond the image bounds, it is clipped to
    /// the valid region.
    ///
    /// # Errors
    ///
    /// Returns an error if the requested width or height is not positive
    /// or the rectangle is entirely outside the image.
    ///
    /// # Examples
    ///
    /// ```
    /// use kocr_core::{Pix, PixelDepth};
    ///
    /// let pix = Pix::new(100, 80, PixelDepth::Bit8).unwrap();
    /// let clipped = pix.clip_rectangle(80, 60, 50, 50).unwrap();
    /// assert_eq!(clipped.width(), 20);
    /// assert_eq!(clipped.height(), 20);
    /// ```
    pub fn clip_rectangle(&self, x: i32, y: i32, w: i32, h: i32) -> Result<Pix> {
        if w <= 0 || h <= 0 {
            return Err(Error::InvalidParameter(format!(
                "clip rectangle must have positive size: w={w}, h={h}"
            )));
        }
        let image = Box::new_unchecked(0, 0, self.width() as i32, self.height() as i32);
        let requested = Box::new_unchecked(x, y, w, h);
        let clipped = image.intersect(&requested).ok_or_else(|| {
            Error::InvalidParameter(format!(
                "clip rectangle ({x}, {y}, {w}, {h}) is outside the image"
            ))
        })?;

        let src_w = self.width() as usize;
        let mut data = Vec::with_capacity(clipped.area() as usize);
        for row in clipped.y..clipped.bottom() {
            let start = row as usize * src_w + clipped.x as usize;
            data.extend_from_slice(&self.data()[start..start + clipped.w as usize]);
        }
        Pix::from_raw(clipped.w as u32, clipped.h as u32, self.depth(), data)
    }

    /// Extract the region covered by `rect`.
    ///
    /// # Errors
    ///
    /// See [`Pix::clip_rectangle`].
    pub fn clip_box(&self, rect: &Box) -> Result<Pix> {
        self.clip_rectangle(rect.x, rect.y, rect.w, rect.h)
    }

    /// Center the image on a square canvas filled with `fill`.
    ///
    /// The side of the square equals the longer side of the image. The
    /// shorter axis is offset by `(side - len) / 2`, so odd remainders put
    /// the extra pixel after the image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPixelValue`] if `fill` does not fit the depth.
    pub fn pad_to_square(&self, fill: u32) -> Result<Pix> {
        let w = self.width();
        let h = self.height();
        let side = w.max(h);
        let x0 = (side - w) / 2;
        let y0 = (side - h) / 2;

        let canvas = Pix::new_filled(side, side, self.depth(), fill)?;
        let mut canvas = canvas.to_mut();
        let side = side as usize;
        for y in 0..h as usize {
            let dst = (y + y0 as usize) * side + x0 as usize;
            canvas.data_mut()[dst..dst + w as usize].copy_from_slice(self.row_data(y as u32));
        }
        Ok(canvas.into())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Pix, PixelDepth};

    fn gradient(w: u32, h: u32) -> Pix {
        let data = (0..w * h).map(|i| (i % 256) as u8).collect();
        Pix::from_raw(w, h, PixelDepth::Bit8, data).unwrap()
    }

    #[test]
    fn test_clip_rectangle_inside() {
        let pix = gradient(10, 10);
        let clip = pix.clip_rectangle(2, 3, 4, 5).unwrap();
        assert_eq!((clip.width(), clip.height()), (4, 5));
        assert_eq!(clip.get_pixel(0, 0), pix.get_pixel(2, 3));
        assert_eq!(clip.get_pixel(3, 4), pix.get_pixel(5, 7));
    }

    #[test]
    fn test_clip_rectangle_outside() {
        let pix = gradient(10, 10);
        assert!(pix.clip_rectangle(20, 20, 5, 5).is_err());
        assert!(pix.clip_rectangle(0, 0, 0, 5).is_err());
    }

    #[test]
    fn test_pad_to_square_wide() {
        let pix = Pix::new_filled(6, 3, PixelDepth::Bit8, 0).unwrap();
        let sq = pix.pad_to_square(255).unwrap();
        assert_eq!((sq.width(), sq.height()), (6, 6));
        // (6 - 3) / 2 = 1 row above, 2 rows below
        assert_eq!(sq.get_pixel(0, 0), Some(255));
        assert_eq!(sq.get_pixel(0, 1), Some(0));
        assert_eq!(sq.get_pixel(5, 3), Some(0));
        assert_eq!(sq.get_pixel(5, 4), Some(255));
    }

    #[test]
    fn test_pad_to_square_tall() {
        let pix = Pix::new_filled(2, 5, PixelDepth::Bit8, 0).unwrap();
        let sq = pix.pad_to_square(255).unwrap();
        assert_eq!((sq.width(), sq.height()), (5, 5));
        assert_eq!(sq.get_pixel(0, 2), Some(255));
        assert_eq!(sq.get_pixel(1, 2), Some(0));
        assert_eq!(sq.get_pixel(2, 2), Some(0));
        assert_eq!(sq.get_pixel(3, 2), Some(255));
    }
}
