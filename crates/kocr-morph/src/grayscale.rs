//! Grayscale morphological operations
//!
//! # Algorithm
//!
//! With a brick structuring element of `hsize x vsize`:
//! - **Dilation**: maximum pixel value in the neighborhood
//! - **Erosion**: minimum pixel value in the neighborhood
//!
//! The brick is separable, so each operation is a horizontal pass
//! followed by a vertical pass. The origin sits at `(hsize / 2, vsize / 2)`.
//! Neighbors outside the image are ignored rather than padded.

use crate::{MorphError, MorphResult};
use kocr_core::{Pix, PixelDepth};

/// Dilate a grayscale image with a brick structuring element
///
/// Expands bright regions and shrinks dark regions.
pub fn dilate_gray(pix: &Pix, hsize: u32, vsize: u32) -> MorphResult<Pix> {
    brick_filter(pix, hsize, vsize, u8::max)
}

/// Erode a grayscale image with a brick structuring element
///
/// Shrinks bright regions and expands dark regions.
///
/// # Example
///
/// ```
/// use kocr_core::{Pix, PixelDepth};
/// use kocr_morph::erode_gray;
///
/// let mut pm = Pix::new_filled(5, 5, PixelDepth::Bit8, 255).unwrap().to_mut();
/// pm.set_pixel(2, 2, 0).unwrap();
/// let pix: Pix = pm.into();
/// let eroded = erode_gray(&pix, 3, 3).unwrap();
/// assert_eq!(eroded.get_pixel(1, 1), Some(0));
/// assert_eq!(eroded.get_pixel(0, 0), Some(255));
/// ```
pub fn erode_gray(pix: &Pix, hsize: u32, vsize: u32) -> MorphResult<Pix> {
    brick_filter(pix, hsize, vsize, u8::min)
}

fn brick_filter(pix: &Pix, hsize: u32, vsize: u32, pick: fn(u8, u8) -> u8) -> MorphResult<Pix> {
    if pix.depth() != PixelDepth::Bit8 {
        return Err(MorphError::UnsupportedDepth {
            expected: "8 bpp",
            actual: pix.depth().bits(),
        });
    }
    if hsize == 0 || vsize == 0 {
        return Err(MorphError::InvalidParameters(format!(
            "brick size must be positive: {}x{}",
            hsize, vsize
        )));
    }
    if hsize == 1 && vsize == 1 {
        return Ok(pix.clone());
    }

    let w = pix.width() as usize;
    let h = pix.height() as usize;
    let src = pix.data();

    let (hx0, hx1) = reach(hsize);
    let mut horiz = vec![0u8; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let lo = x.saturating_sub(hx0);
            let hi = (x + hx1).min(w - 1);
            horiz[y * w + x] = row[lo..=hi].iter().copied().fold(row[x], pick);
        }
    }

    let (vy0, vy1) = reach(vsize);
    let mut out = vec![0u8; w * h];
    for y in 0..h {
        let lo = y.saturating_sub(vy0);
        let hi = (y + vy1).min(h - 1);
        for x in 0..w {
            out[y * w + x] = (lo..=hi).map(|yy| horiz[yy * w + x]).fold(horiz[y * w + x], pick);
        }
    }

    Ok(Pix::from_raw(pix.width(), pix.height(), PixelDepth::Bit8, out)?)
}

/// Pixels reached before and after the origin
fn reach(size: u32) -> (usize, usize) {
    let before = (size / 2) as usize;
    (before, size as usize - 1 - before)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_from(w: u32, h: u32, vals: &[u8]) -> Pix {
        Pix::from_raw(w, h, PixelDepth::Bit8, vals.to_vec()).unwrap()
    }

    #[test]
    fn test_erode_spreads_dark_pixel() {
        let mut vals = vec![200u8; 25];
        vals[12] = 10;
        let eroded = erode_gray(&image_from(5, 5, &vals), 3, 3).unwrap();
        for y in 0..5 {
            for x in 0..5 {
                let expected = if (1..=3).contains(&x) && (1..=3).contains(&y) {
                    10
                } else {
                    200
                };
                assert_eq!(eroded.get_pixel(x, y), Some(expected), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_dilate_removes_thin_dark_line() {
        let mut vals = vec![255u8; 7 * 7];
        for x in 0..7 {
            vals[3 * 7 + x] = 0;
        }
        let dilated = dilate_gray(&image_from(7, 7, &vals), 3, 3).unwrap();
        assert!(dilated.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_border_pixels_ignore_outside() {
        let vals = [9u8, 5, 7, 3];
        let eroded = erode_gray(&image_from(4, 1, &vals), 3, 1).unwrap();
        assert_eq!(eroded.data(), &[5, 5, 3, 3]);
    }

    #[test]
    fn test_identity_and_errors() {
        let pix = image_from(2, 2, &[1, 2, 3, 4]);
        assert_eq!(erode_gray(&pix, 1, 1).unwrap(), pix);
        assert!(erode_gray(&pix, 0, 3).is_err());
        let binary = Pix::new(2, 2, PixelDepth::Bit1).unwrap();
        assert!(erode_gray(&binary, 3, 3).is_err());
    }
}
