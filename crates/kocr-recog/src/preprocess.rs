//! Glyph preprocessing
//!
//! Turns one glyph sub-image into the fixed 64x64 binary canvas that the
//! contour tracer and the feature builder read.
//!
//! # Algorithm
//!
//! 1. [`binarize`]: gray values at or above the threshold become
//!    background (255), everything else foreground (0).
//! 2. [`remove_ruled_lines_and_crop`]: a square min filter thickens the
//!    ink, the thickened image is labeled, and the largest component that
//!    does not look like a ruled line is kept. A component looks like a
//!    ruled line when its bounding box is more elongated than
//!    `ruled_line_aspect_ratio` *and* it holds more pixels than half the
//!    image height. The result is that component alone, cropped to its
//!    bounding box.
//! 3. [`square_pad_normalize`]: the crop is centered on a square of
//!    background and resampled (nearest neighbor) to 64x64.

use crate::{BACKGROUND, CANVAS_SIZE, FOREGROUND, RecogError, RecogOptions, RecogResult};
use kocr_core::{Pix, PixelDepth};
use kocr_morph::erode_gray;
use kocr_region::{ConnectedComponent, label_by_size};
use kocr_transform::scale_to_size;
use tracing::debug;

fn require_gray(pix: &Pix) -> RecogResult<()> {
    if pix.depth() != PixelDepth::Bit8 {
        return Err(RecogError::UnsupportedDepth {
            expected: "8 bpp",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}

/// Threshold an 8-bpp image to the pipeline's two-level convention
///
/// Pixels `>= threshold` become [`BACKGROUND`], the rest [`FOREGROUND`].
pub fn binarize(pix: &Pix, threshold: u8) -> RecogResult<Pix> {
    require_gray(pix)?;
    let data = pix
        .data()
        .iter()
        .map(|&v| if v >= threshold { BACKGROUND } else { FOREGROUND })
        .collect();
    Ok(Pix::from_raw(pix.width(), pix.height(), PixelDepth::Bit8, data)?)
}

fn is_ruled_line(comp: &ConnectedComponent, max_aspect: f64, image_height: u32) -> bool {
    comp.aspect_ratio() > max_aspect && comp.pixel_count > image_height / 2
}

/// Keep the glyph body of a binarized image and crop to it
///
/// # Errors
///
/// * [`RecogError::NoInkFound`] if the image has no foreground pixel.
/// * [`RecogError::NoConnectedComponents`] if no component reaches
///   `min_component_size` or every one of them is a ruled line.
pub fn remove_ruled_lines_and_crop(binary: &Pix, options: &RecogOptions) -> RecogResult<Pix> {
    require_gray(binary)?;
    if !binary.data().contains(&FOREGROUND) {
        return Err(RecogError::NoInkFound);
    }

    let eroded = erode_gray(binary, options.erode_size, options.erode_size)?;
    let mask_data = eroded
        .data()
        .iter()
        .map(|&v| u8::from(v == FOREGROUND))
        .collect();
    let mask = Pix::from_raw(eroded.width(), eroded.height(), PixelDepth::Bit1, mask_data)?;
    let regions = label_by_size(&mask, options.connectivity, options.min_component_size)?;

    let glyph = regions
        .components
        .iter()
        .find(|c| !is_ruled_line(c, options.ruled_line_aspect_ratio, binary.height()))
        .ok_or(RecogError::NoConnectedComponents)?;
    debug!(
        components = regions.len(),
        label = glyph.label,
        pixels = glyph.pixel_count,
        "selected glyph component"
    );

    let b = glyph.bounds;
    let mut data = Vec::with_capacity(b.area() as usize);
    for y in b.y..b.bottom() {
        for x in b.x..b.right() {
            let inside = regions.map.get(x as u32, y as u32) == Some(glyph.label);
            data.push(if inside { FOREGROUND } else { BACKGROUND });
        }
    }
    Ok(Pix::from_raw(b.w as u32, b.h as u32, PixelDepth::Bit8, data)?)
}

/// Center on a background square and resample to the 64x64 canvas
pub fn square_pad_normalize(cropped: &Pix) -> RecogResult<Pix> {
    require_gray(cropped)?;
    let square = cropped.pad_to_square(u32::from(BACKGROUND))?;
    Ok(scale_to_size(&square, CANVAS_SIZE, CANVAS_SIZE)?)
}

/// Run the whole preprocessing chain on an 8-bpp glyph image
pub fn normalize_glyph(pix: &Pix, options: &RecogOptions) -> RecogResult<Pix> {
    let binary = binarize(pix, options.threshold)?;
    let cropped = remove_ruled_lines_and_crop(&binary, options)?;
    square_pad_normalize(&cropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(w: u32, h: u32, rects: &[(u32, u32, u32, u32)]) -> Pix {
        let mut pm = Pix::new_filled(w, h, PixelDepth::Bit8, 255).unwrap().to_mut();
        for &(x0, y0, rw, rh) in rects {
            for y in y0..y0 + rh {
                for x in x0..x0 + rw {
                    pm.set_pixel(x, y, 0).unwrap();
                }
            }
        }
        pm.into()
    }

    #[test]
    fn test_binarize_threshold_is_inclusive() {
        let pix = Pix::from_raw(4, 1, PixelDepth::Bit8, vec![0, 119, 120, 200]).unwrap();
        let bin = binarize(&pix, 120).unwrap();
        assert_eq!(bin.data(), &[0, 0, 255, 255]);
    }

    #[test]
    fn test_crop_thickened_body() {
        let pix = page(40, 40, &[(10, 5, 10, 20)]);
        let cropped = remove_ruled_lines_and_crop(&pix, &RecogOptions::default()).unwrap();
        // the 3x3 min filter grows the ink by one pixel on every side
        assert_eq!((cropped.width(), cropped.height()), (12, 22));
        assert!(cropped.data().iter().all(|&v| v == FOREGROUND));
    }

    #[test]
    fn test_ruled_line_is_skipped() {
        let pix = page(60, 40, &[(0, 30, 60, 1), (20, 5, 8, 8)]);
        let cropped = remove_ruled_lines_and_crop(&pix, &RecogOptions::default()).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (10, 10));
    }

    #[test]
    fn test_only_ruled_line() {
        let pix = page(60, 40, &[(0, 30, 60, 1)]);
        let err = remove_ruled_lines_and_crop(&pix, &RecogOptions::default()).unwrap_err();
        assert!(matches!(err, RecogError::NoConnectedComponents));
    }

    #[test]
    fn test_crop_drops_other_components() {
        let pix = page(40, 40, &[(5, 5, 10, 10), (30, 30, 2, 2)]);
        let opts = RecogOptions::default().with_erode_size(1);
        let cropped = remove_ruled_lines_and_crop(&pix, &opts).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (10, 10));
    }

    #[test]
    fn test_blank_has_no_ink() {
        let pix = page(20, 20, &[]);
        let err = remove_ruled_lines_and_crop(&pix, &RecogOptions::default()).unwrap_err();
        assert!(matches!(err, RecogError::NoInkFound));
    }

    #[test]
    fn test_square_pad_normalize_centers() {
        let tall = Pix::new_filled(10, 20, PixelDepth::Bit8, 0).unwrap();
        let canvas = square_pad_normalize(&tall).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (64, 64));
        // padded to 20x20 with the ink in columns 5..15, then scaled by 3.2
        assert_eq!(canvas.get_pixel(15, 30), Some(255));
        assert_eq!(canvas.get_pixel(16, 30), Some(0));
        assert_eq!(canvas.get_pixel(47, 30), Some(0));
        assert_eq!(canvas.get_pixel(48, 30), Some(255));
    }

    #[test]
    fn test_normalize_glyph_is_two_level() {
        let pix = page(30, 50, &[(8, 6, 12, 30)]);
        let canvas = normalize_glyph(&pix, &RecogOptions::default()).unwrap();
        assert_eq!(canvas.width(), CANVAS_SIZE);
        assert!(canvas.data().iter().all(|&v| v == FOREGROUND || v == BACKGROUND));
        assert!(canvas.data().contains(&FOREGROUND));
    }
}
